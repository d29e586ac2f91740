//! Dashboard user managed from the users page

use crate::core::query::SortSpec;
use crate::{impl_field_enum, impl_view_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Operator,
    Viewer,
}

impl_field_enum!(UserRole {
    Admin => "admin",
    Operator => "operator",
    Viewer => "viewer",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl_field_enum!(UserStatus {
    Active => "active",
    Inactive => "inactive",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_active: DateTime<Utc>,
}

impl_view_entity!(
    User,
    "users",
    search: ["name", "email"],
    fields: {
        "name" => name,
        "email" => email,
        "role" => role,
        "status" => status,
        "last_active" => last_active,
    },
    timestamp: last_active,
    default_sort: SortSpec::ascending("name"),
);
