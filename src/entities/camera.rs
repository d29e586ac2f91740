//! Camera entity as listed by `GET /cam/list/cameras`

use crate::core::query::SortSpec;
use crate::{impl_field_enum, impl_view_entity};
use serde::{Deserialize, Deserializer, Serialize};

/// Mounting type of a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraType {
    #[default]
    Indoor,
    Outdoor,
}

impl_field_enum!(CameraType {
    Indoor => "indoor",
    Outdoor => "outdoor",
});

/// A camera feed registered with the backend
///
/// The backend fills missing metadata with `null`, so every text and flag
/// field tolerates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub camera_type: CameraType,

    #[serde(default, deserialize_with = "null_as_default")]
    pub zone: String,

    #[serde(rename = "hasAlerts", default, deserialize_with = "null_as_default")]
    pub has_alerts: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,

    /// Recorded footage size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl_view_entity!(
    Camera,
    "cameras",
    search: ["name", "location", "zone"],
    fields: {
        "name" => name,
        "location" => location,
        "type" => camera_type,
        "zone" => zone,
        "has_alerts" => has_alerts,
        "active" => active,
        "storage" => storage,
    },
    default_sort: SortSpec::ascending("name"),
);

/// Tab counts shown above the camera grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CameraTabs {
    pub all: usize,
    pub indoor: usize,
    pub outdoor: usize,
    pub with_alerts: usize,
}

impl CameraTabs {
    pub fn count(cameras: &[Camera]) -> Self {
        cameras.iter().fold(Self::default(), |mut tabs, camera| {
            tabs.all += 1;
            match camera.camera_type {
                CameraType::Indoor => tabs.indoor += 1,
                CameraType::Outdoor => tabs.outdoor += 1,
            }
            if camera.has_alerts {
                tabs.with_alerts += 1;
            }
            tabs
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use crate::core::field::FieldValue;

    #[test]
    fn test_backend_payload_with_nulls() {
        let json = serde_json::json!({
            "id": "9b0c",
            "name": null,
            "location": "Lobby",
            "type": "indoor",
            "zone": "south",
            "status": true,
            "hasAlerts": null,
            "active": false,
            "storage": 0.0123
        });

        let camera: Camera = serde_json::from_value(json).unwrap();
        assert_eq!(camera.name, "");
        assert!(!camera.has_alerts);
        assert_eq!(camera.storage, Some(0.0123));
        assert_eq!(camera.field_value("type"), Some(FieldValue::from("indoor")));
        assert_eq!(camera.field_value("active"), Some(FieldValue::Boolean(false)));
    }

    #[test]
    fn test_serializes_backend_names() {
        let camera = Camera {
            id: "c1".to_string(),
            name: "Main Entrance".to_string(),
            location: "Front Lobby".to_string(),
            camera_type: CameraType::Outdoor,
            zone: "entrance".to_string(),
            has_alerts: true,
            active: true,
            storage: None,
        };
        let json = serde_json::to_value(&camera).unwrap();
        assert_eq!(json["type"], "outdoor");
        assert_eq!(json["hasAlerts"], true);
        assert!(json.get("storage").is_none());
    }

    #[test]
    fn test_tab_counts() {
        let mut a = Camera {
            id: "a".to_string(),
            name: "A".to_string(),
            location: String::new(),
            camera_type: CameraType::Indoor,
            zone: String::new(),
            has_alerts: false,
            active: true,
            storage: None,
        };
        let mut b = a.clone();
        b.id = "b".to_string();
        b.camera_type = CameraType::Outdoor;
        b.has_alerts = true;
        a.has_alerts = true;

        let tabs = CameraTabs::count(&[a, b]);
        assert_eq!(
            tabs,
            CameraTabs {
                all: 2,
                indoor: 1,
                outdoor: 1,
                with_alerts: 2
            }
        );
    }
}
