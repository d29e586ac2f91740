//! Mock collections used when the dashboard runs without a backend
//!
//! Timestamps are wall-clock times in the local timezone, so the date filter
//! sees the same calendar days the dashboard shows.

use crate::entities::{
    Alert, AlertSeverity, AlertStatus, AuditLogEntry, AuditStatus, Camera, CameraType, User,
    UserRole, UserStatus,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// A local wall-clock time as UTC
pub fn local_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[allow(clippy::too_many_arguments)]
fn alert(
    id: &str,
    title: &str,
    description: &str,
    severity: AlertSeverity,
    timestamp: DateTime<Utc>,
    camera: &str,
    location: &str,
    status: AlertStatus,
    video_id: Option<&str>,
) -> Alert {
    Alert {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        severity,
        timestamp,
        camera: camera.to_string(),
        location: location.to_string(),
        status,
        video_id: video_id.map(str::to_string),
    }
}

/// The ten alerts of the alerts page, newest first
pub fn alerts() -> Vec<Alert> {
    use AlertSeverity::*;
    use AlertStatus::*;

    vec![
        alert(
            "a1",
            "Unauthorized Access",
            "Individual entered restricted area without credentials",
            Critical,
            local_time(2023, 4, 15, 2, 30),
            "Server Room",
            "Basement",
            New,
            Some("v7"),
        ),
        alert(
            "a2",
            "Unusual Movement",
            "Suspicious activity detected in storage area after hours",
            High,
            local_time(2023, 4, 15, 1, 42),
            "Storage Area",
            "Warehouse",
            New,
            Some("v6"),
        ),
        alert(
            "a3",
            "After Hours Access",
            "Employee badge used outside normal business hours",
            Medium,
            local_time(2023, 4, 14, 23, 15),
            "Main Entrance",
            "Front Lobby",
            Acknowledged,
            Some("v1"),
        ),
        alert(
            "a4",
            "Unattended Package",
            "Package left unattended in public area",
            Low,
            local_time(2023, 4, 14, 16, 20),
            "Lobby",
            "Reception",
            Resolved,
            None,
        ),
        alert(
            "a5",
            "Tailgating Detected",
            "Multiple people entered with single badge scan",
            High,
            local_time(2023, 4, 14, 9, 45),
            "Side Entrance",
            "East Wing",
            Acknowledged,
            Some("v2"),
        ),
        alert(
            "a6",
            "Camera Tampering",
            "Possible camera manipulation detected",
            Critical,
            local_time(2023, 4, 13, 22, 10),
            "Parking Lot",
            "North Side",
            Resolved,
            Some("v4"),
        ),
        alert(
            "a7",
            "Motion in Secure Zone",
            "Movement detected in secure zone after hours",
            High,
            local_time(2023, 4, 13, 1, 15),
            "Executive Office",
            "3rd Floor",
            Resolved,
            None,
        ),
        alert(
            "a8",
            "Loitering Detected",
            "Individual remained in area for extended period",
            Medium,
            local_time(2023, 4, 12, 14, 30),
            "Cafeteria",
            "1st Floor",
            Resolved,
            None,
        ),
        alert(
            "a9",
            "Unusual Behavior",
            "Person exhibiting unusual behavior near entrance",
            Medium,
            local_time(2023, 4, 12, 11, 20),
            "Main Entrance",
            "Front Lobby",
            Resolved,
            None,
        ),
        alert(
            "a10",
            "Vehicle in Restricted Area",
            "Unauthorized vehicle in restricted parking zone",
            Low,
            local_time(2023, 4, 11, 13, 45),
            "Parking Lot",
            "North Side",
            Resolved,
            Some("v5"),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn camera(
    id: &str,
    name: &str,
    location: &str,
    camera_type: CameraType,
    zone: &str,
    has_alerts: bool,
    active: bool,
    storage: f64,
) -> Camera {
    Camera {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        camera_type,
        zone: zone.to_string(),
        has_alerts,
        active,
        storage: Some(storage),
    }
}

/// Ten cameras: five indoor, five outdoor, two with alerts (one outdoor)
///
/// The outdoor camera with alerts (cam-2) is also in the entrance zone. A
/// query containing "outdoor" triggers the entrance group too ("door"), so an
/// outdoor camera with alerts outside the entrance zone would be filtered out.
pub fn cameras() -> Vec<Camera> {
    use CameraType::*;

    vec![
        camera("cam-1", "Main Entrance", "Front Lobby", Outdoor, "entrance", false, true, 128.4),
        camera("cam-2", "Side Entrance", "East Wing", Outdoor, "entrance", true, true, 96.2),
        camera("cam-3", "Parking Lot", "North Side", Outdoor, "parking", false, true, 210.0),
        camera("cam-4", "Loading Dock", "Rear Yard", Outdoor, "perimeter", false, false, 12.5),
        camera("cam-5", "Garage Ramp", "Underground", Outdoor, "parking", false, true, 74.9),
        camera("cam-6", "Lobby", "Reception", Indoor, "lobby", false, true, 55.1),
        camera("cam-7", "Server Room", "Basement", Indoor, "restricted", true, true, 143.7),
        camera("cam-8", "Executive Office", "3rd Floor", Indoor, "office", false, true, 31.0),
        camera("cam-9", "Storage Area", "Warehouse", Indoor, "storage", false, false, 8.3),
        camera("cam-10", "Cafeteria", "1st Floor", Indoor, "common", false, true, 40.6),
    ]
}

fn user(
    id: &str,
    name: &str,
    email: &str,
    role: UserRole,
    status: UserStatus,
    last_active: DateTime<Utc>,
) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        status,
        last_active,
    }
}

/// Accounts shown on the users page
pub fn users() -> Vec<User> {
    use UserRole::*;
    use UserStatus::*;

    vec![
        user("u1", "Admin User", "admin@example.com", Admin, Active, local_time(2023, 4, 15, 15, 30)),
        user("u2", "John Smith", "john@example.com", Operator, Active, local_time(2023, 4, 15, 10, 15)),
        user("u3", "Jane Doe", "jane@example.com", Operator, Active, local_time(2023, 4, 15, 11, 20)),
        user("u4", "Robert Johnson", "robert@example.com", Viewer, Inactive, local_time(2023, 4, 10, 8, 5)),
        user("u5", "Emily Davis", "emily@example.com", Viewer, Active, local_time(2023, 4, 15, 14, 12)),
        user("u6", "David Wilson", "david@example.com", Operator, Active, local_time(2023, 4, 15, 17, 20)),
    ]
}

fn log(
    id: &str,
    action: &str,
    user: &str,
    timestamp: DateTime<Utc>,
    ip: &str,
    status: AuditStatus,
    details: Option<&str>,
) -> AuditLogEntry {
    AuditLogEntry {
        id: id.to_string(),
        action: action.to_string(),
        user: user.to_string(),
        timestamp,
        ip: ip.to_string(),
        status,
        details: details.map(str::to_string),
    }
}

/// Entries of the security audit log
pub fn audit_logs() -> Vec<AuditLogEntry> {
    use AuditStatus::*;

    vec![
        log("log1", "Login", "admin@example.com", local_time(2023, 4, 15, 9, 30), "192.168.1.1", Success, None),
        log("log2", "Password Change", "john@example.com", local_time(2023, 4, 15, 10, 15), "192.168.1.2", Success, None),
        log("log3", "Login", "jane@example.com", local_time(2023, 4, 15, 11, 20), "192.168.1.3", Success, None),
        log(
            "log4",
            "Login Attempt",
            "robert@example.com",
            local_time(2023, 4, 15, 12, 45),
            "192.168.1.4",
            Failure,
            Some("Invalid password"),
        ),
        log(
            "log5",
            "User Created",
            "admin@example.com",
            local_time(2023, 4, 15, 14, 10),
            "192.168.1.1",
            Success,
            Some("Created user emily@example.com"),
        ),
        log(
            "log6",
            "Settings Changed",
            "admin@example.com",
            local_time(2023, 4, 15, 15, 30),
            "192.168.1.1",
            Success,
            Some("Updated password policy"),
        ),
        log(
            "log7",
            "Login Attempt",
            "unknown",
            local_time(2023, 4, 15, 16, 45),
            "203.0.113.1",
            Failure,
            Some("User not found"),
        ),
        log("log8", "2FA Enabled", "david@example.com", local_time(2023, 4, 15, 17, 20), "192.168.1.5", Success, None),
    ]
}
