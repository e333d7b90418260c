//! Domain types shared across the rollcall client
//!
//! Wire names follow the backend contract. Where a Rust name differs from
//! the token the backend expects, the rename sits on the definition so the
//! wire shape is visible here and nowhere else.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A classroom as served by the backend.
///
/// Classrooms are created and deleted elsewhere; this client only ever
/// reads them. The id is unique and stable for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Classroom {
    pub id: i64,
    pub name: String,
}

/// A student on a classroom roster. Owned by the backend, read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// School-assigned ordinal within the classroom
    pub roll_number: i64,
    /// Id of the classroom this student belongs to
    pub classroom: i64,
}

/// The attendance period dimension distinguishing multiple daily checks
/// for the same roster.
///
/// Each variant maps 1:1 to the token the backend expects in `att_type`
/// query and body fields. Adding a variant means extending [`Self::ALL`]
/// and [`Self::att_token`] together; the `match` keeps them from drifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SessionType {
    #[serde(rename = "morning")]
    Morning,
    #[serde(rename = "evening_att")]
    Evening,
}

impl SessionType {
    /// Every session type, in display order.
    pub const ALL: [SessionType; 2] = [SessionType::Morning, SessionType::Evening];

    /// Backend-facing `att_type` token.
    pub fn att_token(self) -> &'static str {
        match self {
            SessionType::Morning => "morning",
            SessionType::Evening => "evening_att",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionType::Morning => "morning",
            SessionType::Evening => "evening",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "morning" => Ok(SessionType::Morning),
            "evening" => Ok(SessionType::Evening),
            other => Err(format!(
                "unknown session type '{}' (expected morning or evening)",
                other
            )),
        }
    }
}

/// Closed set of per-student attendance marks.
///
/// An unknown token from the backend fails deserialization and surfaces as
/// a malformed-payload error; it is never coerced to a known value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AttendanceStatus {
    #[serde(rename = "present")]
    Present,
    #[serde(rename = "absent")]
    Absent,
    #[serde(rename = "leave")]
    Leave,
    /// Sanctioned leave (leave with pay)
    #[serde(rename = "leave-sw")]
    LeaveSw,
    #[serde(rename = "on-duty")]
    OnDuty,
}

impl AttendanceStatus {
    /// Every status, in the order the marking surface offers them.
    pub const ALL: [AttendanceStatus; 5] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Leave,
        AttendanceStatus::LeaveSw,
        AttendanceStatus::OnDuty,
    ];

    /// Backend-facing status token.
    pub fn token(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::LeaveSw => "leave-sw",
            AttendanceStatus::OnDuty => "on-duty",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AttendanceStatus::ALL
            .iter()
            .copied()
            .find(|status| status.token() == s)
            .ok_or_else(|| format!("unknown attendance status '{}'", s))
    }
}

/// One stored attendance row for a (student, date, session) key.
///
/// At most one row per key is meaningful; when the backend repeats a key,
/// the row arriving later in the response wins during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttendanceRecord {
    /// Student id the row belongs to
    pub student: i64,
    /// Calendar date, exchanged as YYYY-MM-DD with no time component
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Denormalized display name the backend includes on fetched rows;
    /// ignored by reconciliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_mapping_is_total() {
        // Walks every variant so a new session type cannot ship without
        // its backend token.
        for session in SessionType::ALL {
            let token = session.att_token();
            assert!(!token.is_empty());
        }
        assert_eq!(SessionType::Morning.att_token(), "morning");
        assert_eq!(SessionType::Evening.att_token(), "evening_att");
    }

    #[test]
    fn test_session_serializes_as_att_token() {
        for session in SessionType::ALL {
            let json = serde_json::to_value(session).unwrap();
            assert_eq!(json, serde_json::Value::from(session.att_token()));
        }
    }

    #[test]
    fn test_session_from_str_uses_display_names() {
        assert_eq!("morning".parse::<SessionType>(), Ok(SessionType::Morning));
        assert_eq!("evening".parse::<SessionType>(), Ok(SessionType::Evening));
        // The wire token is not a display name
        assert!("evening_att".parse::<SessionType>().is_err());
    }

    #[test]
    fn test_status_tokens_round_trip() {
        for status in AttendanceStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            let back: AttendanceStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
            assert_eq!(status.token().parse::<AttendanceStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_token_rejected() {
        let result = serde_json::from_str::<AttendanceStatus>("\"tardy\"");
        assert!(result.is_err());
        assert!("tardy".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_attendance_record_decodes_backend_row() {
        // Fetched rows carry a read-only student_name and a surplus id
        // field; both must decode cleanly.
        let json = r#"{
            "id": 77,
            "student": 4,
            "student_name": "Priya",
            "date": "2024-03-11",
            "status": "leave-sw"
        }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.student, 4);
        assert_eq!(record.status, AttendanceStatus::LeaveSw);
        assert_eq!(record.student_name.as_deref(), Some("Priya"));
        assert_eq!(record.date.to_string(), "2024-03-11");
    }

    #[test]
    fn test_attendance_record_student_name_optional() {
        let json = r#"{"student": 9, "date": "2024-03-11", "status": "present"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.student_name, None);
    }

    #[test]
    fn test_student_decodes_roster_row() {
        let json = r#"{"id": 2, "name": "Bob", "roll_number": 14, "classroom": 3}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.id, 2);
        assert_eq!(student.roll_number, 14);
        assert_eq!(student.classroom, 3);
    }

    #[test]
    fn test_classroom_decodes() {
        let classroom: Classroom =
            serde_json::from_str(r#"{"id": 3, "name": "Grade 6"}"#).unwrap();
        assert_eq!(classroom.id, 3);
        assert_eq!(classroom.name, "Grade 6");
    }
}
