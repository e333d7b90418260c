//! # Rollcall Common Library
//!
//! Shared code for the rollcall attendance client:
//! - Domain types (classrooms, students, sessions, statuses)
//! - Error taxonomy
//! - Configuration resolution

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{AttendanceRecord, AttendanceStatus, Classroom, SessionType, Student};
