//! rollcall-ui library - attendance marking client
//!
//! Talks to the attendance backend over REST: fetches a classroom roster
//! and whatever attendance is already recorded for a (classroom, session,
//! date) triple, reconciles the two into an editable sheet, and submits
//! the sheet back as a single batch.

pub mod api;
pub mod cycle;
pub mod sheet;

pub use api::{ApiClient, Credential, SubmitReceipt};
pub use cycle::{load_sheet, CycleState, CycleTicket, MarkingCycle, Selection, SubmitNotice};
pub use sheet::{reconcile, AttendanceSheet};
