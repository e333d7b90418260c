//! Attendance sheet: reconciliation and the operator edit surface
//!
//! A sheet is the editable merge of a classroom roster with whatever the
//! backend already has for one (classroom, session, date) triple. It is
//! created fresh by each fetch cycle and dropped when the triple changes.

use rollcall_common::{AttendanceRecord, AttendanceStatus, Error, Result, Student};
use std::collections::{BTreeMap, HashMap};

/// Editable per-student statuses for one (classroom, session, date) triple.
///
/// Keys are fixed at reconciliation time: exactly the roster's student
/// ids. Iteration is by ascending student id, which makes batch payloads
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceSheet {
    statuses: BTreeMap<i64, AttendanceStatus>,
}

impl AttendanceSheet {
    /// Current status for `student_id`, `None` if the id is not on the
    /// sheet.
    pub fn status(&self, student_id: i64) -> Option<AttendanceStatus> {
        self.statuses.get(&student_id).copied()
    }

    /// Record an operator override for one student.
    ///
    /// The sheet never grows here: an id outside the reconciled roster is
    /// an [`Error::UnknownStudent`] and the sheet is left untouched.
    pub fn set_status(&mut self, student_id: i64, status: AttendanceStatus) -> Result<()> {
        match self.statuses.get_mut(&student_id) {
            Some(slot) => {
                *slot = status;
                Ok(())
            }
            None => Err(Error::UnknownStudent(student_id)),
        }
    }

    /// Entries in ascending student-id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, AttendanceStatus)> + '_ {
        self.statuses.iter().map(|(id, status)| (*id, *status))
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Merge a roster with previously recorded attendance.
///
/// The roster drives the key set: every roster student gets exactly one
/// status. Recorded students keep their stored status, with the last row
/// winning when the backend repeats a (student, date, session) key;
/// everyone else defaults to [`AttendanceStatus::Present`]. Rows for
/// students no longer on the roster are dropped, never surfaced.
pub fn reconcile(roster: &[Student], records: &[AttendanceRecord]) -> AttendanceSheet {
    let mut recorded: HashMap<i64, AttendanceStatus> = HashMap::with_capacity(records.len());
    for record in records {
        recorded.insert(record.student, record.status);
    }

    let statuses = roster
        .iter()
        .map(|student| {
            let status = recorded
                .get(&student.id)
                .copied()
                .unwrap_or(AttendanceStatus::Present);
            (student.id, status)
        })
        .collect();

    AttendanceSheet { statuses }
}
