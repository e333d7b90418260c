//! Fetch-cycle state machine with stale-result discarding
//!
//! One cycle covers a single (classroom, session, date) selection: both
//! fetches, reconciliation, operator edits, and at most one in-flight
//! submission. Changing the selection starts a new cycle; anything still
//! in flight for the old one resolves against a stale ticket and is
//! dropped without touching the visible state.

use crate::api::{ApiClient, Credential, SubmitReceipt};
use crate::sheet::{reconcile, AttendanceSheet};
use chrono::NaiveDate;
use rollcall_common::{Error, Result, SessionType, Student};

/// The triple one cycle is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub classroom: i64,
    pub session: SessionType,
    pub date: NaiveDate,
}

/// Identifies which cycle an asynchronous result belongs to. Compared
/// against the current generation when the result lands; the underlying
/// request is never aborted, its result is simply discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTicket {
    generation: u64,
}

/// Outcome notice shown alongside a Ready sheet after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitNotice {
    /// Backend acknowledged the batch
    Accepted { rows: usize },
    /// Aggregate failure message; the sheet, edits included, is kept
    Failed(String),
}

/// Observable state of the marking surface.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleState {
    /// No selection made yet
    Idle,
    /// Fetches in flight for the current selection
    Loading,
    /// Reconciled sheet ready for edits
    Ready {
        sheet: AttendanceSheet,
        notice: Option<SubmitNotice>,
    },
    /// Either fetch failed; no partial sheet is surfaced
    LoadError(String),
    /// Batch submission in flight. There is no transition from here back
    /// into Submitting, which is what rules out double submission.
    Submitting { sheet: AttendanceSheet },
}

/// State machine owned by whichever surface hosts the marking flow.
pub struct MarkingCycle {
    generation: u64,
    selection: Option<Selection>,
    state: CycleState,
}

impl MarkingCycle {
    pub fn new() -> Self {
        Self {
            generation: 0,
            selection: None,
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The current sheet, if one is ready for edits.
    pub fn sheet(&self) -> Option<&AttendanceSheet> {
        match &self.state {
            CycleState::Ready { sheet, .. } => Some(sheet),
            _ => None,
        }
    }

    /// Mutable access to the current sheet for operator edits. Only a
    /// Ready sheet is editable; a submitting one is not.
    pub fn sheet_mut(&mut self) -> Option<&mut AttendanceSheet> {
        match &mut self.state {
            CycleState::Ready { sheet, .. } => Some(sheet),
            _ => None,
        }
    }

    /// Start a cycle for `selection`, superseding whatever was in flight.
    ///
    /// Bumps the generation counter and enters Loading from any state;
    /// the previous sheet, if any, is dropped with the old state.
    pub fn begin(&mut self, selection: Selection) -> CycleTicket {
        self.generation += 1;
        self.selection = Some(selection);
        self.state = CycleState::Loading;

        tracing::debug!(
            generation = self.generation,
            classroom = selection.classroom,
            session = %selection.session,
            date = %selection.date,
            "Fetch cycle started"
        );

        CycleTicket {
            generation: self.generation,
        }
    }

    fn check_ticket(&self, ticket: CycleTicket) -> Result<()> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale cycle result"
            );
            return Err(Error::Stale);
        }
        Ok(())
    }

    /// Land the fetch-and-reconcile outcome for the cycle `ticket` belongs
    /// to.
    ///
    /// A result for a superseded cycle returns [`Error::Stale`] and leaves
    /// the visible state alone.
    pub fn complete_load(
        &mut self,
        ticket: CycleTicket,
        outcome: Result<AttendanceSheet>,
    ) -> Result<()> {
        self.check_ticket(ticket)?;

        self.state = match outcome {
            Ok(sheet) => CycleState::Ready {
                sheet,
                notice: None,
            },
            Err(err) => CycleState::LoadError(err.to_string()),
        };

        Ok(())
    }

    /// Move Ready into Submitting. Any other state has nothing to submit.
    pub fn begin_submit(&mut self) -> Result<CycleTicket> {
        match std::mem::replace(&mut self.state, CycleState::Idle) {
            CycleState::Ready { sheet, .. } => {
                self.state = CycleState::Submitting { sheet };
                Ok(CycleTicket {
                    generation: self.generation,
                })
            }
            other => {
                self.state = other;
                Err(Error::Submit(
                    "no reconciled sheet is ready to submit".to_string(),
                ))
            }
        }
    }

    /// Land the submission outcome. The sheet survives either way; only
    /// the notice differs. Stale tickets are discarded exactly like loads.
    pub fn complete_submit(
        &mut self,
        ticket: CycleTicket,
        outcome: Result<SubmitReceipt>,
    ) -> Result<()> {
        self.check_ticket(ticket)?;

        let sheet = match std::mem::replace(&mut self.state, CycleState::Idle) {
            CycleState::Submitting { sheet } => sheet,
            other => {
                self.state = other;
                return Err(Error::Submit("no submission in flight".to_string()));
            }
        };

        let notice = match outcome {
            Ok(receipt) => SubmitNotice::Accepted { rows: receipt.rows },
            Err(err) => SubmitNotice::Failed(err.to_string()),
        };

        self.state = CycleState::Ready {
            sheet,
            notice: Some(notice),
        };

        Ok(())
    }
}

impl Default for MarkingCycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Run both fetches for `selection` concurrently and reconcile once both
/// have resolved.
///
/// The reconciler is a join point, not a race: if either fetch fails,
/// reconciliation is skipped and that failure is surfaced. The roster is
/// returned alongside the sheet so the host can display names and roll
/// numbers next to the editable statuses.
pub async fn load_sheet(
    client: &ApiClient,
    credential: &Credential,
    selection: Selection,
) -> Result<(Vec<Student>, AttendanceSheet)> {
    let (roster, records) = tokio::try_join!(
        client.fetch_roster(credential, selection.classroom),
        client.fetch_attendance(
            credential,
            selection.classroom,
            selection.session,
            selection.date
        ),
    )?;

    let sheet = reconcile(&roster, &records);

    tracing::info!(
        classroom = selection.classroom,
        session = %selection.session,
        date = %selection.date,
        students = roster.len(),
        recorded = records.len(),
        "Reconciled attendance sheet"
    );

    Ok((roster, sheet))
}
