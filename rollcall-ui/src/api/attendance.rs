//! Attendance rows: per-triple fetch and batch submission

use super::{error_for_status, extract_detail, transport_error, ApiClient, Credential};
use crate::sheet::AttendanceSheet;
use chrono::NaiveDate;
use rollcall_common::{AttendanceRecord, AttendanceStatus, Error, Result, SessionType};
use serde::Serialize;

/// One wire row of the batch POST body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRow {
    pub student: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub att_type: SessionType,
}

/// Confirmation of an accepted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Number of rows the backend accepted in this batch
    pub rows: usize,
}

/// Serialize a sheet into batch rows sharing one date and session.
///
/// Row order follows the sheet's ascending-student-id iteration, so the
/// payload for a given sheet is deterministic.
pub fn batch_rows(
    sheet: &AttendanceSheet,
    session: SessionType,
    date: NaiveDate,
) -> Vec<SubmissionRow> {
    sheet
        .iter()
        .map(|(student, status)| SubmissionRow {
            student,
            date,
            status,
            att_type: session,
        })
        .collect()
}

impl ApiClient {
    /// Fetch the attendance rows already recorded for one
    /// (classroom, session, date) triple.
    ///
    /// Independent of the roster fetch; callers decide the ordering.
    pub async fn fetch_attendance(
        &self,
        credential: &Credential,
        classroom_id: i64,
        session: SessionType,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let url = format!(
            "{}/attendance/?classroom={}&att_type={}&date={}",
            self.base_url(),
            classroom_id,
            session.att_token(),
            date.format("%Y-%m-%d"),
        );

        tracing::debug!(
            classroom = classroom_id,
            session = %session,
            date = %date,
            url = %url,
            "Fetching recorded attendance"
        );

        let response = self
            .http()
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, credential.header_value())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(response).await);
        }

        let records: Vec<AttendanceRecord> =
            response.json().await.map_err(|e| Error::Server {
                status: status.as_u16(),
                detail: format!("malformed attendance payload: {}", e),
            })?;

        tracing::debug!(
            classroom = classroom_id,
            records = records.len(),
            "Recorded attendance fetched"
        );

        Ok(records)
    }

    /// Submit every entry of `sheet` as one batch for the shared session
    /// and date.
    ///
    /// The batch is all-or-nothing from the caller's perspective: apart
    /// from a credential rejection ([`Error::Auth`]), any failure is
    /// reported as a single aggregate [`Error::Submit`] carrying the
    /// backend's detail text when present. Nothing is retried, and the
    /// sheet is left for the caller to keep or discard.
    pub async fn submit_attendance(
        &self,
        credential: &Credential,
        classroom_id: i64,
        session: SessionType,
        date: NaiveDate,
        sheet: &AttendanceSheet,
    ) -> Result<SubmitReceipt> {
        let rows = batch_rows(sheet, session, date);
        let url = format!("{}/attendance/", self.base_url());

        tracing::info!(
            classroom = classroom_id,
            session = %session,
            date = %date,
            rows = rows.len(),
            "Submitting attendance batch"
        );

        let response = self
            .http()
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, credential.header_value())
            .json(&rows)
            .send()
            .await
            .map_err(|e| Error::Submit(transport_error(e).to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(error_for_status(response).await);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            let message = if detail.is_empty() {
                format!("backend rejected batch ({})", status)
            } else {
                detail
            };
            return Err(Error::Submit(message));
        }

        tracing::info!(rows = rows.len(), "Attendance batch accepted");

        Ok(SubmitReceipt { rows: rows.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::reconcile;
    use rollcall_common::Student;

    fn student(id: i64) -> Student {
        Student {
            id,
            name: format!("Student {}", id),
            roll_number: id,
            classroom: 1,
        }
    }

    #[test]
    fn test_batch_rows_share_date_and_session() {
        let roster = [student(2), student(1)];
        let sheet = reconcile(&roster, &[]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        let rows = batch_rows(&sheet, SessionType::Evening, date);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.date, date);
            assert_eq!(row.att_type, SessionType::Evening);
        }
        // Ascending student id regardless of roster order
        assert_eq!(rows[0].student, 1);
        assert_eq!(rows[1].student, 2);
    }

    #[test]
    fn test_submission_row_wire_shape() {
        let row = SubmissionRow {
            student: 7,
            date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            status: AttendanceStatus::LeaveSw,
            att_type: SessionType::Evening,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "student": 7,
                "date": "2024-03-11",
                "status": "leave-sw",
                "att_type": "evening_att"
            })
        );
    }

    #[test]
    fn test_empty_sheet_serializes_empty_batch() {
        let sheet = reconcile(&[], &[]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let rows = batch_rows(&sheet, SessionType::Morning, date);
        assert!(rows.is_empty());
        assert_eq!(serde_json::to_string(&rows).unwrap(), "[]");
    }
}
