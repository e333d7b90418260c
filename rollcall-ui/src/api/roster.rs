//! Classroom roster retrieval

use super::{error_for_status, transport_error, ApiClient, Credential};
use rollcall_common::{Error, Result, Student};

impl ApiClient {
    /// Fetch the students of one classroom.
    ///
    /// A classroom with no students is `Ok` with an empty vec, not an
    /// error. Failures are surfaced to the caller, never retried.
    pub async fn fetch_roster(
        &self,
        credential: &Credential,
        classroom_id: i64,
    ) -> Result<Vec<Student>> {
        let url = format!("{}/classrooms/{}/students/", self.base_url(), classroom_id);

        tracing::debug!(classroom = classroom_id, url = %url, "Fetching classroom roster");

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

        let roster: Vec<Student> = response.json().await.map_err(|e| Error::Server {
            status: status.as_u16(),
            detail: format!("malformed roster payload: {}", e),
        })?;

        tracing::debug!(
            classroom = classroom_id,
            students = roster.len(),
            "Roster fetched"
        );

        Ok(roster)
    }
}
