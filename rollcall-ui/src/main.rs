//! rollcall-ui - operator CLI for marking classroom attendance
//!
//! Fetches the roster and recorded attendance for one (classroom,
//! session, date) triple, reconciles them into an editable sheet, applies
//! operator overrides, and optionally submits the batch.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rollcall_common::config::resolve_config;
use rollcall_common::types::{AttendanceStatus, SessionType};
use rollcall_ui::{
    load_sheet, ApiClient, Credential, CycleState, MarkingCycle, Selection, SubmitNotice,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "rollcall-ui",
    version,
    about = "Mark classroom attendance against the rollcall backend"
)]
struct Args {
    /// Classroom id to mark attendance for
    #[arg(long)]
    classroom: i64,

    /// Calendar date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Attendance session (morning or evening)
    #[arg(long, default_value = "morning")]
    session: SessionType,

    /// Override one student's status, as STUDENT_ID=STATUS (repeatable)
    #[arg(long = "set", value_name = "STUDENT_ID=STATUS")]
    set: Vec<String>,

    /// Submit the sheet after applying overrides
    #[arg(long)]
    submit: bool,

    /// Backend base URL (falls back to ROLLCALL_BASE_URL, the config
    /// file, then the compiled default)
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "ROLLCALL_TOKEN", hide_env_values = true)]
    token: String,
}

/// Parse one `STUDENT_ID=STATUS` override argument.
fn parse_override(raw: &str) -> Result<(i64, AttendanceStatus)> {
    let (id, status) = raw
        .split_once('=')
        .with_context(|| format!("override '{}' is not STUDENT_ID=STATUS", raw))?;
    let id: i64 = id
        .trim()
        .parse()
        .with_context(|| format!("override '{}': student id is not a number", raw))?;
    let status: AttendanceStatus = status
        .trim()
        .parse()
        .map_err(|e: String| anyhow::anyhow!("override '{}': {}", raw, e))?;
    Ok((id, status))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting rollcall attendance client v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // Fail on malformed overrides before any network round trip
    let overrides = args
        .set
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>>>()?;

    let config = resolve_config(args.base_url.as_deref())?;
    info!("Backend: {}", config.base_url);

    let client = ApiClient::new(&config.base_url, config.timeout_secs)?;
    let credential = Credential::new(args.token);

    let selection = Selection {
        classroom: args.classroom,
        session: args.session,
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    };

    let mut cycle = MarkingCycle::new();
    let ticket = cycle.begin(selection);
    let (roster, outcome) = match load_sheet(&client, &credential, selection).await {
        Ok((roster, sheet)) => (roster, Ok(sheet)),
        Err(err) => (Vec::new(), Err(err)),
    };
    if cycle.complete_load(ticket, outcome).is_err() {
        // A single linear cycle cannot be superseded
        bail!("fetch cycle superseded unexpectedly");
    }

    if let CycleState::LoadError(detail) = cycle.state() {
        error!("Failed to load attendance data: {}", detail);
        bail!("failed to load attendance data: {}", detail);
    }

    {
        let sheet = cycle
            .sheet_mut()
            .context("no attendance sheet after load")?;
        for (student_id, status) in overrides {
            sheet
                .set_status(student_id, status)
                .with_context(|| format!("cannot override student {}", student_id))?;
        }
    }

    let sheet = cycle.sheet().context("no attendance sheet after load")?;
    println!(
        "Attendance for classroom {} on {} ({} session)",
        selection.classroom, selection.date, selection.session
    );
    if roster.is_empty() {
        println!("  (no students in this classroom)");
    }
    for student in &roster {
        if let Some(status) = sheet.status(student.id) {
            println!("  {:>4}  {:<24}  {}", student.roll_number, student.name, status);
        }
    }

    if args.submit {
        let sheet = sheet.clone();
        let ticket = cycle.begin_submit()?;
        let outcome = client
            .submit_attendance(
                &credential,
                selection.classroom,
                selection.session,
                selection.date,
                &sheet,
            )
            .await;
        if cycle.complete_submit(ticket, outcome).is_err() {
            bail!("submit cycle superseded unexpectedly");
        }

        match cycle.state() {
            CycleState::Ready {
                notice: Some(SubmitNotice::Accepted { rows }),
                ..
            } => {
                println!("Attendance marked successfully! ({} rows)", rows);
            }
            CycleState::Ready {
                notice: Some(SubmitNotice::Failed(detail)),
                ..
            } => {
                // The notice text already carries the submit-failure prefix
                error!("{}", detail);
                bail!("{}", detail);
            }
            _ => {}
        }
    }

    Ok(())
}
