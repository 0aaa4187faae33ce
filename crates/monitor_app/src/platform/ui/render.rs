use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use monitor_core::{AppViewModel, HistoryRowView, JobStatusView, Notification, Severity};

const BAR_WIDTH: usize = 20;

/// Lines for the in-flight panel, one per rendered job.
pub fn render_jobs(view: &AppViewModel) -> Vec<String> {
    if view.jobs.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "Active translations ({} polling)",
        view.in_flight_count
    )];
    lines.extend(view.jobs.iter().map(format_job_row));
    lines
}

/// Lines for the history table, replaced wholesale on every refresh.
pub fn render_history<Tz: TimeZone>(view: &AppViewModel, tz: &Tz) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    let mut lines = vec![format!("History ({} jobs)", view.history.len())];
    if view.history.is_empty() {
        lines.push("  (no translations yet)".to_string());
        return lines;
    }
    let name_width = view
        .history
        .iter()
        .map(|row| row.filename.chars().count())
        .max()
        .unwrap_or(0);
    lines.extend(
        view.history
            .iter()
            .map(|row| format_history_row(row, name_width, tz)),
    );
    lines
}

pub fn render_local_history(view: &AppViewModel) -> Vec<String> {
    render_history(view, &Local)
}

pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

fn format_job_row(job: &JobStatusView) -> String {
    let filled = usize::from(job.progress_percent) * BAR_WIDTH / 100;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let mut row = format!(
        "  {:<10} [{:<9}] [{bar}] {:>4}",
        job.title, job.badge_label, job.progress_label
    );
    if let Some(message) = &job.message {
        row.push_str("  ");
        row.push_str(message);
    }
    row
}

fn format_history_row<Tz: TimeZone>(row: &HistoryRowView, name_width: usize, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut line = format!(
        "  #{:<5} {:<name_width$}  {:<9}  {:<10}  {}",
        row.job_id,
        row.filename,
        row.language_pair,
        row.status_label,
        localize_timestamp(&row.created_at, tz),
    );
    if let Some(href) = &row.download_href {
        line.push_str("  download: ");
        line.push_str(href);
    }
    line
}

/// Formats a server timestamp in `tz`.
///
/// Timestamps without an offset are taken as UTC. Unparseable input is shown verbatim.
pub fn localize_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(tz).format(FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Utc
            .from_utc_datetime(&naive)
            .with_timezone(tz)
            .format(FORMAT)
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
