use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job vacancy to announce. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub experience: String,
    pub description: String,
    pub contact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    Pending,
    Sent,
    Failed,
    DryRun,
}

impl RecordStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RecordStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Sent => "sent",
            RecordStatus::Failed => "failed",
            RecordStatus::DryRun => "dry-run",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The durable outcome of one broadcast attempt sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BroadcastRecord {
    pub id: String,
    pub job: JobPosting,
    pub summary: String,
    pub channel: String,
    pub status: RecordStatus,
    pub attempts: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    pub dry_run: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent_at: Option<DateTime<Utc>>,
}

impl BroadcastRecord {
    pub fn pending(
        id: String,
        job: JobPosting,
        summary: String,
        channel: String,
        dry_run: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            job,
            summary,
            channel,
            status: RecordStatus::Pending,
            attempts: 0,
            errors: Vec::new(),
            dry_run,
            created_at: now,
            updated_at: now,
            last_sent_at: None,
        }
    }
}

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Mints a record id from the wall clock plus a process-wide sequence, so two
/// records created in the same nanosecond still get distinct ids.
pub fn next_record_id(now: DateTime<Utc>) -> String {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", nanos, seq)
}
