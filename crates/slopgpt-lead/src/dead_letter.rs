//! Append-only JSON-lines spool for leads no channel accepted.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use slopgpt_core::LeadRecord;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::dispatcher::DeliveryReport;
use crate::error::LeadError;

#[derive(Serialize)]
struct DeadLetter<'a> {
    id: Uuid,
    timestamp: String,
    lead: &'a LeadRecord,
    failures: Vec<Failure<'a>>,
}

#[derive(Serialize)]
struct Failure<'a> {
    channel: &'a str,
    error: &'a str,
}

#[derive(Debug, Clone)]
pub struct DeadLetterSpool {
    path: PathBuf,
}

impl DeadLetterSpool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record for `lead`, creating the file and its parent
    /// directories on first use.
    pub async fn append(
        &self,
        lead_id: Uuid,
        lead: &LeadRecord,
        report: &DeliveryReport,
    ) -> Result<(), LeadError> {
        let record = DeadLetter {
            id: lead_id,
            timestamp: Utc::now().to_rfc3339(),
            lead,
            failures: report
                .failures()
                .into_iter()
                .map(|(channel, error)| Failure { channel, error })
                .collect(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(
            lead_id = %lead_id,
            path = %self.path.display(),
            "Lead written to dead-letter spool"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelRole;
    use crate::dispatcher::{ChannelAttempt, ChannelOutcome};
    use serde_json::Value;

    fn failed_report() -> DeliveryReport {
        DeliveryReport {
            attempts: vec![ChannelAttempt {
                channel: "chatops",
                role: ChannelRole::Primary,
                outcome: ChannelOutcome::Failed("unexpected status 500: boom".into()),
            }],
        }
    }

    #[tokio::test]
    async fn test_append_creates_dirs_and_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spool").join("leads.jsonl");
        let spool = DeadLetterSpool::new(&path);

        let first_id = Uuid::new_v4();
        spool
            .append(first_id, &LeadRecord::new("Jane", "jane@x.com"), &failed_report())
            .await
            .unwrap();
        spool
            .append(Uuid::new_v4(), &LeadRecord::new("John", "john@x.com"), &failed_report())
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], first_id.to_string());
        assert_eq!(first["lead"]["name"], "Jane");
        assert_eq!(first["failures"][0]["channel"], "chatops");
        assert!(first["timestamp"].as_str().is_some());

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["lead"]["email"], "john@x.com");
    }

    #[tokio::test]
    async fn test_append_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let spool = DeadLetterSpool::new(dir.path());
        let err = spool
            .append(Uuid::new_v4(), &LeadRecord::new("Jane", "jane@x.com"), &failed_report())
            .await
            .unwrap_err();
        assert!(matches!(err, LeadError::DeadLetter(_)));
    }
}
