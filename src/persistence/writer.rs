//! Append-only writer for response envelopes.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::capture::ResponseEnvelope;
use crate::config::PersistenceConfig;
use crate::observability::metrics;
use crate::persistence::stamp::ZoneStamper;

/// Error type for a single persist attempt.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("unknown timezone `{0}`")]
    Timezone(String),
    #[error("failed to create log directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to append to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("append did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Appends `<timestamp> | <json>` lines to one file per local calendar day.
///
/// Writes are not serialized across requests; each line goes out in a
/// single append-mode write.
#[derive(Debug, Clone)]
pub struct PersistenceWriter {
    enabled: bool,
    log_dir: PathBuf,
    write_timeout: Duration,
    stamper: ZoneStamper,
}

impl PersistenceWriter {
    pub fn new(config: &PersistenceConfig) -> Result<Self, PersistError> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| PersistError::Timezone(config.timezone.clone()))?;

        Ok(Self {
            enabled: config.enabled,
            log_dir: PathBuf::from(&config.log_dir),
            write_timeout: Duration::from_millis(config.write_timeout_ms),
            stamper: ZoneStamper {
                timezone,
                label_mode: config.label_mode,
                zone_label: config.zone_label.clone(),
            },
        })
    }

    /// Persist with the current time. Failures are logged and dropped.
    pub async fn persist(&self, envelope: &ResponseEnvelope) {
        self.persist_at(envelope, Utc::now()).await
    }

    pub async fn persist_at(&self, envelope: &ResponseEnvelope, now: DateTime<Utc>) {
        if !self.enabled {
            return;
        }

        match self.bounded_persist_at(envelope, now).await {
            Ok(path) => {
                metrics::record_persisted();
                tracing::debug!(path = %path.display(), "Envelope persisted");
            }
            Err(e) => {
                metrics::record_persist_failure();
                tracing::error!(error = %e, "Failed to persist envelope");
            }
        }
    }

    /// [`Self::try_persist_at`] cut off after `write_timeout`.
    pub async fn bounded_persist_at(
        &self,
        envelope: &ResponseEnvelope,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, PersistError> {
        tokio::time::timeout(self.write_timeout, self.try_persist_at(envelope, now))
            .await
            .map_err(|_| PersistError::TimedOut(self.write_timeout))?
    }

    /// Append one line for `envelope` and return the file written to.
    pub async fn try_persist_at(
        &self,
        envelope: &ResponseEnvelope,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, PersistError> {
        fs::create_dir_all(&self.log_dir)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: self.log_dir.clone(),
                source,
            })?;

        let stamp = self.stamper.stamp(now);
        let line = format!("{} | {}\n", stamp.timestamp, serde_json::to_string(envelope)?);
        let path = self.log_dir.join(&stamp.file_name);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| PersistError::Open {
                path: path.clone(),
                source,
            })?;

        let written = async {
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        };
        written.await.map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
