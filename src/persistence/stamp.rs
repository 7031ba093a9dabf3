//! Day-partitioned file names and line timestamps.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::LabelMode;

/// Where and with which timestamp a line written at some instant belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStamp {
    /// `response_log_<YYYY>_<MM>_<DD>.txt`, by local calendar date.
    pub file_name: String,
    /// `<YYYY>-<MM>-<DD> <hh>:<mm>:<ss> <label>`.
    pub timestamp: String,
}

/// Zone suffix policy and the timezone it applies to.
#[derive(Debug, Clone)]
pub struct ZoneStamper {
    pub timezone: Tz,
    pub label_mode: LabelMode,
    pub zone_label: String,
}

impl ZoneStamper {
    pub fn stamp(&self, now: DateTime<Utc>) -> LogStamp {
        let local = now.with_timezone(&self.timezone);
        let label = match self.label_mode {
            LabelMode::Fixed => self.zone_label.clone(),
            LabelMode::Observed => local.format("%Z").to_string(),
        };

        LogStamp {
            file_name: local.format("response_log_%Y_%m_%d.txt").to_string(),
            timestamp: format!("{} {}", local.format("%Y-%m-%d %H:%M:%S"), label),
        }
    }
}
