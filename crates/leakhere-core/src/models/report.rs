use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Copyright,
    Inappropriate,
    Spam,
    Other,
}

impl ReportReason {
    pub const ALL: [ReportReason; 4] = [
        ReportReason::Copyright,
        ReportReason::Inappropriate,
        ReportReason::Spam,
        ReportReason::Other,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            ReportReason::Copyright => "copyright",
            ReportReason::Inappropriate => "inappropriate",
            ReportReason::Spam => "spam",
            ReportReason::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportReason::Copyright => "Copyright Infringement",
            ReportReason::Inappropriate => "Inappropriate Content",
            ReportReason::Spam => "Spam or Misleading",
            ReportReason::Other => "Other",
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportReason {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportReason::ALL
            .into_iter()
            .find(|r| r.value().eq_ignore_ascii_case(s.trim()))
            .ok_or(InputError::MissingReportReason)
    }
}

/// Body of `POST /report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub file_id: String,
    pub reason: String,
    pub reported_at: DateTime<Utc>,
}

impl ReportRequest {
    /// Build a report; both a category and non-blank details are required.
    pub fn new(
        file_id: impl Into<String>,
        reason: Option<ReportReason>,
        details: &str,
        reported_at: DateTime<Utc>,
    ) -> Result<Self, InputError> {
        let reason = reason.ok_or(InputError::MissingReportReason)?;
        let details = details.trim();
        if details.is_empty() {
            return Err(InputError::BlankReportDetails);
        }

        Ok(Self {
            file_id: file_id.into(),
            reason: format!("Category: {}\n\nDetails: {}", reason.label(), details),
            reported_at,
        })
    }
}
