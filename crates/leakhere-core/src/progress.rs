//! Overall progress of one upload submission.
//!
//! Progress is split across the three network phases: the metadata request takes
//! 0..20, the object uploads 20..90 and the confirmation 90..100.

use std::collections::BTreeMap;

pub const REQUESTING_URLS_PROGRESS: u8 = 10;
pub const URLS_RECEIVED_PROGRESS: u8 = 20;
pub const OBJECT_UPLOAD_SPAN: u64 = 70;
pub const CONFIRMING_PROGRESS: u8 = 90;
pub const COMPLETE_PROGRESS: u8 = 100;

/// Orchestrator state, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadPhase {
    Idle,
    RequestingUrls,
    UploadingObjects,
    Confirming,
    Complete,
    Errored,
}

impl UploadPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            UploadPhase::RequestingUrls | UploadPhase::UploadingObjects | UploadPhase::Confirming
        )
    }
}

/// Overall percentage for `phase` given per-file upload percentages.
///
/// During `UploadingObjects` the value is `20 + floor(70 * sum / (100 * count))`, capped
/// at 90. With no files to upload the phase counts as finished.
pub fn overall_progress(phase: UploadPhase, per_file: &BTreeMap<usize, u8>) -> u8 {
    match phase {
        UploadPhase::Idle | UploadPhase::Errored => 0,
        UploadPhase::RequestingUrls => REQUESTING_URLS_PROGRESS,
        UploadPhase::UploadingObjects => {
            if per_file.is_empty() {
                return CONFIRMING_PROGRESS;
            }
            let sum: u64 = per_file.values().map(|p| u64::from((*p).min(100))).sum();
            let count = per_file.len() as u64;
            let scaled =
                u64::from(URLS_RECEIVED_PROGRESS) + OBJECT_UPLOAD_SPAN * sum / (100 * count);
            scaled.min(u64::from(CONFIRMING_PROGRESS)) as u8
        }
        UploadPhase::Confirming => CONFIRMING_PROGRESS,
        UploadPhase::Complete => COMPLETE_PROGRESS,
    }
}

/// Per-file progress map plus current phase for one submission.
///
/// Per-file values only ever grow, so events arriving out of order cannot make the
/// overall value go backwards.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    phase: UploadPhase,
    per_file: BTreeMap<usize, u8>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            phase: UploadPhase::Idle,
            per_file: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: UploadPhase) {
        self.phase = phase;
        if matches!(phase, UploadPhase::Idle | UploadPhase::Errored) {
            self.per_file.clear();
        }
    }

    /// Enter the upload phase with every listed file at 0%.
    pub fn begin_uploads(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.per_file = indices.into_iter().map(|i| (i, 0)).collect();
        self.phase = UploadPhase::UploadingObjects;
    }

    /// Record a progress tick. Unknown indices are ignored.
    pub fn record(&mut self, index: usize, percent: u8) {
        if let Some(current) = self.per_file.get_mut(&index) {
            *current = (*current).max(percent.min(100));
        }
    }

    /// Mark a file's upload as settled, whatever its outcome.
    pub fn settle(&mut self, index: usize) {
        self.record(index, 100);
    }

    pub fn overall(&self) -> u8 {
        overall_progress(self.phase, &self.per_file)
    }
}
