//! Upload orchestrator
//!
//! Drives one submission through `/upload`, the concurrent object PUTs and
//! `/confirm-upload`. Failures are folded into per-file results; only a rejected
//! metadata request aborts the whole submission.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use leakhere_core::metadata::build_upload_metadata;
use leakhere_core::models::{
    ConfirmPayload, ConfirmResponse, FileTypeCategory, SelectedFile, Session, UploadFormFields,
    UploadMetadata, UploadPayload, UploadResult, UploadSlot,
};
use leakhere_core::ports::{Notice, Notifier, ObjectUploader, ProgressCallback, UploadApi};
use leakhere_core::progress::{ProgressTracker, UploadPhase};
use leakhere_core::validation::{FileSelection, SelectionOutcome};
use leakhere_core::UploadError;
use tokio::sync::mpsc;

const SELECT_TYPE_FIRST: &str = "Please select a file type first.";
const FINALIZE_FAILED: &str = "Failed to finalize upload(s) on server.";
const CONFIRMATION_FAILED: &str = "Confirmation failed";
const PROCESS_FINISHED: &str = "Upload process finished. Check summary.";

/// Phase and overall percentage, as published to the progress observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub phase: UploadPhase,
    pub percent: u8,
}

pub type ProgressObserver = Arc<dyn Fn(ProgressSnapshot) + Send + Sync>;

/// Why `submit` refused to start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please select a file type first.")]
    NoCategory,

    #[error("Please select at least one file.")]
    NoFiles,

    #[error("An upload is already in progress.")]
    InFlight,
}

/// Outcome of one submission: exactly one result per selected file, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub results: Vec<UploadResult>,
}

impl UploadSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

/// Clears the in-flight flag when a submission ends, including when its future is
/// dropped before completing.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
enum ProgressEvent {
    Tick { index: usize, percent: u8 },
    Settled { index: usize },
}

/// Upload form state plus the workflow that submits it.
pub struct UploadOrchestrator {
    upload_api: Arc<dyn UploadApi>,
    objects: Arc<dyn ObjectUploader>,
    notifier: Arc<dyn Notifier>,
    category: Option<FileTypeCategory>,
    selection: FileSelection,
    form: UploadFormFields,
    tracker: ProgressTracker,
    observer: Option<ProgressObserver>,
    in_flight: Arc<AtomicBool>,
}

impl UploadOrchestrator {
    pub fn new(
        upload_api: Arc<dyn UploadApi>,
        objects: Arc<dyn ObjectUploader>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            upload_api,
            objects,
            notifier,
            category: None,
            selection: FileSelection::new(),
            form: UploadFormFields::default(),
            tracker: ProgressTracker::new(),
            observer: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Switching to a different category drops the current selection, since it was
    /// validated against the old one.
    pub fn set_category(&mut self, category: FileTypeCategory) {
        if self.category != Some(category) && !self.selection.is_empty() {
            tracing::debug!(
                from = ?self.category,
                to = %category,
                dropped = self.selection.len(),
                "Category changed, clearing selection"
            );
            self.selection.clear();
        }
        self.category = Some(category);
    }

    pub fn category(&self) -> Option<FileTypeCategory> {
        self.category
    }

    pub fn form_mut(&mut self) -> &mut UploadFormFields {
        &mut self.form
    }

    pub fn set_form(&mut self, form: UploadFormFields) {
        self.form = form;
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    /// Current phase. A submission whose future was dropped mid-flight reads as `Idle`.
    pub fn phase(&self) -> UploadPhase {
        if self.is_abandoned() {
            return UploadPhase::Idle;
        }
        self.tracker.phase()
    }

    pub fn progress(&self) -> u8 {
        if self.is_abandoned() {
            return 0;
        }
        self.tracker.overall()
    }

    /// The tracker still shows an in-flight phase but no submission is running.
    fn is_abandoned(&self) -> bool {
        self.tracker.phase().is_in_flight() && !self.in_flight.load(Ordering::Acquire)
    }

    pub fn set_progress_observer(
        &mut self,
        observer: impl Fn(ProgressSnapshot) + Send + Sync + 'static,
    ) {
        self.observer = Some(Arc::new(observer));
    }

    /// Validate and add files to the selection, raising one notice per rejected file.
    pub fn select_files(&mut self, incoming: Vec<SelectedFile>) -> SelectionOutcome {
        let Some(category) = self.category else {
            self.notifier.notify(Notice::info(SELECT_TYPE_FIRST));
            return SelectionOutcome::default();
        };

        let outcome = self.selection.add(incoming, category);
        for rejected in &outcome.rejected {
            tracing::info!(error = %UploadError::from(rejected.clone()), "File rejected");
            self.notifier.notify(Notice::error(rejected.notice_message()));
        }

        tracing::debug!(
            added = outcome.added,
            duplicates = outcome.duplicates,
            rejected = outcome.rejected.len(),
            selected = self.selection.len(),
            "Files selected"
        );
        outcome
    }

    pub fn remove_file(&mut self, index: usize) -> Option<SelectedFile> {
        self.selection.remove(index)
    }

    /// Back to a blank form.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.category = None;
        self.form = UploadFormFields::default();
        self.set_phase(UploadPhase::Idle);
    }

    /// Upload every selected file.
    ///
    /// Network failures never surface as `Err`; they end up in the per-file results.
    /// The selection is cleared once the submission completes. An aborted submission
    /// keeps it so it can be retried.
    #[tracing::instrument(skip(self, session), fields(file_count = self.selection.len()))]
    pub async fn submit(
        &mut self,
        session: Option<&Session>,
    ) -> Result<UploadSummary, SubmitError> {
        if self.in_flight.load(Ordering::Acquire) {
            return Err(SubmitError::InFlight);
        }
        let category = self.category.ok_or(SubmitError::NoCategory)?;
        if self.selection.is_empty() {
            return Err(SubmitError::NoFiles);
        }
        if self.is_abandoned() {
            tracing::warn!(phase = ?self.tracker.phase(), "Previous submission was dropped");
            self.set_phase(UploadPhase::Idle);
        }

        self.in_flight.store(true, Ordering::Release);
        let _in_flight = InFlightGuard(Arc::clone(&self.in_flight));

        let files = self.selection.files().to_vec();
        let metadata = build_upload_metadata(&files, &self.form, category, session);
        let is_batch = files.len() > 1;

        tracing::info!(category = %category, is_batch, "Starting upload");
        self.set_phase(UploadPhase::RequestingUrls);

        let slots = match self.request_slots(&metadata).await {
            Ok(slots) => slots,
            Err(err) => return Ok(self.abort(&metadata, err)),
        };

        let slots: HashMap<usize, UploadSlot> = slots
            .into_iter()
            .map(|slot| (slot.original_index, slot))
            .collect();
        let mut results: Vec<UploadResult> = metadata
            .iter()
            .map(|meta| UploadResult::from_slot(meta, slots.get(&meta.original_index)))
            .collect();

        for result in results.iter().filter(|r| !r.success) {
            tracing::warn!(
                file_name = %result.name,
                error = result.error.as_deref().unwrap_or_default(),
                "No upload target for file"
            );
        }

        let targets: Vec<(usize, String)> = results
            .iter()
            .filter(|r| r.success)
            .filter_map(|r| {
                slots
                    .get(&r.original_index)
                    .and_then(|slot| slot.upload_url.clone())
                    .map(|url| (r.original_index, url))
            })
            .collect();

        self.upload_objects(&files, &targets, &mut results).await;

        self.set_phase(UploadPhase::Confirming);
        self.confirm(&mut results, is_batch).await;

        self.set_phase(UploadPhase::Complete);
        self.selection.clear();

        let summary = UploadSummary { results };
        tracing::info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Upload finished"
        );
        self.notifier.notify(Notice::info(PROCESS_FINISHED));
        Ok(summary)
    }

    async fn request_slots(
        &self,
        metadata: &[UploadMetadata],
    ) -> Result<Vec<UploadSlot>, UploadError> {
        let payload = UploadPayload::from_metadata(metadata.to_vec());
        let response = self
            .upload_api
            .request_upload(&payload)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Upload request failed");
                UploadError::RequestFailure(e.client_message())
            })?;

        response.into_slots()
    }

    fn abort(&mut self, metadata: &[UploadMetadata], err: UploadError) -> UploadSummary {
        let message = err.to_string();
        tracing::error!(error = %message, "Upload aborted");

        self.set_phase(UploadPhase::Errored);
        self.notifier.notify(Notice::error(message.clone()));

        UploadSummary {
            results: metadata
                .iter()
                .map(|meta| UploadResult::failed(meta, message.clone()))
                .collect(),
        }
    }

    /// PUT every target concurrently and wait for all of them to settle.
    async fn upload_objects(
        &mut self,
        files: &[SelectedFile],
        targets: &[(usize, String)],
        results: &mut [UploadResult],
    ) {
        self.tracker.begin_uploads(targets.iter().map(|(index, _)| *index));
        self.emit();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let uploads = join_all(targets.iter().map(|(index, url)| {
            let index = *index;
            let objects = Arc::clone(&self.objects);
            let file = &files[index];
            let tx = tx.clone();
            async move {
                let ticks = tx.clone();
                let on_progress: ProgressCallback = Arc::new(move |percent| {
                    let _ = ticks.send(ProgressEvent::Tick { index, percent });
                });
                let outcome = objects.put_object(url, file, on_progress).await;
                let _ = tx.send(ProgressEvent::Settled { index });
                (index, outcome)
            }
        }));
        drop(tx);
        tokio::pin!(uploads);

        let outcomes = loop {
            tokio::select! {
                outcomes = &mut uploads => break outcomes,
                Some(event) = rx.recv() => self.apply(event),
            }
        };
        while let Ok(event) = rx.try_recv() {
            self.apply(event);
        }

        for (index, outcome) in outcomes {
            self.tracker.settle(index);
            if let Err(err) = outcome {
                tracing::warn!(
                    file_name = %files[index].name,
                    error = %err,
                    "Object upload failed"
                );
                if let Some(result) = results.get_mut(index) {
                    result.downgrade(UploadError::ObjectUploadFailure.to_string());
                }
            }
        }
        self.emit();
    }

    fn apply(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Tick { index, percent } => self.tracker.record(index, percent),
            ProgressEvent::Settled { index } => self.tracker.settle(index),
        }
        self.emit();
    }

    async fn confirm(&self, results: &mut [UploadResult], is_batch: bool) {
        let pending = pending_confirmations(results);
        if pending.is_empty() {
            tracing::info!("No successful uploads to confirm");
            return;
        }

        let mut file_ids: Vec<String> = Vec::with_capacity(pending.len());
        for (_, id) in &pending {
            if !file_ids.contains(id) {
                file_ids.push(id.clone());
            }
        }

        let payload = ConfirmPayload::new(file_ids.clone(), is_batch);
        match self.upload_api.confirm_upload(&payload).await {
            Ok(response) => apply_confirmation(results, &pending, &file_ids, response),
            Err(err) => {
                tracing::error!(error = %err, "Confirmation request failed");
                self.notifier.notify(Notice::error(FINALIZE_FAILED));
                downgrade_pending(results, &pending, CONFIRMATION_FAILED);
            }
        }
    }

    fn set_phase(&mut self, phase: UploadPhase) {
        self.tracker.set_phase(phase);
        self.emit();
    }

    fn emit(&self) {
        let snapshot = ProgressSnapshot {
            phase: self.tracker.phase(),
            percent: self.tracker.overall(),
        };
        tracing::trace!(phase = ?snapshot.phase, percent = snapshot.percent, "Upload progress");
        if let Some(observer) = &self.observer {
            observer(snapshot);
        }
    }
}

/// Positions and file ids of results still awaiting confirmation.
fn pending_confirmations(results: &[UploadResult]) -> Vec<(usize, String)> {
    results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.success)
        .filter_map(|(pos, r)| r.file_id.clone().map(|id| (pos, id)))
        .collect()
}

/// Pending results confirmed under `file_id`. Several slots may share one id.
fn positions_for<'a>(
    pending: &'a [(usize, String)],
    file_id: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    pending
        .iter()
        .filter(move |(_, id)| id == file_id)
        .map(|(pos, _)| *pos)
}

fn downgrade_pending(results: &mut [UploadResult], pending: &[(usize, String)], reason: &str) {
    for (pos, _) in pending {
        results[*pos].downgrade(reason);
    }
}

/// Fold a confirmation response into the pending results.
fn apply_confirmation(
    results: &mut [UploadResult],
    pending: &[(usize, String)],
    file_ids: &[String],
    response: ConfirmResponse,
) {
    let single_id = response.single_file_id();
    let single_link = response.single_share_link();

    match response.results {
        Some(entries) if response.is_batch => {
            for entry in entries {
                for pos in positions_for(pending, &entry.file_id) {
                    let result = &mut results[pos];
                    if !entry.success {
                        let reason = entry
                            .error
                            .clone()
                            .unwrap_or_else(|| CONFIRMATION_FAILED.to_string());
                        result.downgrade(UploadError::ConfirmationFailure(reason).to_string());
                    } else if result.success {
                        if let Some(link) = entry.share_link.clone() {
                            result.link = Some(link);
                        }
                    }
                }
            }
        }
        _ if response.success => {
            let id = single_id.or_else(|| file_ids.first().cloned());
            if let (Some(id), Some(link)) = (id, single_link) {
                for pos in positions_for(pending, &id) {
                    if results[pos].success {
                        results[pos].link = Some(link.clone());
                    }
                }
            }
        }
        _ => {
            tracing::warn!(
                message = ?response.message.or(response.error),
                "Confirmation reported failure"
            );
            downgrade_pending(results, pending, CONFIRMATION_FAILED);
        }
    }
}
