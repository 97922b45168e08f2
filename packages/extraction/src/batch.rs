//! Batch runner: drives the extractor over a set of documents, one at a time.
//!
//! Each item moves `Pending -> Processing -> Completed | Error`; `Error`
//! items go back to `Processing` on retry. Documents are processed strictly
//! in insertion order with a single request in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::traits::extractor::Extractor;
use crate::types::{
    document::{sha256_hex, DocumentPayload},
    field::Field,
    outcome::{ErrorKind, ExtractionOutcome, ExtractionResult, FieldWarning},
};

/// Per-document lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// One document in a batch and its latest result.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: String,
    pub file_name: String,
    pub sha256: String,
    pub document: DocumentPayload,
    pub status: DocumentStatus,
    pub result: Option<ExtractionResult>,
    pub warnings: Vec<FieldWarning>,
    pub error: Option<(ErrorKind, String)>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl BatchItem {
    /// Create a pending item; `sha256` identifies the file content.
    pub fn new(
        file_name: impl Into<String>,
        sha256: impl Into<String>,
        document: DocumentPayload,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            sha256: sha256.into(),
            document,
            status: DocumentStatus::Pending,
            result: None,
            warnings: Vec::new(),
            error: None,
            processed_at: None,
        }
    }

    /// Create a pending item from raw file bytes, hashing them.
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Self {
        let sha256 = sha256_hex(&bytes);
        Self::new(file_name, sha256, DocumentPayload::from_bytes(bytes, mime_type))
    }

    fn apply(&mut self, outcome: ExtractionOutcome) {
        self.processed_at = Some(Utc::now());
        match outcome {
            ExtractionOutcome::Success(extraction) => {
                self.status = DocumentStatus::Completed;
                self.result = Some(extraction.values);
                self.warnings = extraction.warnings;
                self.error = None;
            }
            ExtractionOutcome::Failure(failure) => {
                self.status = DocumentStatus::Error;
                self.result = None;
                self.warnings.clear();
                self.error = Some((failure.kind, failure.message));
            }
        }
    }
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Ordered collection of documents processed against one template.
#[derive(Debug, Default)]
pub struct BatchRunner {
    items: Vec<BatchItem>,
    running: bool,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document; returns its id.
    pub fn add(&mut self, item: BatchItem) -> String {
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Exclude a document from later runs.
    pub fn remove(&mut self, id: &str) -> Option<BatchItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [BatchItem] {
        &mut self.items
    }

    pub fn get(&self, id: &str) -> Option<&BatchItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// True while a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Indices a run would process, in order.
    ///
    /// Pending and errored documents when there are any (skipping those
    /// already processing); otherwise every document, as a full rerun.
    pub fn selection(&self) -> Vec<usize> {
        let needs_work = self
            .items
            .iter()
            .any(|item| matches!(item.status, DocumentStatus::Pending | DocumentStatus::Error));

        if needs_work {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| {
                    matches!(item.status, DocumentStatus::Pending | DocumentStatus::Error)
                })
                .map(|(index, _)| index)
                .collect()
        } else {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.status != DocumentStatus::Processing)
                .map(|(index, _)| index)
                .collect()
        }
    }

    /// Run the selection sequentially.
    pub async fn run<E: Extractor + ?Sized>(
        &mut self,
        extractor: &E,
        fields: &[Field],
    ) -> BatchSummary {
        self.run_with(extractor, fields, |_| {}).await
    }

    /// Run the selection, calling `on_update` after each state change.
    ///
    /// A failing document never stops the batch.
    pub async fn run_with<E, F>(
        &mut self,
        extractor: &E,
        fields: &[Field],
        mut on_update: F,
    ) -> BatchSummary
    where
        E: Extractor + ?Sized,
        F: FnMut(&BatchItem),
    {
        let selection = self.selection();
        let mut summary = BatchSummary::default();
        if selection.is_empty() {
            return summary;
        }

        self.running = true;
        info!(documents = selection.len(), total = self.items.len(), "Batch started");

        for index in selection {
            let item = &mut self.items[index];
            let ok = process_item(item, extractor, fields, &mut on_update).await;

            summary.processed += 1;
            if ok {
                summary.completed += 1;
            } else {
                summary.failed += 1;
            }
        }

        self.running = false;
        info!(
            processed = summary.processed,
            completed = summary.completed,
            failed = summary.failed,
            "Batch finished"
        );
        summary
    }

    /// Reprocess a single document regardless of its status.
    ///
    /// Returns `None` when the id is unknown or the document is already processing.
    pub async fn retry<E: Extractor + ?Sized>(
        &mut self,
        id: &str,
        extractor: &E,
        fields: &[Field],
    ) -> Option<DocumentStatus> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        if item.status == DocumentStatus::Processing {
            return None;
        }

        self.running = true;
        process_item(item, extractor, fields, &mut |_: &BatchItem| {}).await;
        self.running = false;
        Some(item.status)
    }
}

async fn process_item<E, F>(
    item: &mut BatchItem,
    extractor: &E,
    fields: &[Field],
    on_update: &mut F,
) -> bool
where
    E: Extractor + ?Sized,
    F: FnMut(&BatchItem),
{
    item.status = DocumentStatus::Processing;
    on_update(item);

    let span = info_span!("document", file = %item.file_name, sha256 = %item.sha256);
    let outcome = extractor.extract(&item.document, fields).instrument(span).await;

    if let ExtractionOutcome::Failure(failure) = &outcome {
        warn!(
            file = %item.file_name,
            kind = %failure.kind,
            error = %failure.message,
            "Document failed"
        );
    }
    item.apply(outcome);
    on_update(item);

    item.status == DocumentStatus::Completed
}
