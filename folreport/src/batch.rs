//! Parallel processing of dataset records.
//!
//! Each record (premises and a conclusion) is composed into its global conditional and
//! analysed independently. Records are handed out to a fixed set of crossbeam scoped workers
//! through a shared counter. Outcomes are collected under a mutex and sorted by record index
//! once all workers are done, so the summary does not depend on scheduling.
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::analysis::GlobalConditionalAnalysis;
use crate::config::{FailurePolicy, ReportConfig};
use crate::error::{ReportError, ReportResult};

/// One dataset entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub premises: Vec<String>,
    pub conclusion: String,
}

impl DatasetRecord {
    pub fn new<S: Into<String>>(premises: impl IntoIterator<Item = S>, conclusion: S) -> Self {
        Self {
            premises: premises.into_iter().map(Into::into).collect(),
            conclusion: conclusion.into(),
        }
    }

    /// Read one JSON record per line; blank lines are ignored.
    pub fn read_json_lines<R: BufRead>(reader: R) -> ReportResult<Vec<Self>> {
        let mut records = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                ReportError::invalid(format!("line {}", number + 1), e.to_string())
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Result for the record at `index` in the input slice.
#[derive(Debug)]
pub struct RecordOutcome {
    pub index: usize,
    pub result: ReportResult<GlobalConditionalAnalysis>,
}

/// Outcomes of a batch run, ordered by record index.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn analyses(&self) -> impl Iterator<Item = (usize, &GlobalConditionalAnalysis)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|a| (o.index, a)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &ReportError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.index, e)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchDriver {
    config: ReportConfig,
}

impl BatchDriver {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Compose and analyse a single record.
    ///
    /// A record without a conclusion is rejected with [`ReportError::InvalidRecord`].
    pub fn analyze(&self, record: &DatasetRecord) -> ReportResult<GlobalConditionalAnalysis> {
        if record.conclusion.trim().is_empty() {
            return Err(ReportError::invalid("/conclusion", "the conclusion is empty"));
        }
        GlobalConditionalAnalysis::compose(
            record.premises.as_slice(),
            &record.conclusion,
            self.config.parse_options(),
        )
    }

    /// Process every record.
    ///
    /// With [`FailurePolicy::Skip`] failures are kept in the summary. With
    /// [`FailurePolicy::Abort`] no new record is started after a failure, and the failure with
    /// the lowest index among those observed is returned.
    pub fn run(&self, records: &[DatasetRecord]) -> ReportResult<BatchSummary> {
        if records.is_empty() {
            return Ok(BatchSummary::default());
        }

        let workers = self.config.worker_count().min(records.len());
        let policy = self.config.failure_policy;
        info!(
            "Processing {} record(s) with {} worker(s), policy {:?}",
            records.len(),
            workers,
            policy
        );

        let next = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);
        let outcomes = Mutex::new(Vec::with_capacity(records.len()));

        crossbeam::scope(|s| {
            for _ in 0..workers {
                s.spawn(|_| {
                    loop {
                        if stop.load(Ordering::Acquire) {
                            break;
                        }
                        let index = next.fetch_add(1, Ordering::AcqRel);
                        let Some(record) = records.get(index) else {
                            break;
                        };

                        let result = self.analyze(record);
                        match &result {
                            Ok(_) => debug!("Record {index} analysed"),
                            Err(e) => {
                                warn!("Record {index} failed: {e}");
                                if policy.is_abort() {
                                    stop.store(true, Ordering::Release);
                                }
                            }
                        }
                        outcomes.lock().push(RecordOutcome { index, result });
                    }
                });
            }
        })
        .map_err(|_| ReportError::WorkerPanicked)?;

        let mut outcomes = outcomes.into_inner();
        outcomes.sort_by_key(|o| o.index);
        let summary = BatchSummary { outcomes };

        if policy.is_abort() && summary.failed() > 0 {
            let first = summary
                .outcomes
                .into_iter()
                .find_map(|o| o.result.err())
                .ok_or(ReportError::WorkerPanicked)?;
            return Err(first);
        }

        info!(
            "Batch finished: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        Ok(summary)
    }
}
