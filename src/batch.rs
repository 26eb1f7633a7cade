//! Parallel evaluation of many résumés against one position.
//!
//! Each candidate is one unit: its text is read on the async runtime and the
//! CPU-bound evaluation runs under `tokio::task::spawn_blocking`. A semaphore
//! bounds the number of units in flight. The blocking evaluation holds its
//! permit until it returns, so a unit that timed out keeps its worker slot
//! until the abandoned evaluation finishes. A unit that fails, panics or times
//! out is recorded as that unit's error and the rest of the batch carries on.

use crate::config::BatchConfig;
use crate::engine::{Advisor, CandidateEvaluation};
use crate::error::{AdvisorError, Result};
use crate::input;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub enum BatchInput {
    File(PathBuf),
    Text { name: String, text: String },
}

impl BatchInput {
    pub fn name(&self) -> String {
        match self {
            BatchInput::File(path) => input::source_name(path),
            BatchInput::Text { name, .. } => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub source: String,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub position_id: String,
    pub total: usize,
    pub evaluations: Vec<CandidateEvaluation>,
    pub failures: Vec<BatchFailure>,
    pub failures_by_kind: BTreeMap<String, usize>,
    pub suitable: usize,
}

impl BatchSummary {
    fn from_results(position_id: &str, results: Vec<(String, Result<CandidateEvaluation>)>) -> Self {
        let total = results.len();
        let mut evaluations = Vec::new();
        let mut failures = Vec::new();
        let mut failures_by_kind: BTreeMap<String, usize> = BTreeMap::new();

        for (source, result) in results {
            match result {
                Ok(evaluation) => evaluations.push(evaluation),
                Err(e) => {
                    *failures_by_kind.entry(e.kind().to_string()).or_default() += 1;
                    failures.push(BatchFailure {
                        source,
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let suitable = evaluations.iter().filter(|e| e.prediction.is_suitable()).count();

        Self {
            position_id: position_id.to_string(),
            total,
            evaluations,
            failures,
            failures_by_kind,
            suitable,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.evaluations.len()
    }
}

pub struct BatchRunner {
    advisor: Arc<Advisor>,
    workers: usize,
    unit_timeout: Option<Duration>,
}

impl BatchRunner {
    pub fn new(advisor: Arc<Advisor>, config: &BatchConfig) -> Self {
        Self {
            advisor,
            workers: config.workers.max(1),
            unit_timeout: config.unit_timeout_secs.map(Duration::from_secs),
        }
    }

    pub async fn run(&self, inputs: Vec<BatchInput>, position_id: &str) -> Result<BatchSummary> {
        self.run_with_progress(inputs, position_id, |_| {}).await
    }

    /// Run the batch, calling `on_unit` with each unit's source name as its
    /// result is collected (in input order).
    pub async fn run_with_progress(
        &self,
        inputs: Vec<BatchInput>,
        position_id: &str,
        on_unit: impl Fn(&str),
    ) -> Result<BatchSummary> {
        // An unknown position fails the whole batch, not every unit
        let position_id = self.advisor.catalogs().positions.get(position_id)?.id.clone();
        info!("Evaluating {} candidates for {} with {} workers", inputs.len(), position_id, self.workers);

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(inputs.len());

        for unit in inputs {
            let name = unit.name();
            let advisor = Arc::clone(&self.advisor);
            let semaphore = Arc::clone(&semaphore);
            let position = position_id.clone();
            let timeout = self.unit_timeout;

            let handle = tokio::spawn(async move {
                let permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AdvisorError::BatchUnit(format!("worker pool closed: {}", e)))?;

                match timeout {
                    Some(limit) => tokio::time::timeout(limit, run_unit(advisor, unit, position, permit))
                        .await
                        .map_err(|_| AdvisorError::BatchUnit(format!("timed out after {}s", limit.as_secs())))?,
                    None => run_unit(advisor, unit, position, permit).await,
                }
            });
            handles.push((name, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(AdvisorError::BatchUnit(format!("unit aborted: {}", e))),
            };
            match &result {
                Ok(evaluation) => debug!("{}: {}", name, evaluation.prediction.recommendation_text),
                Err(e) => warn!("{}: {}", name, e),
            }
            on_unit(&name);
            results.push((name, result));
        }

        let summary = BatchSummary::from_results(&position_id, results);
        info!(
            "Batch finished: {} evaluated, {} failed, {} suitable",
            summary.succeeded(),
            summary.failures.len(),
            summary.suitable
        );
        Ok(summary)
    }
}

async fn run_unit(
    advisor: Arc<Advisor>,
    unit: BatchInput,
    position_id: String,
    permit: OwnedSemaphorePermit,
) -> Result<CandidateEvaluation> {
    let name = unit.name();
    let text = match unit {
        BatchInput::File(path) => input::extract_text(&path).await?,
        BatchInput::Text { text, .. } => text,
    };

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        advisor.evaluate(&text, &name, &position_id)
    })
    .await
        .map_err(|e| AdvisorError::BatchUnit(format!("evaluation panicked: {}", e)))?
}
