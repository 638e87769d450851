/*!
 * Concurrent probe scheduling and ordered result aggregation
 *
 * References fan out to a bounded pool of probe workers and fan back in
 * keyed by their original input index, so the manifest row order always
 * tracks input line order no matter how probes interleave. The pool
 * drives every reference to a terminal result even when earlier ones
 * fail; the writer only runs when the failure list is empty.
 */

use crate::config::ManifestConfig;
use crate::error::{ManifestError, Result};
use crate::input::{self, ObjectRef};
use crate::manifest::{self, ManifestRow};
use crate::probe::{probe_object, Failure, ProbeResult};
use crate::store::ObjectStore;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Aggregate outcome of one run
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Manifest rows for every successful probe, in input order
    pub rows: Vec<ManifestRow>,
    /// Every terminal failure, in input order
    pub failures: Vec<Failure>,
}

impl RunOutcome {
    /// A run succeeds only when no reference failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of references this run resolved
    pub fn total(&self) -> usize {
        self.rows.len() + self.failures.len()
    }
}

/// Probe every reference with at most `workers` transfers in flight,
/// returning results in input order.
pub async fn probe_all(
    store: Arc<dyn ObjectStore>,
    references: Vec<ObjectRef>,
    workers: usize,
) -> Vec<ProbeResult> {
    let workers = workers.max(1);
    let total = references.len();
    let semaphore = Arc::new(Semaphore::new(workers));

    let tasks: Vec<_> = references
        .into_iter()
        .enumerate()
        .map(|(index, object)| {
            let store = store.clone();
            let semaphore = semaphore.clone();
            async move {
                let _permit = semaphore.acquire().await.unwrap();
                let result = probe_object(store.as_ref(), &object).await;
                (index, result)
            }
        })
        .collect();

    let mut slots: Vec<Option<ProbeResult>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let mut completed = stream::iter(tasks).buffer_unordered(workers);
    while let Some((index, result)) = completed.next().await {
        slots[index] = Some(result);
    }

    slots
        .into_iter()
        .map(|slot| slot.expect("every reference resolves to exactly one result"))
        .collect()
}

/// Fan probe results and validation rejections back into one ordered
/// outcome, keyed by original line number.
pub fn aggregate(
    results: Vec<ProbeResult>,
    rejections: Vec<Failure>,
    authz: &str,
) -> RunOutcome {
    let mut rows = Vec::new();
    let mut failures = rejections;

    for result in results {
        match result {
            ProbeResult::Success(success) => rows.push(ManifestRow::from_probe(success, authz)),
            ProbeResult::Failure(failure) => failures.push(failure),
        }
    }

    failures.sort_by_key(|f| f.line_number);
    RunOutcome { rows, failures }
}

/// Run the whole pipeline: validate, probe, aggregate, and write the
/// manifest only when every reference succeeded.
pub async fn generate_manifest(
    config: &ManifestConfig,
    store: Arc<dyn ObjectStore>,
) -> Result<RunOutcome> {
    config.validate()?;

    let text = input::read_input(&config.input)?;
    let (references, rejections) = input::load_references(&text, config.skip_header);

    if references.is_empty() && rejections.is_empty() {
        return Err(ManifestError::NoReferences(config.input.clone()));
    }

    info!(
        references = references.len(),
        rejected = rejections.len(),
        workers = config.workers,
        "starting probe run"
    );

    let results = probe_all(store, references, config.workers).await;
    let outcome = aggregate(results, rejections, &config.authz);

    if outcome.is_success() {
        manifest::write_manifest(&config.output, &outcome.rows)?;
        info!(
            rows = outcome.rows.len(),
            output = %config.output.display(),
            "wrote manifest"
        );
    } else {
        for failure in &outcome.failures {
            warn!(%failure, "reference failed");
        }
    }

    Ok(outcome)
}
