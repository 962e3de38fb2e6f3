//! The lineage run.

use crate::error::{PipelineError, PipelineResult};
use crate::export::{write_failures_csv, write_plan_csv};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Duration;
use zg_core::{Config, ExtractionFailure, FailureCategory, FailureReport, LineageGraph, TermId};
use zg_extract::{Extraction, TermExtractor};
use zg_graph::{GraphSink, UpsertSummary};
use zg_locate::{AtlasCredentials, AtlasLocator, FallbackLocator, Locator, MirrorLocator};

/// Term id under which run-level failures are recorded.
pub const RUN_TERM: &str = "*";

/// What to do with the aggregated graph.
pub enum RunMode<'a> {
    /// Upsert into a graph sink in one transaction
    Persist(&'a mut dyn GraphSink),
    /// Write the plan CSV only
    PlanOnly(&'a Path),
}

/// Result of a successful output step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    /// The graph was upserted
    Persisted(UpsertSummary),
    /// The plan CSV was written
    Planned { path: PathBuf, rows: usize },
}

/// Everything a run produced.
///
/// The graph and the report are kept even when the output step failed.
#[derive(Debug)]
pub struct RunOutcome {
    pub graph: LineageGraph,
    pub report: FailureReport,
    pub output: PipelineResult<RunOutput>,
}

impl RunOutcome {
    /// Whether the output step completed
    pub fn output_succeeded(&self) -> bool {
        self.output.is_ok()
    }

    /// Write the failure report next to the other run artifacts
    pub fn write_failures(&self, path: &Path) -> PipelineResult<usize> {
        write_failures_csv(&self.report, path)
    }
}

/// Catalog connection details supplied at run time.
#[derive(Debug, Clone, Default)]
pub struct CatalogAccess {
    /// Overrides `catalog.url` from the configuration
    pub url: Option<String>,
    pub credentials: Option<AtlasCredentials>,
}

/// Locates, extracts and aggregates lineage for a batch of terms.
pub struct LineagePipeline {
    locator: Box<dyn Locator>,
    extractor: TermExtractor,
    term_timeout: Duration,
    concurrency: usize,
}

impl LineagePipeline {
    /// Create a pipeline with a 60s per-term timeout and 4 terms in flight.
    pub fn new(locator: Box<dyn Locator>, extractor: TermExtractor) -> Self {
        Self {
            locator,
            extractor,
            term_timeout: Duration::from_secs(60),
            concurrency: 4,
        }
    }

    /// Set the per-term locator timeout
    pub fn with_term_timeout(mut self, timeout: Duration) -> Self {
        self.term_timeout = timeout;
        self
    }

    /// Set how many terms are fetched concurrently
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Build a pipeline from the configuration.
    ///
    /// The mirror directory is always consulted first. The catalog is added
    /// behind it when a URL is configured or supplied in `catalog`.
    pub fn from_config(
        config: &Config,
        root: &Path,
        catalog: CatalogAccess,
    ) -> PipelineResult<Self> {
        let mirror = MirrorLocator::open(config.resolve(root, &config.mirror.dir))?;
        log::debug!(
            "Mirror locator indexed {} files under {}",
            mirror.len(),
            mirror.root().display()
        );

        let locator = match catalog.url.or_else(|| config.catalog.url.clone()) {
            Some(url) => {
                let timeout = Duration::from_secs(
                    config
                        .catalog
                        .timeout_secs
                        .unwrap_or(config.locator_timeout_secs),
                );
                let atlas = AtlasLocator::new(&url, catalog.credentials, timeout)?;
                FallbackLocator::new(Box::new(mirror), Box::new(atlas))
            }
            None => {
                log::info!("No catalog URL configured, using the mirror directory only");
                FallbackLocator::primary_only(Box::new(mirror))
            }
        };

        Ok(Self::new(Box::new(locator), TermExtractor::from_config(config))
            .with_term_timeout(Duration::from_secs(config.locator_timeout_secs))
            .with_concurrency(config.concurrency))
    }

    async fn process(&self, index: usize, total: usize, id: &TermId) -> Extraction {
        log::info!("Processing term {}/{}: {}", index, total, id);

        let not_found = |message: String| {
            log::warn!("Skipping term {}: {}", id, message);
            Extraction {
                edges: Vec::new(),
                failures: vec![ExtractionFailure::new(
                    id.clone(),
                    FailureCategory::LocatorNotFound,
                    message,
                )],
            }
        };

        match tokio::time::timeout(self.term_timeout, self.locator.fetch(id)).await {
            Ok(Ok(Some(record))) => {
                let extraction = self.extractor.extract(&record);
                log::debug!(
                    "Term {} ({}): {} edges, {} failures",
                    id,
                    record.origin,
                    extraction.edges.len(),
                    extraction.failures.len()
                );
                extraction
            }
            Ok(Ok(None)) => not_found("term not found in any locator".to_string()),
            Ok(Err(e)) => not_found(e.to_string()),
            Err(_) => not_found(format!(
                "lookup timed out after {}s",
                self.term_timeout.as_secs()
            )),
        }
    }

    /// Locate and extract every term, aggregating in input order.
    pub async fn build(&self, term_ids: &[TermId]) -> (LineageGraph, FailureReport) {
        let total = term_ids.len();
        let mut graph = LineageGraph::new();
        let mut report = FailureReport::new();

        // `buffered` yields in input order, so aggregation stays deterministic.
        let extractions: Vec<Extraction> = stream::iter(term_ids.iter().enumerate())
            .map(|(i, id)| self.process(i + 1, total, id))
            .buffered(self.concurrency)
            .collect()
            .await;

        for extraction in extractions {
            graph.extend(extraction.edges.iter());
            report.extend(extraction.failures);
        }

        log::info!(
            "Extracted {} edges over {} tables from {} terms ({} failures)",
            graph.edge_count(),
            graph.node_count(),
            total,
            report.len()
        );
        (graph, report)
    }

    /// Build the graph, then run the output step selected by `mode`.
    ///
    /// An output failure is recorded as a `SinkWriteFailure` and returned in
    /// [`RunOutcome::output`]; it never discards the graph or the report.
    pub async fn run(&self, term_ids: &[TermId], mode: RunMode<'_>) -> RunOutcome {
        let (graph, mut report) = self.build(term_ids).await;

        let output = match mode {
            RunMode::Persist(sink) => {
                log::info!("Persisting lineage to the {} sink", sink.name());
                sink.upsert(&graph)
                    .map(RunOutput::Persisted)
                    .map_err(PipelineError::from)
            }
            RunMode::PlanOnly(path) => {
                log::info!("Running plan-only mode, output={}", path.display());
                write_plan_csv(&graph, path).map(|rows| RunOutput::Planned {
                    path: path.to_path_buf(),
                    rows,
                })
            }
        };

        if let Err(e) = &output {
            log::error!("Output step failed: {}", e);
            report.record(ExtractionFailure::new(
                TermId::new(RUN_TERM),
                FailureCategory::SinkWriteFailure,
                e.to_string(),
            ));
        }

        RunOutcome {
            graph,
            report,
            output,
        }
    }
}
