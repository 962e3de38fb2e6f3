//! Run command implementation

use anyhow::{Context, Result};
use std::path::PathBuf;
use zg_core::{FailureCategory, TermId};
use zg_pipeline::{LineagePipeline, RunMode, RunOutcome, RunOutput};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{catalog_access, load_project, open_sink, parse_list, ExitCode};
use crate::commands::terms::collect_terms;

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    let terms: Vec<TermId> = match &args.terms {
        Some(list) => parse_list(list).into_iter().map(TermId::new).collect(),
        None => collect_terms(&project)?,
    };
    if terms.is_empty() {
        println!("No terms to process.");
        return Ok(());
    }

    let pipeline =
        LineagePipeline::from_config(&project.config, &project.root, catalog_access(global))
            .context("Failed to set up term lookup")?;

    let outcome = if args.plan_only {
        let plan_path = match &args.output {
            Some(path) => PathBuf::from(path),
            None => project.path(&project.config.output.plan_csv),
        };
        pipeline.run(&terms, RunMode::PlanOnly(&plan_path)).await
    } else {
        let mut sink = open_sink(args.sink, &project)?;
        pipeline.run(&terms, RunMode::Persist(sink.as_mut())).await
    };

    let failures_path = project.path(&project.config.output.failures_csv);
    outcome
        .write_failures(&failures_path)
        .with_context(|| format!("Failed to write failure report {}", failures_path.display()))?;

    print_summary(&outcome, terms.len());
    println!("Failure report: {}", failures_path.display());

    match &outcome.output {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Output step failed: {}", e);
            Err(ExitCode(1).into())
        }
    }
}

fn print_summary(outcome: &RunOutcome, term_count: usize) {
    println!();
    println!(
        "Processed {} terms: {} tables, {} edges",
        term_count,
        outcome.graph.node_count(),
        outcome.graph.edge_count()
    );

    match &outcome.output {
        Ok(RunOutput::Persisted(summary)) => println!(
            "Persisted: {} new tables, {} new edges",
            summary.nodes_created, summary.edges_created
        ),
        Ok(RunOutput::Planned { path, rows }) => {
            println!("Plan: {} rows written to {}", rows, path.display())
        }
        Err(_) => {}
    }

    let counts = outcome.report.count_by_category();
    if counts.is_empty() {
        println!("No failures.");
        return;
    }
    for category in FailureCategory::ALL {
        if let Some(count) = counts.get(&category) {
            println!("  {:<18} {}", category, count);
        }
    }
}
