//! Terms command implementation

use anyhow::{Context, Result};
use zg_core::TermId;
use zg_locate::load_term_ids;

use crate::cli::{GlobalArgs, TermsArgs};
use crate::commands::common::{load_project, Project};

/// Term ids from the terms CSV and the mirror listing.
pub(crate) fn collect_terms(project: &Project) -> Result<Vec<TermId>> {
    let csv = project.path(&project.config.terms_csv);
    let mirror = project.path(&project.config.mirror.dir);
    load_term_ids(&csv, &mirror, &project.config.mirror.listing_glob)
        .with_context(|| format!("Failed to load terms from {}", csv.display()))
}

/// Execute the terms command
pub async fn execute(args: &TermsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let terms = collect_terms(&project)?;

    if args.count {
        println!("{}", terms.len());
        return Ok(());
    }
    for term in &terms {
        println!("{}", term);
    }
    Ok(())
}
