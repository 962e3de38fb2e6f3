//! Wipe command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, WipeArgs};
use crate::commands::common::{load_project, open_sink, ExitCode};

/// Execute the wipe command
pub async fn execute(args: &WipeArgs, global: &GlobalArgs) -> Result<()> {
    if !args.yes {
        eprintln!("Refusing to wipe the graph store without --yes");
        return Err(ExitCode(2).into());
    }

    let project = load_project(global)?;
    let mut sink = open_sink(args.sink, &project)?;
    sink.wipe()
        .with_context(|| format!("Failed to wipe the {} graph store", sink.name()))?;

    println!("Wiped the {} graph store", sink.name());
    Ok(())
}
