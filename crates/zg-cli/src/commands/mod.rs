//! CLI command implementations

pub(crate) mod common;
pub(crate) mod extract;
pub(crate) mod run;
pub(crate) mod terms;
pub(crate) mod wipe;
