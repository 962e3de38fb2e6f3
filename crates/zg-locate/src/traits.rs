//! Locator trait definition

use crate::error::LocateResult;
use async_trait::async_trait;
use zg_core::{TermId, TermRecord};

/// Source of term records.
///
/// `Ok(None)` means the term is simply not there; `Err` means the lookup
/// itself broke (unreadable file, catalog down). Implementations must be
/// Send + Sync so the pipeline can fetch several terms at once.
#[async_trait]
pub trait Locator: Send + Sync {
    /// Fetch the record for a term
    async fn fetch(&self, id: &TermId) -> LocateResult<Option<TermRecord>>;

    /// Locator identifier for logging
    fn name(&self) -> &'static str;
}
