//! Two-stage locator chain.

use crate::error::LocateResult;
use crate::traits::Locator;
use async_trait::async_trait;
use zg_core::{TermId, TermRecord};

/// Asks `primary` first and `secondary` only when the primary misses.
///
/// A primary error is logged and treated as a miss. Whatever the secondary
/// returns, including an error, is final.
pub struct FallbackLocator {
    primary: Box<dyn Locator>,
    secondary: Option<Box<dyn Locator>>,
}

impl FallbackLocator {
    /// Chain two locators
    pub fn new(primary: Box<dyn Locator>, secondary: Box<dyn Locator>) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Wrap a single locator (no catalog configured)
    pub fn primary_only(primary: Box<dyn Locator>) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }
}

#[async_trait]
impl Locator for FallbackLocator {
    async fn fetch(&self, id: &TermId) -> LocateResult<Option<TermRecord>> {
        match self.primary.fetch(id).await {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => {}
            Err(e) => log::warn!("{} lookup failed for {}: {}", self.primary.name(), id, e),
        }

        match &self.secondary {
            Some(secondary) => {
                log::debug!(
                    "Term {} not in {}, asking {}",
                    id,
                    self.primary.name(),
                    secondary.name()
                );
                secondary.fetch(id).await
            }
            None => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;
