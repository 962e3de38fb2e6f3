use super::*;
use crate::error::LocateError;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use zg_core::TermOrigin;

enum Answer {
    Hit(TermOrigin),
    Miss,
    Fail,
}

struct Scripted {
    answer: Answer,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn boxed(answer: Answer) -> (Box<dyn Locator>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let locator = Box::new(Scripted {
            answer,
            calls: Arc::clone(&calls),
        });
        (locator, calls)
    }
}

#[async_trait]
impl Locator for Scripted {
    async fn fetch(&self, id: &TermId) -> LocateResult<Option<TermRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Answer::Hit(origin) => Ok(Some(TermRecord::new(id.clone(), origin, json!({})))),
            Answer::Miss => Ok(None),
            Answer::Fail => Err(LocateError::Network("connection refused".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn term() -> TermId {
    TermId::new("T")
}

#[tokio::test]
async fn test_primary_hit_skips_secondary() {
    let (primary, _) = Scripted::boxed(Answer::Hit(TermOrigin::Mirror));
    let (secondary, secondary_calls) = Scripted::boxed(Answer::Hit(TermOrigin::Catalog));
    let chain = FallbackLocator::new(primary, secondary);

    let record = chain.fetch(&term()).await.unwrap().unwrap();
    assert_eq!(record.origin, TermOrigin::Mirror);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_primary_miss_uses_secondary() {
    let (primary, _) = Scripted::boxed(Answer::Miss);
    let (secondary, _) = Scripted::boxed(Answer::Hit(TermOrigin::Catalog));
    let chain = FallbackLocator::new(primary, secondary);

    let record = chain.fetch(&term()).await.unwrap().unwrap();
    assert_eq!(record.origin, TermOrigin::Catalog);
}

#[tokio::test]
async fn test_primary_error_treated_as_miss() {
    let (primary, _) = Scripted::boxed(Answer::Fail);
    let (secondary, _) = Scripted::boxed(Answer::Hit(TermOrigin::Catalog));
    let chain = FallbackLocator::new(primary, secondary);

    assert!(chain.fetch(&term()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_secondary_error_is_final() {
    let (primary, _) = Scripted::boxed(Answer::Miss);
    let (secondary, _) = Scripted::boxed(Answer::Fail);
    let chain = FallbackLocator::new(primary, secondary);

    assert!(chain.fetch(&term()).await.is_err());
}

#[tokio::test]
async fn test_double_miss_is_none() {
    let (primary, _) = Scripted::boxed(Answer::Miss);
    let (secondary, _) = Scripted::boxed(Answer::Miss);
    let chain = FallbackLocator::new(primary, secondary);

    assert!(chain.fetch(&term()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_primary_only_miss() {
    let (primary, calls) = Scripted::boxed(Answer::Fail);
    let chain = FallbackLocator::primary_only(primary);

    assert!(chain.fetch(&term()).await.unwrap().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
