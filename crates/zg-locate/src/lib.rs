//! zg-locate - Term record lookup for zonegraph
//!
//! A [`Locator`] turns a term id into the raw metadata record describing a
//! flow job. Records come from a mirrored directory of JSON files or from the
//! live metadata catalog; [`FallbackLocator`] chains the two.

pub mod atlas;
pub mod error;
pub mod fallback;
pub mod mirror;
pub mod terms;
pub mod traits;

pub use atlas::{AtlasCredentials, AtlasLocator};
pub use error::{LocateError, LocateResult};
pub use fallback::FallbackLocator;
pub use mirror::MirrorLocator;
pub use terms::load_term_ids;
pub use traits::Locator;
