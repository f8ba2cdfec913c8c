//! Extraction-normalization pipeline for INE statistical tables.
//!
//! Routes each source code to its family rule, maps the fetched series onto
//! one of the three fact shapes, and writes the rows through any
//! [`StatStore`](ine_core::store::StatStore).
//!
//! ```text
//! fetch(code) ─▶ registry.route(code) ─▶ mapper::map_series ─▶ store.insert_facts
//!                                          │
//!                                          ├─ ine_labels::parse   (per series)
//!                                          ├─ family classifier   (filter + naming)
//!                                          └─ Resolver            (periods, dimensions)
//! ```

pub mod error;
pub mod fetch;
pub mod mapper;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod summary;

pub use error::{Error, Result};
pub use fetch::{FetchError, Fetcher};
pub use pipeline::Pipeline;
pub use registry::{Route, SourceRegistry};
pub use summary::{RunSummary, SourceOutcome, SourceSummary};
