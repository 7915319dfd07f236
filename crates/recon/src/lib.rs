//! `streamgap-recon`: finds titles of an IMDB export that a streaming
//! catalog doesn't carry.
//!
//! Pure engine crate: receives CSV text, returns typed results. Remote
//! lookups go through the [`verify::SearchProbe`] trait; no HTTP client or
//! CLI dependencies here.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod extract;
pub mod load;
pub mod matcher;
pub mod model;
pub mod verify;

pub use config::{ReconConfig, UnidentifiedPolicy};
pub use engine::{reconcile, run, Reconciliation};
pub use error::{Dataset, ReconError};
pub use extract::extract_imdb_id;
pub use model::{
    CandidateRow, Catalog, CatalogRow, ConfirmedMissingRow, MissingBasis, ReconResult,
    StreamingRow,
};
pub use verify::{verify, AbsenceRule, CancelToken, MarkerRule, SearchProbe, Verdict};
