//! Werstreamt.es search client, shared by the CLI and any other front end.
//!
//! One blocking GET per IMDB id against the site's search page. The page is
//! HTML meant for people, not an API: the client only returns the body and
//! leaves interpretation to an [`streamgap_recon::AbsenceRule`].
//!
//! No retries. No concurrency. No progress reporting.

mod client;

pub use client::{ClientError, WerstreamtClient};
