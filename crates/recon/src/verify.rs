//! Remote confirmation of candidate rows.
//!
//! Candidates are looked up one at a time, in order, with a fixed pause
//! between requests. A failed lookup never aborts the batch: the candidate
//! is marked unverifiable and left out of the result. The batch can be
//! stopped between lookups through a [`CancelToken`]; rows decided up to
//! that point are returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::config::{UnidentifiedPolicy, VerifyConfig, DEFAULT_NO_RESULTS_MARKER};
use crate::error::ReconError;
use crate::model::{CandidateRow, ConfirmedMissingRow, MissingBasis, ReconSummary};

/// Set to `true` to stop a running batch before its next lookup.
pub type CancelToken = Arc<AtomicBool>;

pub fn cancel_token() -> CancelToken {
    Arc::new(AtomicBool::new(false))
}

/// One search request against the remote catalog.
pub trait SearchProbe {
    /// Raw body of the search page for `imdb_id`.
    fn search(&self, imdb_id: &str) -> Result<String, ReconError>;
}

/// Decides from a search page whether the title is absent remotely.
pub trait AbsenceRule {
    fn is_confirmed_absent(&self, body: &str) -> bool;
}

/// Absent iff the page contains a fixed "no results" phrase.
#[derive(Debug, Clone)]
pub struct MarkerRule {
    marker: String,
}

impl MarkerRule {
    pub fn new(marker: impl Into<String>) -> Self {
        Self { marker: marker.into() }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for MarkerRule {
    fn default() -> Self {
        Self::new(DEFAULT_NO_RESULTS_MARKER)
    }
}

impl AbsenceRule for MarkerRule {
    fn is_confirmed_absent(&self, body: &str) -> bool {
        body.contains(&self.marker)
    }
}

/// Outcome of one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Remote search has no results: kept.
    Confirmed,
    /// Remote search found something: dropped.
    Refuted,
    /// Lookup failed: dropped, not retried.
    Unverifiable,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Refuted => write!(f, "refuted"),
            Self::Unverifiable => write!(f, "unverifiable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerifyProgress<'a> {
    pub completed: usize,
    pub total: usize,
    pub imdb_id: &'a str,
    pub verdict: Verdict,
}

#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Pause before every lookup but the first.
    pub delay: Duration,
    pub unidentified: UnidentifiedPolicy,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        VerifyOptions::from(&VerifyConfig::default())
    }
}

impl From<&VerifyConfig> for VerifyOptions {
    fn from(config: &VerifyConfig) -> Self {
        Self { delay: config.delay(), unidentified: config.unidentified }
    }
}

#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Result rows in catalog order.
    pub rows: Vec<ConfirmedMissingRow>,
    /// Catalog row index and verdict of every completed lookup.
    pub verdicts: Vec<(usize, Verdict)>,
    pub cancelled: bool,
}

impl VerifyReport {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.verdicts.iter().filter(|(_, v)| *v == verdict).count()
    }

    pub fn unidentified_kept(&self) -> usize {
        self.rows.iter().filter(|r| r.basis == MissingBasis::Unidentified).count()
    }

    /// Fold the verification counts into a summary from the reconcile step.
    pub fn apply_to(&self, summary: &mut ReconSummary) {
        summary.confirmed = self.count(Verdict::Confirmed);
        summary.refuted = self.count(Verdict::Refuted);
        summary.unverifiable = self.count(Verdict::Unverifiable);
        summary.unidentified_kept = self.unidentified_kept();
        summary.cancelled = self.cancelled;
    }
}

/// Look up every candidate that has an IMDB id and keep those the remote
/// service has no results for.
///
/// `progress` is called after each lookup with the running count over the
/// number of candidates that have an id.
pub fn verify<P, R, F>(
    candidates: &[CandidateRow],
    probe: &P,
    rule: &R,
    options: &VerifyOptions,
    cancel: &CancelToken,
    mut progress: F,
) -> VerifyReport
where
    P: SearchProbe + ?Sized,
    R: AbsenceRule + ?Sized,
    F: FnMut(&VerifyProgress<'_>),
{
    let total = candidates.iter().filter(|c| c.has_id()).count();
    let mut report = VerifyReport::default();
    let mut completed = 0;

    for candidate in candidates {
        if !candidate.has_id() {
            if options.unidentified == UnidentifiedPolicy::Keep {
                report.rows.push(ConfirmedMissingRow {
                    candidate: candidate.clone(),
                    basis: MissingBasis::Unidentified,
                });
            }
            continue;
        }

        if completed > 0 && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }
        if cancel.load(Ordering::Relaxed) {
            log::info!("verification cancelled after {completed} of {total} lookups");
            report.cancelled = true;
            break;
        }

        let verdict = lookup(probe, rule, &candidate.imdb_id);
        completed += 1;

        report.verdicts.push((candidate.row.index, verdict));
        if verdict == Verdict::Confirmed {
            report.rows.push(ConfirmedMissingRow {
                candidate: candidate.clone(),
                basis: MissingBasis::Confirmed,
            });
        }

        progress(&VerifyProgress {
            completed,
            total,
            imdb_id: &candidate.imdb_id,
            verdict,
        });
    }

    log::info!(
        "verified {completed} candidates: {} confirmed, {} refuted, {} unverifiable",
        report.count(Verdict::Confirmed),
        report.count(Verdict::Refuted),
        report.count(Verdict::Unverifiable),
    );
    report
}

fn lookup<P, R>(probe: &P, rule: &R, imdb_id: &str) -> Verdict
where
    P: SearchProbe + ?Sized,
    R: AbsenceRule + ?Sized,
{
    log::debug!("verifying {imdb_id}");
    match probe.search(imdb_id) {
        Ok(body) if rule.is_confirmed_absent(&body) => Verdict::Confirmed,
        Ok(_) => Verdict::Refuted,
        Err(e) => {
            log::warn!("{e}");
            Verdict::Unverifiable
        }
    }
}
