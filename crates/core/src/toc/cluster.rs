use std::fmt;

use serde::{Deserialize, Serialize};

use super::candidates::LineWithNumber;
use super::TocConfig;
use crate::grouping::{numbers_are_consecutive, only_uniques};

/// The validated table-of-contents region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocArea {
    /// Pages holding the TOC, in first-seen (and therefore ascending) order.
    pub pages: Vec<usize>,
    /// Numbered lines that make up the selected run.
    pub entries: Vec<LineWithNumber>,
}

impl TocArea {
    pub fn contains_page(&self, page: usize) -> bool {
        self.pages.contains(&page)
    }
}

/// Why a candidate sequence does not form a table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoCandidates,
    TooFewEntries(usize),
    PagesNotConsecutive(Vec<usize>),
    TooSparse { pages: usize, entries: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoCandidates => write!(f, "no numbered lines in the front pages"),
            Rejection::TooFewEntries(n) => write!(f, "longest ascending run has only {n} entries"),
            Rejection::PagesNotConsecutive(pages) => {
                write!(f, "run spans non-consecutive pages {pages:?}")
            }
            Rejection::TooSparse { pages, entries } => {
                write!(f, "{entries} entries spread over {pages} pages")
            }
        }
    }
}

/// Partition candidates into maximal non-decreasing runs, left to right. A
/// number smaller than its predecessor starts a new run.
pub fn ascending_runs(candidates: Vec<LineWithNumber>) -> Vec<Vec<LineWithNumber>> {
    let mut runs: Vec<Vec<LineWithNumber>> = Vec::new();
    for candidate in candidates {
        match runs.last_mut() {
            Some(run) if run.last().is_some_and(|prev| candidate.number >= prev.number) => {
                run.push(candidate);
            }
            _ => runs.push(vec![candidate]),
        }
    }
    runs
}

/// Longest run; the earliest one wins a tie.
fn longest_run(runs: Vec<Vec<LineWithNumber>>) -> Option<Vec<LineWithNumber>> {
    runs.into_iter()
        .reduce(|best, run| if run.len() > best.len() { run } else { best })
}

/// Decide whether the candidates describe a table of contents.
///
/// Picks the longest ascending run and accepts it only when it has enough
/// entries, sits on physically consecutive pages, and is dense enough that
/// the pages are not just scattered single hits.
pub fn find_toc_area(
    candidates: Vec<LineWithNumber>,
    config: &TocConfig,
) -> Result<TocArea, Rejection> {
    let entries = longest_run(ascending_runs(candidates)).ok_or(Rejection::NoCandidates)?;

    if entries.len() < config.min_entries {
        return Err(Rejection::TooFewEntries(entries.len()));
    }

    let pages = only_uniques(entries.iter().map(|entry| entry.page));
    if !numbers_are_consecutive(&pages) {
        return Err(Rejection::PagesNotConsecutive(pages));
    }

    if pages.len() * config.min_entries_per_page > entries.len() {
        return Err(Rejection::TooSparse {
            pages: pages.len(),
            entries: entries.len(),
        });
    }

    Ok(TocArea { pages, entries })
}
