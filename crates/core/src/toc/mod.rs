//! Table-of-contents detection.
//!
//! # Pipeline
//!
//! ```text
//! items  ->  LineWithNumber[]  ->  TocArea  ->  tagged items
//!            collect_candidates    find_toc_area  annotate
//! ```
//!
//! The front pages are scanned for lines ending in a page reference. The
//! longest ascending run of those references, if it is long, dense and on
//! consecutive pages, marks the TOC. Entries and the heading lines that
//! belong to them are then tagged as [`ItemType::Toc`](crate::item::ItemType).

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::globals::Globals;
use crate::item::Item;
use crate::transform::{ItemResult, TransformContext, Transformer};

pub mod annotate;
pub mod candidates;
pub mod cluster;
pub mod number;

pub use annotate::{annotate, Annotation, TocStatistics};
pub use candidates::{collect_candidates, LineWithNumber};
pub use cluster::{find_toc_area, Rejection, TocArea};
pub use number::trailing_number;

pub const NO_TOC_MESSAGE: &str = "No Table of Contents found!";

/// Tuning knobs for TOC detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TocConfig {
    /// Pages scanned beyond the page-mapping offset. The scan also never goes
    /// past half of the document.
    pub front_matter_pages: usize,
    /// Lines must be longer than this (in characters) to count as entries.
    pub min_line_length: usize,
    /// Fewest entries an ascending run needs to be a TOC.
    pub min_entries: usize,
    /// Fewest entries per TOC page on average.
    pub min_entries_per_page: usize,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            front_matter_pages: 5,
            min_line_length: 5,
            min_entries: 3,
            min_entries_per_page: 5,
        }
    }
}

/// Pipeline stage that finds the table of contents and tags its lines.
#[derive(Debug, Clone, Default)]
pub struct DetectToc {
    config: TocConfig,
}

impl DetectToc {
    pub fn new(config: TocConfig) -> Self {
        DetectToc { config }
    }
}

impl Transformer for DetectToc {
    fn name(&self) -> &str {
        "Detect TOC"
    }

    fn description(&self) -> &str {
        "Detect table of contents."
    }

    fn required_columns(&self) -> &[&'static str] {
        &["x", "y", "str", "line"]
    }

    fn transform(
        &self,
        context: &TransformContext,
        items: Vec<Item>,
    ) -> Result<ItemResult, TransformError> {
        let mapping = context.page_mapping()?;

        let candidates = collect_candidates(&items, context.page_count, &mapping, &self.config);
        log::debug!("found {} TOC candidate lines", candidates.len());

        let area = match find_toc_area(candidates, &self.config) {
            Ok(area) => area,
            Err(rejection) => {
                log::debug!("no table of contents: {rejection}");
                return Ok(ItemResult {
                    items,
                    messages: vec![NO_TOC_MESSAGE.to_string()],
                    globals: Globals::default(),
                });
            }
        };

        let annotation = annotate(&items, &area);
        log::info!(
            "table of contents on pages {:?}: {} entries, {} lines",
            area.pages,
            area.entries.len(),
            annotation.toc_lines
        );

        Ok(ItemResult {
            items: annotation.items,
            messages: vec![format!("Detected {} TOC lines.", annotation.toc_lines)],
            globals: Globals {
                page_mapping: None,
                toc: Some(area),
            },
        })
    }
}
