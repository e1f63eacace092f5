use serde::{Deserialize, Serialize};

use super::number::trailing_number;
use super::TocConfig;
use crate::globals::PageMapping;
use crate::grouping::{group_by_line, group_by_page};
use crate::item::{line_text, Item, ItemId};

/// A line whose text ends in a plausible page reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineWithNumber {
    pub page: usize,
    /// Identifier of the first item on the line.
    pub item_id: ItemId,
    pub number: u32,
}

/// Last page examined for TOC candidates. Fractional when the page count is
/// odd, so callers compare against it as a float.
pub fn max_page_to_evaluate(page_count: usize, mapping: &PageMapping, config: &TocConfig) -> f64 {
    let front_matter = config
        .front_matter_pages
        .saturating_add(mapping.page_factor.unsigned_abs() as usize);
    (page_count as f64 / 2.0).min(front_matter as f64)
}

/// Highest number that can still refer to an existing page.
pub fn page_number_limit(page_count: usize, mapping: &PageMapping) -> i64 {
    (page_count as i64)
        .saturating_add(mapping.page_factor)
        .saturating_sub(1)
}

/// Scan the front pages for lines ending in a page reference.
///
/// Candidates come back in document order. Lines that are too short to hold a
/// title (bare page footers, lone numbers) are skipped, as are numbers that
/// are zero or point past the end of the document.
pub fn collect_candidates(
    items: &[Item],
    page_count: usize,
    mapping: &PageMapping,
    config: &TocConfig,
) -> Vec<LineWithNumber> {
    let max_page = max_page_to_evaluate(page_count, mapping, config);
    let limit = page_number_limit(page_count, mapping);

    let mut candidates = Vec::new();
    for page_items in group_by_page(items) {
        let page = page_items[0].page;
        if page < 1 || page as f64 > max_page {
            continue;
        }

        for line in group_by_line(page_items) {
            if let Some(candidate) = candidate_from_line(line, limit, config) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

fn candidate_from_line(line: &[Item], limit: i64, config: &TocConfig) -> Option<LineWithNumber> {
    let first = line.first()?;
    let text = line_text(line);
    if text.chars().count() <= config.min_line_length {
        return None;
    }

    let number = trailing_number(&text)?;
    if number == 0 || i64::from(number) > limit {
        return None;
    }

    Some(LineWithNumber {
        page: first.page,
        item_id: first.id,
        number,
    })
}
