//! Tagging of the lines that belong to a detected table of contents.
//!
//! Numbered entries are always tagged. Lines without a number that sit just
//! above an entry (wrapped titles, chapter headings inside the TOC) are tagged
//! too, as long as they are no taller than the entries and no further away
//! than the widest gap seen between two entries.

use std::collections::HashSet;

use super::cluster::TocArea;
use crate::grouping::{group_by_line, group_by_page, only_uniques, transform_grouped_by_page};
use crate::item::{line_height, Item, ItemId, ItemType};

/// Annotated item stream and the number of lines that received the tag.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub items: Vec<Item>,
    pub toc_lines: usize,
}

/// Area-wide measurements taken before any page is annotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TocStatistics {
    /// Height of the tallest numbered line, `None` if no entry has a height.
    pub max_height_of_numbered_lines: Option<f64>,
    /// Most non-numbered lines ever found directly above a numbered line.
    pub max_lines_between_lines_with_numbers: usize,
}

impl TocStatistics {
    pub fn compute(items: &[Item], area: &TocArea, numbered: &HashSet<ItemId>) -> Self {
        let mut heights = Vec::new();
        let mut gaps = Vec::new();

        for page_items in group_by_page(items) {
            if !area.contains_page(page_items[0].page) {
                continue;
            }

            let mut gap = 0;
            for line in group_by_line(page_items) {
                if is_numbered(line, numbered) {
                    heights.extend(line_height(line));
                    gaps.push(gap);
                    gap = 0;
                } else {
                    gap += 1;
                }
            }
        }

        let max_height_of_numbered_lines = only_uniques(heights)
            .into_iter()
            .reduce(f64::max);
        let max_lines_between_lines_with_numbers =
            only_uniques(gaps).into_iter().max().unwrap_or(0);

        TocStatistics {
            max_height_of_numbered_lines,
            max_lines_between_lines_with_numbers,
        }
    }

    /// Whether a pending line `distance` lines above an entry belongs to it.
    fn admits(&self, height: Option<f64>, distance: usize) -> bool {
        let fits_height = match (height, self.max_height_of_numbered_lines) {
            (Some(height), Some(max)) => height <= max,
            _ => false,
        };
        fits_height && distance <= self.max_lines_between_lines_with_numbers
    }
}

fn is_numbered(line: &[Item], numbered: &HashSet<ItemId>) -> bool {
    line.first()
        .is_some_and(|item| numbered.contains(&item.id))
}

/// Per-page line walker.
///
/// Lines without a number accumulate in `pending`. A numbered line flushes
/// them, deciding line by line whether each belongs to the entry, and then
/// emits the entry itself. Whatever is still pending when the page ends
/// follows the last entry and is emitted untouched.
struct PageAnnotator<'a> {
    stats: &'a TocStatistics,
    numbered: &'a HashSet<ItemId>,
    pending: Vec<&'a [Item]>,
    output: Vec<Item>,
    toc_lines: usize,
}

impl<'a> PageAnnotator<'a> {
    fn new(stats: &'a TocStatistics, numbered: &'a HashSet<ItemId>, capacity: usize) -> Self {
        PageAnnotator {
            stats,
            numbered,
            pending: Vec::new(),
            output: Vec::with_capacity(capacity),
            toc_lines: 0,
        }
    }

    fn push_line(&mut self, line: &'a [Item]) {
        if is_numbered(line, self.numbered) {
            self.flush(line);
        } else {
            self.pending.push(line);
        }
    }

    fn flush(&mut self, entry: &[Item]) {
        let buffered = self.pending.len();
        for (i, line) in self.pending.drain(..).enumerate() {
            if self.stats.admits(line_height(line), buffered - i) {
                self.toc_lines += 1;
                self.output
                    .extend(line.iter().map(|item| item.with_type(ItemType::Toc)));
            } else {
                self.output.extend(line.iter().cloned());
            }
        }

        self.toc_lines += 1;
        self.output
            .extend(entry.iter().map(|item| item.with_type(ItemType::Toc)));
    }

    fn finish(mut self) -> (Vec<Item>, usize) {
        for line in self.pending.drain(..) {
            self.output.extend(line.iter().cloned());
        }
        (self.output, self.toc_lines)
    }
}

/// Tag every item that belongs to the table of contents in `area`.
///
/// Pages outside the area are copied unchanged. Item order is preserved on
/// every page.
pub fn annotate(items: &[Item], area: &TocArea) -> Annotation {
    let numbered: HashSet<ItemId> = area.entries.iter().map(|entry| entry.item_id).collect();
    let stats = TocStatistics::compute(items, area, &numbered);
    log::debug!(
        "toc statistics: max entry height {:?}, max lines between entries {}",
        stats.max_height_of_numbered_lines,
        stats.max_lines_between_lines_with_numbers
    );

    let mut toc_lines = 0;
    let items = transform_grouped_by_page(items, |page, page_items| {
        if !area.contains_page(page) {
            return page_items.to_vec();
        }

        let mut annotator = PageAnnotator::new(&stats, &numbered, page_items.len());
        for line in group_by_line(page_items) {
            annotator.push_line(line);
        }
        let (page_output, page_toc_lines) = annotator.finish();
        toc_lines += page_toc_lines;
        page_output
    });

    Annotation { items, toc_lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::candidates::LineWithNumber;
    use serde_json::{json, Map};

    fn make_item(id: u64, page: usize, line: i64, text: &str, height: f64) -> Item {
        let mut data = Map::new();
        data.insert("str".to_string(), json!(text));
        data.insert("line".to_string(), json!(line));
        data.insert("height".to_string(), json!(height));
        Item::new(ItemId::new(id), page, data)
    }

    fn entry(page: usize, id: u64, number: u32) -> LineWithNumber {
        LineWithNumber {
            page,
            item_id: ItemId::new(id),
            number,
        }
    }

    fn tagged_ids(items: &[Item]) -> Vec<u64> {
        items
            .iter()
            .filter(|item| item.has_type(ItemType::Toc))
            .map(|item| item.id.as_u64())
            .collect()
    }

    fn all_ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|item| item.id.as_u64()).collect()
    }

    /// Page 2 layout:
    ///   0  "Contents"                     (title, 18pt)
    ///   1  "Part One"                     (section heading, 10pt)
    ///   2  "Introduction ..... 1"         entry
    ///   3  "Scope ..... 3"                entry
    ///   4  "Part Two"                     (section heading, 10pt)
    ///   5  "Methods ..... 5"              entry
    ///   6  "Results ..... 8"              entry
    ///   7  "Discussion ..... 13"          entry
    ///   8  "- ii -"                       (footer, after last entry)
    fn sample_page() -> (Vec<Item>, TocArea) {
        let items = vec![
            make_item(1, 1, 0, "Title page", 24.0),
            make_item(10, 2, 0, "Contents", 18.0),
            make_item(11, 2, 1, "Part One", 10.0),
            make_item(12, 2, 2, "Introduction ..... ", 10.0),
            make_item(13, 2, 2, "1", 10.0),
            make_item(14, 2, 3, "Scope ..... 3", 10.0),
            make_item(15, 2, 4, "Part Two", 10.0),
            make_item(16, 2, 5, "Methods ..... 5", 10.0),
            make_item(17, 2, 6, "Results ..... 8", 10.0),
            make_item(18, 2, 7, "Discussion ..... 13", 10.0),
            make_item(19, 2, 8, "- ii -", 8.0),
            make_item(20, 3, 0, "Introduction", 18.0),
        ];
        let area = TocArea {
            pages: vec![2],
            entries: vec![
                entry(2, 12, 1),
                entry(2, 14, 3),
                entry(2, 16, 5),
                entry(2, 17, 8),
                entry(2, 18, 13),
            ],
        };
        (items, area)
    }

    fn numbered_ids(area: &TocArea) -> HashSet<ItemId> {
        area.entries.iter().map(|e| e.item_id).collect()
    }

    #[test]
    fn test_statistics() {
        let (items, area) = sample_page();
        let stats = TocStatistics::compute(&items, &area, &numbered_ids(&area));
        assert_eq!(stats.max_height_of_numbered_lines, Some(10.0));
        // "Contents" and "Part One" precede the first entry.
        assert_eq!(stats.max_lines_between_lines_with_numbers, 2);
    }

    #[test]
    fn test_statistics_reset_per_page() {
        let items = vec![
            make_item(1, 2, 0, "Alpha ..... 1", 10.0),
            make_item(2, 2, 1, "note", 10.0),
            make_item(3, 3, 0, "Beta ..... 2", 10.0),
        ];
        let area = TocArea {
            pages: vec![2, 3],
            entries: vec![entry(2, 1, 1), entry(3, 3, 2)],
        };
        let stats = TocStatistics::compute(&items, &area, &numbered_ids(&area));
        assert_eq!(stats.max_lines_between_lines_with_numbers, 0);
    }

    #[test]
    fn test_annotate_sample_page() {
        let (items, area) = sample_page();
        let annotation = annotate(&items, &area);

        // Order and count are preserved.
        assert_eq!(all_ids(&annotation.items), all_ids(&items));
        // "Contents" is taller than the entries, the footer follows the last
        // entry, and the other pages are outside the area.
        assert_eq!(
            tagged_ids(&annotation.items),
            vec![11, 12, 13, 14, 15, 16, 17, 18]
        );
        // Five entries plus the two section headings.
        assert_eq!(annotation.toc_lines, 7);
    }

    #[test]
    fn test_taller_heading_never_tagged() {
        let items = vec![
            make_item(1, 2, 0, "Chapter heading", 14.0),
            make_item(2, 2, 1, "Alpha ..... 1", 10.0),
            make_item(3, 2, 2, "big", 14.0),
            make_item(4, 2, 3, "Beta ..... 2", 10.0),
        ];
        let area = TocArea {
            pages: vec![2],
            entries: vec![entry(2, 2, 1), entry(2, 4, 2)],
        };
        let annotation = annotate(&items, &area);
        assert_eq!(tagged_ids(&annotation.items), vec![2, 4]);
        assert_eq!(annotation.toc_lines, 2);
    }

    #[test]
    fn test_pending_lines_within_widest_gap_tagged() {
        let items = vec![
            make_item(1, 2, 0, "far above", 10.0),
            make_item(2, 2, 1, "Alpha ..... 1", 10.0),
            make_item(3, 2, 2, "far", 10.0),
            make_item(4, 2, 3, "near", 10.0),
            make_item(5, 2, 4, "Beta ..... 2", 10.0),
            make_item(6, 2, 5, "near", 10.0),
            make_item(7, 2, 6, "Gamma ..... 3", 10.0),
        ];
        let area = TocArea {
            pages: vec![2],
            entries: vec![entry(2, 2, 1), entry(2, 5, 2), entry(2, 7, 3)],
        };
        let stats = TocStatistics::compute(&items, &area, &numbered_ids(&area));
        assert_eq!(stats.max_lines_between_lines_with_numbers, 2);

        let annotation = annotate(&items, &area);
        assert_eq!(tagged_ids(&annotation.items), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(annotation.toc_lines, 7);
    }

    #[test]
    fn test_distance_bound() {
        // With a widest gap of 1 only the line directly above an entry can
        // join it.
        let items = vec![
            make_item(4, 3, 0, "Gamma ..... 3", 10.0),
            make_item(5, 3, 1, "two away", 10.0),
            make_item(6, 3, 2, "one away", 10.0),
            make_item(7, 3, 3, "Delta ..... 4", 10.0),
        ];
        let area = TocArea {
            pages: vec![3],
            entries: vec![entry(3, 4, 3), entry(3, 7, 4)],
        };
        let numbered = numbered_ids(&area);
        let tight = TocStatistics {
            max_height_of_numbered_lines: Some(10.0),
            max_lines_between_lines_with_numbers: 1,
        };
        assert!(tight.admits(Some(10.0), 1));
        assert!(!tight.admits(Some(10.0), 2));

        let mut annotator = PageAnnotator::new(&tight, &numbered, items.len());
        for line in group_by_line(&items) {
            annotator.push_line(line);
        }
        let (output, toc_lines) = annotator.finish();
        assert_eq!(all_ids(&output), vec![4, 5, 6, 7]);
        assert_eq!(tagged_ids(&output), vec![4, 6, 7]);
        assert_eq!(toc_lines, 3);
    }

    #[test]
    fn test_line_without_height_not_tagged() {
        let mut data = Map::new();
        data.insert("str".to_string(), json!("no height"));
        data.insert("line".to_string(), json!(1));
        let items = vec![
            make_item(1, 2, 0, "Alpha ..... 1", 10.0),
            Item::new(ItemId::new(2), 2, data),
            make_item(3, 2, 2, "Beta ..... 2", 10.0),
        ];
        let area = TocArea {
            pages: vec![2],
            entries: vec![entry(2, 1, 1), entry(2, 3, 2)],
        };
        let annotation = annotate(&items, &area);
        assert_eq!(tagged_ids(&annotation.items), vec![1, 3]);
        assert_eq!(annotation.items.len(), 3);
    }

    #[test]
    fn test_pages_outside_area_unchanged() {
        let (items, area) = sample_page();
        let annotation = annotate(&items, &area);
        assert_eq!(annotation.items[0], items[0]);
        assert_eq!(annotation.items.last(), items.last());
    }

    #[test]
    fn test_admits_requires_entry_height() {
        let stats = TocStatistics {
            max_height_of_numbered_lines: None,
            max_lines_between_lines_with_numbers: 5,
        };
        assert!(!stats.admits(Some(10.0), 1));
    }
}
