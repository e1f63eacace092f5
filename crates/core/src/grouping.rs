//! Page and line grouping over a flat item stream.
//!
//! Groups are consecutive runs of the input, so the original order is
//! preserved and every item lands in exactly one group.

use crate::item::Item;

/// Split items into consecutive runs sharing the same page.
pub fn group_by_page(items: &[Item]) -> Vec<&[Item]> {
    items.chunk_by(|a, b| a.page == b.page).collect()
}

/// Split items into consecutive runs sharing the same page and line key.
pub fn group_by_line(items: &[Item]) -> Vec<&[Item]> {
    items
        .chunk_by(|a, b| a.page == b.page && a.line() == b.line())
        .collect()
}

/// Apply `transform` to every page group and reassemble the results in page
/// order. The closure receives the page number and that page's items.
pub fn transform_grouped_by_page<F>(items: &[Item], mut transform: F) -> Vec<Item>
where
    F: FnMut(usize, &[Item]) -> Vec<Item>,
{
    let mut result = Vec::with_capacity(items.len());
    for page_items in group_by_page(items) {
        let page = page_items[0].page;
        result.extend(transform(page, page_items));
    }
    result
}

/// Drop repeated values, keeping the first occurrence of each.
///
/// Works on `PartialEq` alone so float heights can be deduplicated.
pub fn only_uniques<T, I>(values: I) -> Vec<T>
where
    T: PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut uniques: Vec<T> = Vec::new();
    for value in values {
        if !uniques.contains(&value) {
            uniques.push(value);
        }
    }
    uniques
}

/// `true` when each number is exactly one more than the previous. Empty and
/// single-element sequences are consecutive.
pub fn numbers_are_consecutive(numbers: &[usize]) -> bool {
    numbers.windows(2).all(|w| w[1] == w[0] + 1)
}
