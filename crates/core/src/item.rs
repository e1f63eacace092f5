use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Data key holding an item's text content.
pub const TEXT_KEY: &str = "str";
/// Data key holding an item's line grouping key within its page.
pub const LINE_KEY: &str = "line";
/// Data key holding an item's rendered height.
pub const HEIGHT_KEY: &str = "height";
/// Data key holding an item's structural tags.
pub const TYPES_KEY: &str = "types";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub fn new(id: u64) -> Self {
        ItemId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role attached to an item by a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Toc,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Toc => "TOC",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One positioned text fragment.
///
/// Everything except the identifier and the page lives in `data`, a free-form
/// column map shared by all pipeline stages. Stages never mutate an item in
/// place; they emit copies through [`Item::with_type`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub page: usize,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Item {
    pub fn new(id: ItemId, page: usize, data: Map<String, Value>) -> Self {
        Item { id, page, data }
    }

    /// Text content, or the empty string when the item carries none.
    pub fn text(&self) -> &str {
        self.data
            .get(TEXT_KEY)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn line(&self) -> Option<i64> {
        self.data.get(LINE_KEY).and_then(Value::as_i64)
    }

    pub fn height(&self) -> Option<f64> {
        self.data.get(HEIGHT_KEY).and_then(Value::as_f64)
    }

    /// Structural tags in the order they were added. Non-string entries are
    /// skipped.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.data
            .get(TYPES_KEY)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn has_type(&self, item_type: ItemType) -> bool {
        self.types().any(|t| t == item_type.as_str())
    }

    /// Return a copy of this item with `item_type` added to its tags.
    pub fn with_type(&self, item_type: ItemType) -> Item {
        let mut copy = self.clone();
        if self.has_type(item_type) {
            return copy;
        }

        let tag = Value::String(item_type.as_str().to_string());
        match copy.data.get_mut(TYPES_KEY) {
            Some(Value::Array(types)) => types.push(tag),
            _ => {
                copy.data
                    .insert(TYPES_KEY.to_string(), Value::Array(vec![tag]));
            }
        }
        copy
    }
}

/// Concatenated text of a line, items joined without a separator.
pub fn line_text(line: &[Item]) -> String {
    line.iter().map(Item::text).collect()
}

/// Tallest item in a line, or `None` when no item carries a height.
pub fn line_height(line: &[Item]) -> Option<f64> {
    line.iter()
        .filter_map(Item::height)
        .fold(None, |max: Option<f64>, h| Some(max.map_or(h, |m| m.max(h))))
}
