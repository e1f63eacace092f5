use serde::{Deserialize, Serialize};

use crate::toc::TocArea;

/// Relation between physical page indices and the document's own printed
/// page numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMapping {
    pub page_factor: i64,
}

/// Values shared between pipeline stages. A stage publishes what it learned
/// in its [`ItemResult`](crate::transform::ItemResult); the pipeline merges
/// them into the context for the stages that follow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Globals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_mapping: Option<PageMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<TocArea>,
}

impl Globals {
    /// Overwrite every value `other` sets, keep the rest.
    pub fn merge(&mut self, other: Globals) {
        if other.page_mapping.is_some() {
            self.page_mapping = other.page_mapping;
        }
        if other.toc.is_some() {
            self.toc = other.toc;
        }
    }
}
