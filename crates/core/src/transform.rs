//! Stage contract and a sequential pipeline runner.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::TransformError;
use crate::globals::{Globals, PageMapping};
use crate::item::Item;

/// Document-wide information available to every stage.
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    pub page_count: usize,
    pub globals: Globals,
}

impl TransformContext {
    pub fn new(page_count: usize, globals: Globals) -> Self {
        TransformContext {
            page_count,
            globals,
        }
    }

    pub fn page_mapping(&self) -> Result<PageMapping, TransformError> {
        self.globals
            .page_mapping
            .ok_or(TransformError::MissingGlobal("pageMapping"))
    }
}

/// Output of one stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemResult {
    pub items: Vec<Item>,
    pub messages: Vec<String>,
    #[serde(skip)]
    pub globals: Globals,
}

/// A single step of the document-structure pipeline.
pub trait Transformer {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Data columns that must be present on the input items.
    fn required_columns(&self) -> &[&'static str] {
        &[]
    }

    fn transform(
        &self,
        context: &TransformContext,
        items: Vec<Item>,
    ) -> Result<ItemResult, TransformError>;
}

/// Check that every column `transformer` requires is carried by at least one
/// item. An empty stream has no schema to check and passes.
pub fn validate_columns(
    transformer: &dyn Transformer,
    items: &[Item],
) -> Result<(), TransformError> {
    if items.is_empty() {
        return Ok(());
    }

    let schema: BTreeSet<&str> = items
        .iter()
        .flat_map(|item| item.data.keys().map(String::as_str))
        .collect();

    let missing: Vec<String> = transformer
        .required_columns()
        .iter()
        .filter(|column| !schema.contains(**column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TransformError::MissingColumns {
            stage: transformer.name().to_string(),
            columns: missing,
        })
    }
}

/// Messages emitted by one stage of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub description: String,
    pub messages: Vec<String>,
}

/// Final state after every stage has run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub items: Vec<Item>,
    pub stages: Vec<StageReport>,
    pub globals: Globals,
}

/// Runs transformers in order, feeding each one the previous stage's items.
#[derive(Default)]
pub struct Pipeline {
    transformers: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn run(
        &self,
        mut context: TransformContext,
        items: Vec<Item>,
    ) -> Result<PipelineResult, TransformError> {
        let mut items = items;
        let mut stages = Vec::with_capacity(self.transformers.len());

        for transformer in &self.transformers {
            validate_columns(transformer.as_ref(), &items)?;
            log::debug!(
                "running stage '{}': {}",
                transformer.name(),
                transformer.description()
            );

            let result = transformer.transform(&context, items)?;
            context.globals.merge(result.globals);
            items = result.items;
            stages.push(StageReport {
                stage: transformer.name().to_string(),
                description: transformer.description().to_string(),
                messages: result.messages,
            });
        }

        Ok(PipelineResult {
            items,
            stages,
            globals: context.globals,
        })
    }
}
