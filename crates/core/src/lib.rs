//! Core library for doctoc
//!
//! This crate implements the **Functional Core** of doctoc: the
//! document-structure stage that finds a table of contents in a stream of
//! positioned text items and tags the items that belong to it.
//!
//! # Architecture Overview
//!
//! - **`doctoc_core`** (this crate): pure transformation functions with zero I/O
//! - **`doctoc`**: file and terminal I/O around the core (the Imperative Shell)
//!
//! Every function here takes items in and hands new items back. Items are
//! never mutated in place; tagging produces copies.
//!
//! # Module Organization
//!
//! - [`item`]: the item record, its identifiers and structural tags
//! - [`grouping`]: page and line grouping over an item stream
//! - [`globals`]: values shared between pipeline stages
//! - [`transform`]: the stage contract and a sequential pipeline runner
//! - [`toc`]: table-of-contents detection and annotation
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use doctoc_core::globals::{Globals, PageMapping};
//! use doctoc_core::toc::DetectToc;
//! use doctoc_core::transform::{Pipeline, TransformContext};
//!
//! let context = TransformContext::new(
//!     page_count,
//!     Globals { page_mapping: Some(PageMapping::default()), toc: None },
//! );
//! let result = Pipeline::new().with(DetectToc::default()).run(context, items)?;
//! for stage in &result.stages {
//!     println!("{}: {}", stage.stage, stage.messages.join(", "));
//! }
//! ```

pub mod error;
pub mod globals;
pub mod grouping;
pub mod item;
pub mod toc;
pub mod transform;

pub use error::TransformError;
pub use item::{Item, ItemId, ItemType};
