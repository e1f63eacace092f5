use colored::Colorize;
use doctoc_core::globals::{Globals, PageMapping};
use doctoc_core::grouping::group_by_line;
use doctoc_core::item::{line_text, Item, ItemType};
use doctoc_core::toc::{DetectToc, TocArea, TocConfig};
use doctoc_core::transform::{Pipeline, TransformContext};
use serde::Serialize;

use crate::input::{read_document, Document};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args)]
pub struct DetectOptions {
    /// Path to the JSON item document ("-" reads stdin)
    pub path: std::path::PathBuf,

    /// Total page count (defaults to the document's value or its last page)
    #[arg(long, env = "DOCTOC_PAGE_COUNT")]
    pub page_count: Option<usize>,

    /// Offset between physical pages and printed page numbers
    #[arg(long, env = "DOCTOC_PAGE_FACTOR", allow_hyphen_values = true)]
    pub page_factor: Option<i64>,

    /// Pages scanned for a TOC beyond the page factor
    #[arg(long, env = "DOCTOC_FRONT_MATTER_PAGES", default_value = "5")]
    pub front_matter_pages: usize,

    /// Lines must be longer than this to count as TOC entries
    #[arg(long, env = "DOCTOC_MIN_LINE_LENGTH", default_value = "5")]
    pub min_line_length: usize,

    /// Fewest numbered lines a TOC may have
    #[arg(long, env = "DOCTOC_MIN_ENTRIES", default_value = "3")]
    pub min_entries: usize,

    /// Fewest numbered lines per TOC page
    #[arg(long, env = "DOCTOC_MIN_ENTRIES_PER_PAGE", default_value = "5")]
    pub min_entries_per_page: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DetectOptions {
    fn config(&self) -> TocConfig {
        TocConfig {
            front_matter_pages: self.front_matter_pages,
            min_line_length: self.min_line_length,
            min_entries: self.min_entries,
            min_entries_per_page: self.min_entries_per_page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetectOutput {
    pub items: Vec<Item>,
    pub messages: Vec<String>,
    pub toc: Option<TocArea>,
}

pub fn run(options: DetectOptions, global: crate::Global) -> Result<()> {
    let document = read_document(&options.path)?;
    let config = options.config();

    if global.verbose {
        eprintln!(
            "Read {} items from {}",
            document.items.len(),
            options.path.display()
        );
        eprintln!("Detector config: {:?}", config);
    }

    let output = detect_data(document, &options)?;

    if options.json {
        output_json(&output)?;
    } else {
        anstream::print!("{}", format_detect_text(&output));
    }

    Ok(())
}

/// Run TOC detection over a parsed document, CLI flags taking precedence over
/// the document's own page values.
pub fn detect_data(
    document: Document,
    options: &DetectOptions,
) -> Result<DetectOutput, Error> {
    let page_count = options.page_count.unwrap_or_else(|| document.page_count());
    let page_mapping = match options.page_factor {
        Some(page_factor) => PageMapping { page_factor },
        None => document.page_mapping.unwrap_or_default(),
    };
    log::debug!(
        "detecting TOC over {} pages with page factor {}",
        page_count,
        page_mapping.page_factor
    );

    let context = TransformContext::new(
        page_count,
        Globals {
            page_mapping: Some(page_mapping),
            toc: None,
        },
    );
    let result = Pipeline::new()
        .with(DetectToc::new(options.config()))
        .run(context, document.items)?;

    Ok(DetectOutput {
        items: result.items,
        messages: result
            .stages
            .into_iter()
            .flat_map(|stage| stage.messages)
            .collect(),
        toc: result.globals.toc,
    })
}

fn output_json(output: &DetectOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

/// Render TOC lines as a table, followed by the detector's messages.
fn format_detect_text(output: &DetectOutput) -> String {
    let mut result = String::new();

    if let Some(area) = &output.toc {
        result.push_str(&format!(
            "\n{}\n",
            format!("TABLE OF CONTENTS (pages {:?})", area.pages)
                .bright_cyan()
                .bold()
        ));

        let mut table = new_table();
        table.add_row(prettytable::row!["Page", "Line", "Text"]);
        for line in group_by_line(&output.items) {
            if !line.iter().any(|item| item.has_type(ItemType::Toc)) {
                continue;
            }
            let page = line[0].page;
            let line_no = line[0].line().map(|l| l.to_string()).unwrap_or_default();
            let text = line_text(line);
            let text = text.trim();
            table.add_row(prettytable::row![page, line_no, text]);
        }
        result.push_str(&table.to_string());
    }

    result.push('\n');
    for message in &output.messages {
        result.push_str(&format!("{}\n", message.yellow()));
    }
    result
}
