use std::io::Read;
use std::path::Path;

use doctoc_core::globals::PageMapping;
use doctoc_core::Item;
use serde::Deserialize;

use crate::prelude::*;

/// Items plus the document-wide values the detector needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub page_count: Option<usize>,
    pub page_mapping: Option<PageMapping>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Document {
    /// Declared page count, or the highest page any item sits on.
    pub fn page_count(&self) -> usize {
        self.page_count
            .unwrap_or_else(|| self.items.iter().map(|item| item.page).max().unwrap_or(0))
    }
}

/// Accepted input shapes: a full document object or a bare item array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentInput {
    Items(Vec<Item>),
    Document(Document),
}

pub fn parse_document(json: &str) -> Result<Document, Error> {
    let input: DocumentInput =
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))?;

    Ok(match input {
        DocumentInput::Items(items) => Document {
            items,
            ..Document::default()
        },
        DocumentInput::Document(document) => document,
    })
}

/// Read a document from `path`, or from stdin when `path` is `-`.
pub fn read_document(path: &Path) -> Result<Document> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("Failed to read document from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?
    };

    parse_document(&json).map_err(|e| eyre!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ITEMS: &str = r#"[
        {"id": 1, "page": 1, "data": {"str": "Title", "line": 0}},
        {"id": 2, "page": 3, "data": {"str": "Body", "line": 0}}
    ]"#;

    #[test]
    fn test_parse_bare_items() {
        let doc = parse_document(ITEMS).unwrap();
        assert_eq!(doc.items.len(), 2);
        assert!(doc.page_mapping.is_none());
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_parse_full_document() {
        let json = format!(
            r#"{{"pageCount": 10, "pageMapping": {{"pageFactor": -2}}, "items": {ITEMS}}}"#
        );
        let doc = parse_document(&json).unwrap();
        assert_eq!(doc.page_count(), 10);
        assert_eq!(doc.page_mapping, Some(PageMapping { page_factor: -2 }));
        assert_eq!(doc.items[1].text(), "Body");
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse_document("{}").unwrap();
        assert!(doc.items.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_document("[{\"id\": \"x\"}]").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_read_document_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ITEMS.as_bytes()).unwrap();

        let doc = read_document(file.path()).unwrap();
        assert_eq!(doc.items.len(), 2);
    }

    #[test]
    fn test_read_document_missing_file() {
        let result = read_document(Path::new("/nonexistent/doctoc/items.json"));
        assert!(result.is_err());
    }
}
