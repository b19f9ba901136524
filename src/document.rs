// Document model and bulk request body construction
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

fn default_doc_type() -> String {
    "_doc".to_string()
}

/// A single document as returned by a search page or declared as a seed
/// document in a migration descriptor. Identity is the `id` within an index;
/// `doc_type` is carried through for stores that still keep a type field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "type", default = "default_doc_type")]
    pub doc_type: String,
    pub source: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, source: Value) -> Self {
        Self {
            id: id.into(),
            doc_type: default_doc_type(),
            source,
        }
    }
}

/// One index-action of a bulk write: put `doc` into `index`, overwriting any
/// existing document with the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAction {
    pub index: String,
    pub doc: Document,
}

impl BulkAction {
    pub fn new(index: impl Into<String>, doc: Document) -> Self {
        Self {
            index: index.into(),
            doc,
        }
    }
}

/// Builds the newline-delimited bulk request body: one action line followed
/// by one source line per document, with a trailing newline.
pub fn bulk_body(actions: &[BulkAction]) -> String {
    let mut lines = Vec::with_capacity(actions.len() * 2);
    for action in actions {
        let header = json!({
            "index": {
                "_index": action.index,
                "_type": action.doc.doc_type,
                "_id": action.doc.id,
            }
        });
        lines.push(header.to_string());
        lines.push(action.doc.source.to_string());
    }
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_body_pairs_action_and_source_lines() {
        let actions = vec![
            BulkAction::new("orders_v2", Document::new("1", json!({"qty": 3}))),
            BulkAction::new("orders_v2", Document::new("2", json!({"qty": 7}))),
        ];
        let body = bulk_body(&actions);
        assert!(body.ends_with('\n'));

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);

        let header: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(header["index"]["_index"], "orders_v2");
        assert_eq!(header["index"]["_id"], "1");
        let source: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(source["qty"], 3);
    }

    #[test]
    fn seed_document_defaults_doc_type() {
        let doc: Document =
            serde_json::from_str(r#"{"id": "a", "source": {"x": 1}}"#).unwrap();
        assert_eq!(doc.doc_type, "_doc");
        assert_eq!(doc.source["x"], 1);
    }
}
