// Document transforms: declarative field operations plus a plugin seam
use crate::document::Document;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A pure per-document transform applied during a copy. Implementations must
/// preserve document identity and type unless the change is intentional.
///
/// Any `Fn(Document) -> Result<Document>` implements this, so library callers
/// can plug in arbitrary logic; descriptor files carry the declarative
/// [`FieldOps`] form instead of executable code.
pub trait DocumentTransform {
    fn apply(&self, doc: Document) -> Result<Document>;
}

impl<F> DocumentTransform for F
where
    F: Fn(Document) -> Result<Document>,
{
    fn apply(&self, doc: Document) -> Result<Document> {
        self(doc)
    }
}

/// Declarative field operations on the document source, addressed by
/// dot-paths. Applied in the order rename, set, remove. A rename or remove
/// whose source path is absent is a no-op; a set that would descend through
/// a non-object value is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOps {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rename: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

impl DocumentTransform for FieldOps {
    fn apply(&self, mut doc: Document) -> Result<Document> {
        for (from, to) in &self.rename {
            if let Some(value) = take_path(&mut doc.source, from) {
                set_path(&mut doc.source, to, value)?;
            }
        }
        for (path, value) in &self.set {
            set_path(&mut doc.source, path, value.clone())?;
        }
        for path in &self.remove {
            take_path(&mut doc.source, path);
        }
        Ok(doc)
    }
}

/// Removes and returns the value at a dot-path, or `None` if any segment is
/// absent or not an object.
fn take_path(root: &mut Value, path: &str) -> Option<Value> {
    let mut segments = path.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        let object = current.as_object_mut()?;
        if segments.peek().is_none() {
            return object.remove(segment);
        }
        current = object.get_mut(segment)?;
    }
    None
}

/// Inserts a value at a dot-path, creating intermediate objects as needed.
fn set_path(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let mut segments = path.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        let Some(object) = current.as_object_mut() else {
            bail!("transform path '{}' descends through a non-object value", path);
        };
        if segments.peek().is_none() {
            object.insert(segment.to_string(), value);
            return Ok(());
        }
        current = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
    bail!("transform path is empty");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(source: Value) -> Document {
        Document::new("1", source)
    }

    #[test]
    fn rename_set_remove_in_order() {
        let ops: FieldOps = serde_json::from_value(json!({
            "rename": {"name": "title"},
            "set": {"schema_version": 2, "meta.migrated": true},
            "remove": ["legacy"]
        }))
        .unwrap();

        let out = ops
            .apply(doc(json!({"name": "widget", "legacy": "x", "qty": 5})))
            .unwrap();

        assert_eq!(
            out.source,
            json!({
                "title": "widget",
                "qty": 5,
                "schema_version": 2,
                "meta": {"migrated": true}
            })
        );
        assert_eq!(out.id, "1");
    }

    #[test]
    fn absent_rename_and_remove_are_noops() {
        let ops = FieldOps {
            rename: [("missing".to_string(), "there".to_string())].into(),
            remove: vec!["also.missing".to_string()],
            ..Default::default()
        };
        let out = ops.apply(doc(json!({"qty": 5}))).unwrap();
        assert_eq!(out.source, json!({"qty": 5}));
    }

    #[test]
    fn set_through_scalar_fails() {
        let ops = FieldOps {
            set: [("qty.nested".to_string(), json!(1))].into(),
            ..Default::default()
        };
        let err = ops.apply(doc(json!({"qty": 5}))).unwrap_err();
        assert!(err.to_string().contains("non-object"));
    }

    #[test]
    fn closures_are_transforms() {
        let bump = |mut d: Document| -> Result<Document> {
            d.source["qty"] = json!(d.source["qty"].as_i64().unwrap() + 1);
            Ok(d)
        };
        let out = bump.apply(doc(json!({"qty": 5}))).unwrap();
        assert_eq!(out.source["qty"], 6);
    }
}
