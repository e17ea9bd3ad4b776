//! Persistence boundary: saved element lists in and out.
//!
//! Saved templates store their element list as a JSON string; some callers
//! hand it over already parsed. Loading is defensive: malformed input
//! yields an empty (or partial) list and a warning, never an error.

use crate::id::ElementId;
use crate::model::{Element, Template, normalize_rotation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// An element list as it arrives from storage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ElementsJson {
    Text(String),
    List(Vec<Value>),
}

impl From<&str> for ElementsJson {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ElementsJson {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<Value>> for ElementsJson {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

/// What gets written back to storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTemplate {
    pub template: Template,
    pub elements_json: String,
}

/// Parse a stored element list.
///
/// A string that is not a JSON array loads as an empty list. Entries that
/// do not describe a valid element are skipped. Duplicate ids are
/// re-assigned and rotations normalized.
pub fn load_elements(raw: ElementsJson) -> Vec<Element> {
    let values = match raw {
        ElementsJson::List(values) => values,
        ElementsJson::Text(text) if text.trim().is_empty() => Vec::new(),
        ElementsJson::Text(text) => match serde_json::from_str::<Vec<Value>>(&text) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("discarding malformed element list: {e}");
                Vec::new()
            }
        },
    };

    let mut seen = HashSet::new();
    let mut elements = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let mut el: Element = match serde_json::from_value(value) {
            Ok(el) => el,
            Err(e) => {
                log::warn!("skipping element #{index}: {e}");
                continue;
            }
        };
        if !seen.insert(el.id) {
            let fresh = ElementId::fresh(el.element_type().id_prefix(), |id| seen.contains(&id));
            log::warn!("duplicate element id {} re-assigned to {fresh}", el.id);
            el.id = fresh;
            seen.insert(fresh);
        }
        el.rotation = normalize_rotation(el.rotation);
        elements.push(el);
    }
    elements
}

/// Serialize a template and its element list for saving.
///
/// # Errors
/// Propagates the serde error; with the model's types this only happens
/// for non-finite numbers.
pub fn serialize<'a>(
    template: &Template,
    elements: impl IntoIterator<Item = &'a Element>,
) -> Result<SerializedTemplate, serde_json::Error> {
    let list: Vec<&Element> = elements.into_iter().collect();
    Ok(SerializedTemplate {
        template: template.clone(),
        elements_json: serde_json::to_string(&list)?,
    })
}
