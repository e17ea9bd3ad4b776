//! Data bindings: dot-path lookup into a render data record.
//!
//! A binding path such as `recipe.title` or `recipe.images.0` walks objects
//! by key and arrays by index. Text content can also embed `{{path}}`
//! placeholders that are substituted at render time.

use serde_json::Value;

/// Walk `path` through `data`. Empty segments are ignored.
pub fn resolve_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .map(str::trim)
        .filter(|seg| !seg.is_empty())
        .try_fold(data, |node, seg| match node {
            Value::Object(map) => map.get(seg),
            Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Render a JSON value as display text. Objects and null have no text form.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Option<Vec<String>> = items
                .iter()
                .map(|v| match v {
                    Value::Array(_) | Value::Object(_) => None,
                    other => value_to_text(other),
                })
                .collect();
            parts.map(|p| p.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Resolve `path` to text, falling back to `fallback` when the path is
/// missing or does not resolve to displayable text.
pub fn resolve_binding(path: &str, data: &Value, fallback: &str) -> String {
    resolve_path(data, path)
        .and_then(value_to_text)
        .unwrap_or_else(|| fallback.to_string())
}

/// Whether `content` contains at least one `{{...}}` placeholder.
pub fn has_placeholder(content: &str) -> bool {
    content
        .find("{{")
        .is_some_and(|start| content[start + 2..].contains("}}"))
}

/// Replace every `{{path}}` in `content`. Placeholders that do not resolve
/// are left verbatim so they stay visible while editing.
pub fn interpolate(content: &str, data: &Value) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let end = start + 2 + len;
        out.push_str(&rest[..start]);
        let path = &rest[start + 2..end];
        match resolve_path(data, path).and_then(value_to_text) {
            Some(text) => out.push_str(&text),
            None => out.push_str(&rest[start..end + 2]),
        }
        rest = &rest[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Display text for content with an optional binding: the binding (or the
/// static content when it does not resolve), then placeholders.
pub fn bound_text(content: &str, binding: Option<&str>, data: &Value) -> String {
    match binding {
        Some(path) => interpolate(&resolve_binding(path, data, content), data),
        None => interpolate(content, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe() -> Value {
        json!({
            "recipe": {
                "title": "Lemon Ricotta Pancakes",
                "servings": 4,
                "tags": ["breakfast", "sweet"],
                "images": ["/a.jpg", "/b.jpg"],
                "author": { "name": "Sam" },
                "notes": null
            }
        })
    }

    #[test]
    fn resolves_nested_paths() {
        let data = recipe();
        assert_eq!(
            resolve_binding("recipe.title", &data, "x"),
            "Lemon Ricotta Pancakes"
        );
        assert_eq!(resolve_binding("recipe.author.name", &data, "x"), "Sam");
        assert_eq!(resolve_binding("recipe.images.1", &data, "x"), "/b.jpg");
        assert_eq!(resolve_binding("recipe.servings", &data, "x"), "4");
        assert_eq!(resolve_binding("recipe.tags", &data, "x"), "breakfast, sweet");
    }

    #[test]
    fn unresolvable_falls_back() {
        let data = recipe();
        assert_eq!(resolve_binding("recipe.missing", &data, "Static"), "Static");
        assert_eq!(resolve_binding("recipe.author", &data, "Static"), "Static");
        assert_eq!(resolve_binding("recipe.notes", &data, "Static"), "Static");
        assert_eq!(resolve_binding("recipe.images.9", &data, "Static"), "Static");
    }

    #[test]
    fn placeholder_detection() {
        assert!(has_placeholder("Make {{recipe.title}} tonight"));
        assert!(!has_placeholder("Make {{ tonight"));
        assert!(!has_placeholder("plain"));
    }

    #[test]
    fn interpolates_and_keeps_unknown() {
        let data = recipe();
        assert_eq!(
            interpolate("{{recipe.title}} serves {{recipe.servings}} {{nope}}", &data),
            "Lemon Ricotta Pancakes serves 4 {{nope}}"
        );
        assert_eq!(interpolate("open {{ end", &data), "open {{ end");
    }

    #[test]
    fn bound_text_prefers_binding() {
        let data = recipe();
        assert_eq!(bound_text("Title", Some("recipe.title"), &data), "Lemon Ricotta Pancakes");
        assert_eq!(bound_text("By {{recipe.author.name}}", Some("recipe.nope"), &data), "By Sam");
        assert_eq!(bound_text("Serves {{recipe.servings}}", None, &data), "Serves 4");
    }
}
