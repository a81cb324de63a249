//! Canonicalization of the image references returned by the Space.
//!
//! The Space is not contractually stable across its own versions: an output
//! image has been observed as a data URL, an absolute URL, a `file=` marker,
//! a bare relative path, or an object wrapping one of those under `url`,
//! `path` or `image`. Everything is rewritten here into either a data URL or
//! an absolute HTTP(S) URL so the extension never needs to special-case.

use serde_json::Value;

/// Classification of a raw response element, before rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Nothing usable: null, empty string, or a non-string non-object value.
    Absent,
    /// An object carrying the reference under one of the known fields.
    Structured {
        url: Option<String>,
        path: Option<String>,
        image: Option<String>,
    },
    /// A plain string of unknown shape.
    Raw(String),
}

pub fn classify(value: &Value) -> ImageRef {
    match value {
        Value::String(s) if s.is_empty() => ImageRef::Absent,
        Value::String(s) => ImageRef::Raw(s.clone()),
        Value::Object(map) => ImageRef::Structured {
            url: string_field(map, "url"),
            path: string_field(map, "path"),
            image: string_field(map, "image"),
        },
        _ => ImageRef::Absent,
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Normalizes one response element into a canonical image reference.
///
/// Returns `None` when the element carries no usable reference; this is not
/// an error at this layer. `file_base` is the base URL of the Space's static
/// file server, used for the relative-path fallbacks.
pub fn normalize(value: &Value, file_base: &str) -> Option<String> {
    let raw = match classify(value) {
        ImageRef::Absent => return None,
        ImageRef::Structured { url, path, image } => url.or(path).or(image)?,
        ImageRef::Raw(s) => s,
    };
    Some(canonicalize(&raw, file_base))
}

// Ordered by specificity; the last arm always produces *some* URL, which the
// caller must treat as best-effort.
fn canonicalize(raw: &str, file_base: &str) -> String {
    if raw.starts_with("data:image") {
        return raw.to_string();
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }
    let relative = raw
        .strip_prefix("/file=")
        .or_else(|| raw.strip_prefix("file="))
        .unwrap_or(raw);
    format!(
        "{}/{}",
        file_base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}
