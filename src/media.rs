use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{empty_group_as_none, Rendered};

/// A fully described media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// `wp/v2/media/{id}` response, only the fields we read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMedia {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub title: Option<Rendered>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "empty_group_as_none")]
    pub media_details: Option<MediaDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub file: Option<String>,
}

/// An ACF image slot. The free ACF tier stores these as a bare attachment id
/// (number or numeric string), an already expanded image object, or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    Unresolved(u64),
    Resolved(MediaDescriptor),
    Empty,
}

impl MediaRef {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(id) if id > 0 => MediaRef::Unresolved(id),
                _ => MediaRef::Empty,
            },
            Value::String(s) => match s.trim().parse::<u64>() {
                Ok(id) if id > 0 => MediaRef::Unresolved(id),
                _ => MediaRef::Empty,
            },
            Value::Object(obj) => match descriptor_from_object(obj) {
                Some(m) => MediaRef::Resolved(m),
                None => MediaRef::Empty,
            },
            _ => MediaRef::Empty,
        }
    }

    pub fn is_empty(&self) -> bool { matches!(self, MediaRef::Empty) }
}

/// Shape a raw media response. `None` when neither `source_url` nor `url` is usable.
pub fn media_from_raw(raw: RawMedia) -> Option<MediaDescriptor> {
    let url = raw.source_url.filter(|u| !u.is_empty()).or(raw.url.filter(|u| !u.is_empty()))?;
    let details = raw.media_details.unwrap_or_default();
    Some(MediaDescriptor {
        id: raw.id,
        url,
        alt: raw.alt_text.unwrap_or_default(),
        title: raw.title.map(|t| t.rendered).unwrap_or_default(),
        width: details.width,
        height: details.height,
        mime_type: raw.mime_type.filter(|m| !m.is_empty()),
    })
}

/// Read an image object as returned by ACF (`ID`, `url`, `alt`, `sizes`, ...)
/// or by the media endpoint (`id`, `source_url`, `alt_text`, `media_details`).
pub fn descriptor_from_object(obj: &Map<String, Value>) -> Option<MediaDescriptor> {
    let str_of = |k: &str| obj.get(k).and_then(Value::as_str).filter(|s| !s.is_empty());
    let dim = |k: &str| {
        obj.get(k)
            .or_else(|| obj.get("media_details").and_then(|d| d.get(k)))
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
    };
    let url = str_of("url").or_else(|| str_of("source_url"))?.to_string();
    let id = obj.get("id").or_else(|| obj.get("ID")).and_then(Value::as_u64).unwrap_or(0);
    let title = match obj.get("title") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(t)) => t.get("rendered").and_then(Value::as_str).unwrap_or_default().to_string(),
        _ => String::new(),
    };
    Some(MediaDescriptor {
        id,
        url,
        alt: str_of("alt").or_else(|| str_of("alt_text")).unwrap_or_default().to_string(),
        title,
        width: dim("width"),
        height: dim("height"),
        mime_type: str_of("mime_type").or_else(|| str_of("mime")).map(str::to_string),
    })
}
