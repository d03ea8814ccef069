use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::media::{media_from_raw, MediaDescriptor, MediaRef, RawMedia};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

impl Rendered {
    pub fn new(s: impl Into<String>) -> Self { Self { rendered: s.into() } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
    Private,
}

/// A WordPress post-like record (post, page, or custom post type).
/// `F` is the shape of its ACF group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: Serialize", deserialize = "F: DeserializeOwned"))]
pub struct ContentItem<F = CustomFields> {
    pub id: u64,
    pub slug: String,
    pub title: Rendered,
    pub content: Rendered,
    pub excerpt: Rendered,
    pub date: String,
    pub modified: String,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_group_as_none")]
    pub acf: Option<F>,
    /// Full ACF field objects, when the server exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "empty_group_as_none")]
    pub acf_fields: Option<CustomFields>,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

pub type Post = ContentItem;
pub type Page = ContentItem;
pub type Service = ContentItem;
pub type Project = ContentItem;
pub type Testimonial = ContentItem<TestimonialFields>;

impl<F> ContentItem<F> {
    /// First usable entry of `_embedded["wp:featuredmedia"]`.
    pub fn featured_image(&self) -> Option<MediaDescriptor> {
        self.embedded.as_ref()?.featured_media.iter().cloned().find_map(media_from_raw)
    }
}

impl ContentItem<CustomFields> {
    /// The ACF group, or an empty one.
    pub fn fields(&self) -> CustomFields { self.acf.clone().unwrap_or_default() }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default, skip_serializing_if = "Vec::is_empty")]
    pub featured_media: Vec<RawMedia>,
}

/// Loosely typed ACF group: named scalars, attachment ids, or expanded objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFields(Map<String, Value>);

impl CustomFields {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, name: &str) -> Option<&Value> { self.0.get(name) }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) { self.0.insert(name.into(), value); }

    /// Non-blank string value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn media_ref(&self, name: &str) -> MediaRef {
        self.0.get(name).map(MediaRef::from_value).unwrap_or(MediaRef::Empty)
    }

    /// Replace a slot with the expanded descriptor.
    pub fn set_media(&mut self, name: &str, media: &MediaDescriptor) {
        if let Ok(v) = serde_json::to_value(media) {
            self.0.insert(name.to_string(), v);
        }
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> { self.0.iter() }
}

impl From<Map<String, Value>> for CustomFields {
    fn from(m: Map<String, Value>) -> Self { Self(m) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Pool,
    Concrete,
    Cleaning,
    Technical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialFields {
    pub client_name: String,
    pub client_location: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial_image: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_category: Option<ServiceCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub licensed: bool,
    pub insured: bool,
    pub certified_engineer: bool,
    pub years_experience: u32,
    pub certifications: Vec<String>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            licensed: true,
            insured: true,
            certified_engineer: true,
            years_experience: 15,
            certifications: vec![
                "Ingeniero Profesional de Florida".to_string(),
                "Licencia de Contratista de Piscinas y Spas".to_string(),
                "Licencia de Contratista General".to_string(),
                "Certificado EPA".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyStats {
    pub projects_completed: u32,
    pub clients_satisfied: u32,
    pub years_in_business: u32,
    pub team_members: u32,
}

impl Default for CompanyStats {
    fn default() -> Self {
        Self { projects_completed: 500, clients_satisfied: 450, years_in_business: 15, team_members: 25 }
    }
}

/// Company details extracted from the designated "company info" page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub description: String,
    pub emergency_phone: String,
    pub regular_phone: String,
    pub email: String,
    pub logo: Option<MediaDescriptor>,
    pub credentials: Credentials,
    pub stats: CompanyStats,
    pub service_areas: Vec<String>,
    pub page_found: bool,
    pub page_id: Option<u64>,
}

pub const DEFAULT_COMPANY_NAME: &str = "RenovaLink";
pub const DEFAULT_COMPANY_DESCRIPTION: &str = "Transformamos espacios con excelencia. Especializados en renovación de piscinas, ingeniería estructural, trabajo de concreto y limpieza residencial.";
pub const DEFAULT_PHONE: &str = "+1(786)643-1254";

impl CompanyInfo {
    /// The record served when the company page is missing or unreachable.
    pub fn fallback(email: &str) -> Self {
        Self {
            name: DEFAULT_COMPANY_NAME.to_string(),
            description: DEFAULT_COMPANY_DESCRIPTION.to_string(),
            emergency_phone: DEFAULT_PHONE.to_string(),
            regular_phone: DEFAULT_PHONE.to_string(),
            email: email.to_string(),
            logo: None,
            credentials: Credentials::default(),
            stats: CompanyStats::default(),
            service_areas: ["Miami-Dade", "Broward", "Palm Beach", "Orange", "Hillsborough"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            page_found: false,
            page_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "Transform Your Space with RenovaLink".to_string(),
            subtitle: "Premier Remodeling Services in Florida".to_string(),
            description: "From pool renovations to structural engineering, we bring your vision to life with quality craftsmanship and certified expertise.".to_string(),
            cta_text: "Get Free Estimate".to_string(),
            cta_link: "/contacto".to_string(),
        }
    }
}

/// WordPress renders an empty ACF group (or empty `media_details`) as `[]`
/// rather than `{}`; treat that, `null` and `false` as absent.
pub(crate) fn empty_group_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Array(a)) if a.is_empty() => Ok(None),
        Some(v) => serde_json::from_value(v).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(acf: Value) -> Value {
        json!({
            "id": 7, "slug": "pool-remodeling",
            "title": {"rendered": "Pool"}, "content": {"rendered": "<p>c</p>"}, "excerpt": {"rendered": "e"},
            "date": "2024-05-01T10:00:00", "modified": "2024-05-02T10:00:00", "status": "publish",
            "acf": acf
        })
    }

    #[test]
    fn empty_acf_array_is_absent() {
        let s: Service = serde_json::from_value(item(json!([]))).unwrap();
        assert!(s.acf.is_none());
        assert!(s.fields().is_empty());
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        let mut v = item(json!({}));
        v["status"] = json!("trash");
        assert!(serde_json::from_value::<Post>(v).is_err());
    }

    #[test]
    fn custom_field_accessors() {
        let s: Service = serde_json::from_value(item(json!({
            "short_description": "  Deep clean  ",
            "service_image_1": 12,
            "service_image_2": "",
            "rating": "4"
        })))
        .unwrap();
        let f = s.fields();
        assert_eq!(f.text("short_description"), Some("Deep clean"));
        assert_eq!(f.media_ref("service_image_1"), MediaRef::Unresolved(12));
        assert!(f.media_ref("service_image_2").is_empty());
        assert!(f.media_ref("service_image_9").is_empty());
        assert_eq!(f.number("rating"), Some(4.0));
    }

    #[test]
    fn featured_image_from_embedded() {
        let mut v = item(json!({}));
        v["_embedded"] = json!({"wp:featuredmedia": [{"id": 3, "source_url": "https://x/f.jpg", "alt_text": "f"}]});
        let p: Post = serde_json::from_value(v).unwrap();
        assert_eq!(p.featured_image().map(|m| m.url), Some("https://x/f.jpg".to_string()));
    }

    #[test]
    fn company_fallback_marks_page_missing() {
        let c = CompanyInfo::fallback("a@b.c");
        assert!(!c.page_found);
        assert_eq!(c.name, "RenovaLink");
        assert_eq!(c.service_areas.len(), 5);
        assert_eq!(c.credentials.certifications.len(), 4);
    }
}
