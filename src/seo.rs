//! Meta description and JSON-LD builders for page heads.

use serde_json::{json, Value};

pub const SITE_URL: &str = "https://renovalink.com";
pub const BUSINESS_NAME: &str = "RenovaLink";
pub const DEFAULT_DESCRIPTION_LEN: usize = 155;

/// Site identity used by the schema builders.
#[derive(Debug, Clone)]
pub struct SeoContext {
    /// Origin without a trailing slash.
    pub site_url: String,
    pub business_name: String,
    pub counties: Vec<String>,
    pub default_og_image: String,
}

impl SeoContext {
    pub fn new(site_url: &str, business_name: impl Into<String>) -> Self {
        let site_url = site_url.trim_end_matches('/').to_string();
        let default_og_image = format!("{site_url}/images/renovalink-og-default.jpg");
        Self { site_url, business_name: business_name.into(), counties: Vec::new(), default_og_image }
    }

    pub fn renovalink() -> Self {
        Self {
            counties: vec!["Miami-Dade County".to_string(), "Broward County".to_string()],
            ..Self::new(SITE_URL, BUSINESS_NAME)
        }
    }

    /// Absolute URL for a site path.
    pub fn canonical(&self, path: &str) -> String {
        format!("{}/{}", self.site_url, path.trim_start_matches('/'))
    }

    pub fn organization(&self, logo_url: Option<&str>, same_as: &[String]) -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "Organization",
            "name": self.business_name,
            "url": self.site_url,
            "logo": logo_url.unwrap_or(&self.default_og_image),
            "sameAs": same_as,
        })
    }

    pub fn website(&self) -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "url": self.site_url,
            "name": self.business_name,
            "potentialAction": {
                "@type": "SearchAction",
                "target": format!("{}/?q={{search_term_string}}", self.site_url),
                "query-input": "required name=search_term_string",
            },
        })
    }

    /// Service schema, linked to `/servicios/{slug}` when a slug is given.
    pub fn service(&self, name: &str, description: &str, slug: Option<&str>) -> Value {
        let mut schema = json!({
            "@context": "https://schema.org",
            "@type": "Service",
            "name": name,
            "serviceType": name,
            "description": description,
            "provider": {
                "@type": "LocalBusiness",
                "name": self.business_name,
                "url": self.site_url,
            },
            "areaServed": self.counties.iter().map(|c| json!({"@type": "AdministrativeArea", "name": c})).collect::<Vec<_>>(),
        });
        if let Some(slug) = slug.filter(|s| !s.is_empty()) {
            schema["url"] = Value::String(self.canonical(&format!("/servicios/{slug}")));
        }
        schema
    }
}

pub fn faq(entries: &[(&str, &str)]) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entries.iter().map(|(q, a)| json!({
            "@type": "Question",
            "name": q,
            "acceptedAnswer": {"@type": "Answer", "text": a},
        })).collect::<Vec<_>>(),
    })
}

/// BreadcrumbList from ordered `(name, url)` pairs, positions from 1.
pub fn breadcrumbs(items: &[(&str, &str)]) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items.iter().enumerate().map(|(idx, (name, item))| json!({
            "@type": "ListItem",
            "position": idx + 1,
            "name": name,
            "item": item,
        })).collect::<Vec<_>>(),
    })
}

/// Drop nulls so templates can pass optional schemas straight through.
pub fn combine_schemas(schemas: impl IntoIterator<Item = Value>) -> Vec<Value> {
    schemas.into_iter().filter(|s| !s.is_null()).collect()
}

/// Remove complete `<...>` runs. A `<` with no closing `>` is kept as text.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else { break };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Strip tags, collapse whitespace and cut to `max` characters, ending in `…`.
pub fn truncate_description(raw: &str, max: usize) -> String {
    let text = strip_html(raw).split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max {
        return text;
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    out
}
