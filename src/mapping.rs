use serde_json::Value;

use crate::types::{CompanyInfo, CustomFields, Page, Project};

pub const SERVICE_FEATURE_SLOTS: usize = 5;

/// Company details from the page's ACF group; blank fields keep their defaults.
pub fn company_info_from_page(page: &Page, fallback_email: &str) -> CompanyInfo {
    let fields = page.fields();
    let mut info = CompanyInfo::fallback(fallback_email);
    let pick = |target: &mut String, name: &str| {
        if let Some(v) = fields.text(name) {
            *target = v.to_string();
        }
    };
    pick(&mut info.name, "company_name");
    pick(&mut info.description, "company_description");
    pick(&mut info.emergency_phone, "emergency_phone");
    pick(&mut info.regular_phone, "regular_phone");
    pick(&mut info.email, "email");
    info.page_found = true;
    info.page_id = Some(page.id);
    info
}

/// `service_feature_1..=5`, trimmed, blanks skipped.
pub fn service_features(fields: &CustomFields) -> Vec<String> {
    (1..=SERVICE_FEATURE_SLOTS)
        .filter_map(|i| fields.text(&format!("service_feature_{i}")).map(str::to_string))
        .collect()
}

/// The service a project is linked to. ACF stores it as an id, a numeric
/// string, or a post object carrying `id`/`ID`.
pub fn related_service_id(project: &Project) -> Option<u64> {
    [project.acf.as_ref(), project.acf_fields.as_ref()]
        .into_iter()
        .flatten()
        .find_map(|fields| fields.get("related_service").and_then(id_of))
}

fn id_of(v: &Value) -> Option<u64> {
    let id = match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(o) => o.get("id").or_else(|| o.get("ID")).and_then(id_of),
        _ => None,
    };
    id.filter(|id| *id > 0)
}
