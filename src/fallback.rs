//! Built-in content used when the CMS cannot be reached, so a site build
//! still renders every section.

use std::future::Future;
use tracing::error;

use crate::error::ContentResult;
use crate::types::{ContentItem, PostStatus, Rendered, Service, Testimonial, TestimonialFields};

/// Timestamp stamped on built-in records.
pub const FALLBACK_DATE: &str = "2024-01-01T00:00:00";

/// Run a fetch; on error log it and return `fallback`.
pub async fn with_fallback<T, Fut>(fetch: Fut, fallback: T) -> T
where Fut: Future<Output = ContentResult<T>> {
    match fetch.await {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "WordPress API error, using fallback content");
            fallback
        }
    }
}

fn item<F>(id: u64, slug: &str, title: &str, content: &str, excerpt: &str, acf: Option<F>) -> ContentItem<F> {
    ContentItem {
        id,
        slug: slug.to_string(),
        title: Rendered::new(title),
        content: Rendered::new(content),
        excerpt: Rendered::new(excerpt),
        date: FALLBACK_DATE.to_string(),
        modified: FALLBACK_DATE.to_string(),
        status: PostStatus::Publish,
        featured_media: None,
        acf,
        acf_fields: None,
        embedded: None,
    }
}

pub fn services() -> Vec<Service> {
    vec![
        item(
            1,
            "pool-remodeling",
            "Pool Remodeling",
            "Transform your pool with lighting, waterfalls, and modern features.",
            "Complete pool renovation services",
            None,
        ),
        item(
            2,
            "concrete-flooring",
            "Concrete & Flooring",
            "Interior and exterior concrete work, repairs, and decorative solutions.",
            "Professional concrete and flooring services",
            None,
        ),
        item(
            3,
            "residential-cleaning",
            "Residential Cleaning",
            "Deep cleaning and recurring maintenance with eco-friendly products.",
            "Comprehensive residential cleaning services",
            None,
        ),
        item(
            4,
            "technical-support",
            "Technical Support & Plans",
            "Certified engineering support and structural planning services.",
            "Professional technical support and planning",
            None,
        ),
    ]
}

pub fn testimonials() -> Vec<Testimonial> {
    vec![item(
        1,
        "testimonial-1",
        "Amazing Pool Renovation",
        "RenovaLink transformed our backyard completely. The attention to detail was exceptional.",
        "Excellent service and results",
        Some(TestimonialFields {
            client_name: "Maria Rodriguez".to_string(),
            client_location: "Miami, FL".to_string(),
            rating: 5,
            testimonial_image: None,
            service_category: None,
        }),
    )]
}
