use serde_json::Value;
use tracing::{info, warn};

use crate::client::ContentClient;
use crate::error::{ContentResult, Fallback, FallbackReason};
use crate::mapping::{company_info_from_page, related_service_id};
use crate::types::{CompanyInfo, HeroContent, Page, Post, Project, Service, Testimonial};

pub const POSTS_ENDPOINT: &str = "wp/v2/posts";
pub const PAGES_ENDPOINT: &str = "wp/v2/pages";
pub const SERVICES_ENDPOINT: &str = "wp/v2/servicios";
pub const PROJECTS_ENDPOINT: &str = "wp/v2/proyectos";
pub const TESTIMONIALS_ENDPOINT: &str = "wp/v2/testimonios";
pub const SITE_CONFIG_ROUTE: &str = "site-config";
pub const HERO_CONTENT_ROUTE: &str = "hero-content";

const PUBLISHED: (&str, &str) = ("status", "publish");
const COMPANY_LOGO_FIELD: &str = "company_logo";

impl ContentClient {
    pub async fn posts(&self) -> ContentResult<Vec<Post>> {
        self.fetch_collection(POSTS_ENDPOINT, &[PUBLISHED]).await
    }

    pub async fn post_by_slug(&self, slug: &str) -> ContentResult<Option<Post>> {
        Ok(self.fetch_collection(POSTS_ENDPOINT, &[PUBLISHED, ("slug", slug)]).await?.into_iter().next())
    }

    pub async fn services(&self) -> ContentResult<Vec<Service>> {
        let services: Vec<Service> = self.fetch_collection(SERVICES_ENDPOINT, &[PUBLISHED]).await?;
        info!(count = services.len(), "services fetched");
        Ok(services)
    }

    pub async fn service_by_slug(&self, slug: &str) -> ContentResult<Option<Service>> {
        Ok(self.fetch_collection(SERVICES_ENDPOINT, &[PUBLISHED, ("slug", slug)]).await?.into_iter().next())
    }

    /// Published projects with their image ids expanded.
    pub async fn projects(&self) -> ContentResult<Vec<Project>> {
        let projects = self.fetch_collection(PROJECTS_ENDPOINT, &[PUBLISHED]).await?;
        Ok(self.enrich_projects(projects).await)
    }

    pub async fn projects_by_category(&self, category: &str) -> ContentResult<Vec<Project>> {
        let projects = self
            .fetch_collection(
                PROJECTS_ENDPOINT,
                &[PUBLISHED, ("meta_key", "project_category"), ("meta_value", category)],
            )
            .await?;
        Ok(self.enrich_projects(projects).await)
    }

    /// Projects whose `related_service` points at the service with this slug.
    /// An unknown slug yields an empty list.
    pub async fn projects_by_service(&self, service_slug: &str) -> ContentResult<Vec<Project>> {
        let Some(service) = self.service_by_slug(service_slug).await? else {
            return Ok(Vec::new());
        };
        let projects = self.projects().await?;
        Ok(projects.into_iter().filter(|p| related_service_id(p) == Some(service.id)).collect())
    }

    pub async fn testimonials(&self) -> ContentResult<Vec<Testimonial>> {
        self.fetch_collection(TESTIMONIALS_ENDPOINT, &[PUBLISHED]).await
    }

    pub async fn featured_testimonials(&self) -> ContentResult<Vec<Testimonial>> {
        self.fetch_collection(TESTIMONIALS_ENDPOINT, &[PUBLISHED, ("featured", "true")]).await
    }

    /// Company details from the designated page. A missing page or a failed
    /// lookup yields the default record (`page_found = false`) and the reason.
    pub async fn company_info(&self) -> Result<CompanyInfo, Fallback<CompanyInfo>> {
        let slug = self.config().company_page_slug.clone();
        let email = self.config().company_fallback_email.clone();
        let page: Option<Page> = match self.fetch_single_by_field(PAGES_ENDPOINT, "slug", &slug).await {
            Ok(p) => p,
            Err(e) => {
                warn!(page = %slug, error = %e, "failed to fetch company info");
                return Err(Fallback::new(CompanyInfo::fallback(&email), &e));
            }
        };
        let Some(page) = page else {
            warn!(page = %slug, "company info page not found");
            return Err(Fallback::new(CompanyInfo::fallback(&email), FallbackReason::NotFound(slug)));
        };
        let mut info = company_info_from_page(&page, &email);
        info.logo = self.resolve_ref(page.fields().media_ref(COMPANY_LOGO_FIELD)).await;
        Ok(info)
    }

    /// Free-form site configuration from the custom namespace.
    pub async fn site_config(&self) -> Result<Value, FallbackReason> {
        let route = self.custom_endpoint(SITE_CONFIG_ROUTE);
        self.fetch_document(&route).await.map_err(|e| {
            warn!(error = %e, "failed to fetch site config");
            FallbackReason::from(&e)
        })
    }

    /// Home page hero, or the built-in hero when the route fails.
    pub async fn hero_content(&self) -> Result<HeroContent, Fallback<HeroContent>> {
        let route = self.custom_endpoint(HERO_CONTENT_ROUTE);
        self.fetch_document(&route).await.map_err(|e| {
            warn!(error = %e, "failed to fetch hero content");
            Fallback::new(HeroContent::default(), &e)
        })
    }
}
