//! Media enrichment: turning bare ACF attachment ids into descriptors.
//!
//! Lookups fan out through `futures::stream::buffered`, bounded by
//! `max_concurrency` and yielding results in input order. A slot whose lookup
//! fails is skipped (galleries) or left as the bare id (projects).

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::client::ContentClient;
use crate::media::{MediaDescriptor, MediaRef};
use crate::types::{CustomFields, Project, Service};

pub const SERVICE_IMAGE_PREFIX: &str = "service_image_";
pub const SERVICE_GALLERY_SLOTS: usize = 4;
pub const PROJECT_IMAGE_PREFIX: &str = "project_image_";
pub const PROJECT_GALLERY_SLOTS: usize = 6;
pub const PROJECT_BEFORE_IMAGE: &str = "project_before_image";
pub const PROJECT_AFTER_IMAGE: &str = "project_after_image";

/// Every image slot of a project, gallery first.
pub fn project_image_fields() -> Vec<String> {
    (1..=PROJECT_GALLERY_SLOTS)
        .map(|i| format!("{PROJECT_IMAGE_PREFIX}{i}"))
        .chain([PROJECT_BEFORE_IMAGE.to_string(), PROJECT_AFTER_IMAGE.to_string()])
        .collect()
}

/// True when the server already expanded at least one gallery image.
pub fn has_complete_images(fields: &CustomFields) -> bool {
    (1..=PROJECT_GALLERY_SLOTS)
        .any(|i| matches!(fields.media_ref(&format!("{PROJECT_IMAGE_PREFIX}{i}")), MediaRef::Resolved(_)))
}

impl ContentClient {
    /// Resolve one slot: expanded objects pass through, ids are looked up.
    pub async fn resolve_ref(&self, slot: MediaRef) -> Option<MediaDescriptor> {
        match slot {
            MediaRef::Resolved(m) => Some(m),
            MediaRef::Unresolved(id) => self.resolve_media(id).await.ok(),
            MediaRef::Empty => None,
        }
    }

    /// Read `{prefix}1..={max_index}` and return the usable images in index
    /// order. Empty slots and failed lookups are skipped.
    pub async fn enrich_gallery(&self, fields: &CustomFields, prefix: &str, max_index: usize) -> Vec<MediaDescriptor> {
        let slots: Vec<MediaRef> = (1..=max_index).map(|i| fields.media_ref(&format!("{prefix}{i}"))).collect();
        let resolved: Vec<Option<MediaDescriptor>> = stream::iter(slots)
            .map(|slot| self.resolve_ref(slot))
            .buffered(self.config().concurrency())
            .collect()
            .await;
        resolved.into_iter().flatten().collect()
    }

    pub async fn service_gallery(&self, service: &Service) -> Vec<MediaDescriptor> {
        self.enrich_gallery(&service.fields(), SERVICE_IMAGE_PREFIX, SERVICE_GALLERY_SLOTS).await
    }

    pub async fn project_gallery(&self, project: &Project) -> Vec<MediaDescriptor> {
        self.enrich_gallery(&project.fields(), PROJECT_IMAGE_PREFIX, PROJECT_GALLERY_SLOTS).await
    }

    /// Before and after images of a project.
    pub async fn project_before_after(&self, project: &Project) -> (Option<MediaDescriptor>, Option<MediaDescriptor>) {
        let fields = project.fields();
        futures::join!(
            self.resolve_ref(fields.media_ref(PROJECT_BEFORE_IMAGE)),
            self.resolve_ref(fields.media_ref(PROJECT_AFTER_IMAGE)),
        )
    }

    /// Expand every bare image id of every project in one bounded fan-out.
    /// Order is preserved, expanded objects and non-image fields are left
    /// untouched, and ids that fail to resolve stay as they were.
    pub async fn enrich_projects(&self, mut projects: Vec<Project>) -> Vec<Project> {
        let image_fields = project_image_fields();
        let mut jobs: Vec<(usize, String, u64)> = Vec::new();
        for (idx, project) in projects.iter().enumerate() {
            if project.acf_fields.as_ref().is_some_and(has_complete_images) {
                continue;
            }
            let Some(acf) = &project.acf else { continue };
            for name in &image_fields {
                if let MediaRef::Unresolved(id) = acf.media_ref(name) {
                    jobs.push((idx, name.clone(), id));
                }
            }
        }
        if jobs.is_empty() {
            return projects;
        }
        debug!(projects = projects.len(), lookups = jobs.len(), "enriching project images");

        let resolved: Vec<(usize, String, Option<MediaDescriptor>)> = stream::iter(jobs)
            .map(|(idx, name, id)| async move { (idx, name, self.resolve_media(id).await.ok()) })
            .buffered(self.config().concurrency())
            .collect()
            .await;

        for (idx, name, media) in resolved {
            let (Some(media), Some(acf)) = (media, projects[idx].acf.as_mut()) else { continue };
            acf.set_media(&name, &media);
        }
        projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_fields_cover_gallery_and_before_after() {
        let f = project_image_fields();
        assert_eq!(f.len(), 8);
        assert_eq!(f[0], "project_image_1");
        assert_eq!(f[5], "project_image_6");
        assert_eq!(f[7], "project_after_image");
    }

    #[test]
    fn complete_images_needs_an_object_with_url() {
        let mut fields = CustomFields::new();
        fields.insert("project_image_1", json!(12));
        assert!(!has_complete_images(&fields));
        fields.insert("project_image_2", json!({"ID": 3, "url": "https://x/3.jpg"}));
        assert!(has_complete_images(&fields));
    }
}
