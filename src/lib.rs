pub mod client;
pub mod config;
pub mod enrich;
pub mod error;
pub mod fallback;
pub mod mapping;
pub mod media;
pub mod memory;
pub mod seo;
pub mod site;
pub mod storage;
pub mod types;
pub mod validate;

// --- Library API for embedding ---

/// Convenience re-exports for site generators.
pub mod prelude {
    pub use crate::client::ContentClient;
    pub use crate::config::ClientConfig;
    pub use crate::error::{ContentError, ContentResult, Fallback, FallbackReason, OrFallback};
    pub use crate::fallback::with_fallback;
    pub use crate::media::{MediaDescriptor, MediaRef};
    pub use crate::memory::MemoryCache;
    pub use crate::storage::{CacheStats, ContentCache};
    pub use crate::types::{CompanyInfo, CustomFields, HeroContent, Page, Post, Project, Service, Testimonial};
}

pub use client::{Clock, ContentClient};
pub use config::ClientConfig;
pub use error::{ContentError, ContentResult, Fallback, FallbackReason, ValidationError};
pub use memory::MemoryCache;
pub use storage::{CacheEntry, CacheStats, ContentCache};
