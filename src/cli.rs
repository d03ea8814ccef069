use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect the content a site build would see
#[derive(Parser)]
#[command(name = "renovalink-content")]
#[command(about = "Fetch, validate and inspect RenovaLink WordPress content", long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the API answers
    Health,
    /// List published posts
    Posts {
        /// Fetch a single post by slug
        #[arg(short, long)]
        slug: Option<String>,
    },
    /// List services
    Services {
        /// Fetch a single service by slug
        #[arg(short, long)]
        slug: Option<String>,
        /// Resolve the service gallery (needs --slug)
        #[arg(long)]
        gallery: bool,
    },
    /// List projects with their images resolved
    Projects {
        /// Filter by project category
        #[arg(short, long, conflicts_with = "service")]
        category: Option<String>,
        /// Filter by related service slug
        #[arg(short, long)]
        service: Option<String>,
    },
    /// List testimonials
    Testimonials {
        /// Only featured ones
        #[arg(short, long)]
        featured: bool,
    },
    /// Company details from the company info page
    Company,
    /// Home page hero
    Hero,
    /// Site configuration document
    SiteConfig,
    /// Resolve a media attachment id
    Media {
        id: u64,
    },
    /// Fetch every collection once and print cache statistics
    Warm,
}
