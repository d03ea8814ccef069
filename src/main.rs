mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use renovalink_content::error::OrFallback;
use renovalink_content::{ClientConfig, ContentClient, Fallback, MemoryCache};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let client = ContentClient::new(config, Arc::new(MemoryCache::new())).context("creating content client")?;

    match cli.command {
        Commands::Health => {
            if let Err(reason) = client.health().await {
                bail!("API unreachable: {reason}");
            }
            println!("ok");
        }
        Commands::Posts { slug: Some(slug) } => print(&client.post_by_slug(&slug).await?)?,
        Commands::Posts { slug: None } => print(&client.posts().await?)?,
        Commands::Services { slug: Some(slug), gallery } => {
            let Some(service) = client.service_by_slug(&slug).await? else {
                bail!("no service with slug {slug}");
            };
            if gallery {
                print(&client.service_gallery(&service).await)?;
            } else {
                print(&service)?;
            }
        }
        Commands::Services { slug: None, .. } => print(&client.services().await?)?,
        Commands::Projects { category: Some(category), .. } => print(&client.projects_by_category(&category).await?)?,
        Commands::Projects { service: Some(service), .. } => print(&client.projects_by_service(&service).await?)?,
        Commands::Projects { .. } => print(&client.projects().await?)?,
        Commands::Testimonials { featured: true } => print(&client.featured_testimonials().await?)?,
        Commands::Testimonials { featured: false } => print(&client.testimonials().await?)?,
        Commands::Company => print(&settle(client.company_info().await))?,
        Commands::Hero => print(&settle(client.hero_content().await))?,
        Commands::SiteConfig => match client.site_config().await {
            Ok(doc) => print(&doc)?,
            Err(reason) => bail!("site config unavailable: {reason}"),
        },
        Commands::Media { id } => match client.resolve_media(id).await {
            Ok(media) => print(&media)?,
            Err(reason) => bail!("media {id} unavailable: {reason}"),
        },
        Commands::Warm => {
            let (posts, services, projects, testimonials) =
                tokio::join!(client.posts(), client.services(), client.projects(), client.testimonials());
            for (name, res) in [
                ("posts", posts.map(|v| v.len())),
                ("services", services.map(|v| v.len())),
                ("projects", projects.map(|v| v.len())),
                ("testimonials", testimonials.map(|v| v.len())),
            ] {
                match res {
                    Ok(n) => eprintln!("{name}: {n}"),
                    Err(e) => warn!(collection = name, error = %e, "warm-up fetch failed"),
                }
            }
            print(&client.cache_stats().await)?;
        }
    }
    Ok(())
}

/// Explicit path, else `config.toml` in the platform config dir if present,
/// else defaults. Environment variables override all of them.
fn load_config(explicit: Option<&std::path::Path>) -> Result<ClientConfig> {
    let path: Option<PathBuf> = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => ProjectDirs::from("com", "renovalink", "renovalink-content")
            .map(|proj| proj.config_dir().join("config.toml"))
            .filter(|p| p.exists()),
    };
    let config = match path {
        Some(p) => ClientConfig::from_file(&p).with_context(|| format!("loading config: {}", p.display()))?,
        None => ClientConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn settle<T>(res: Result<T, Fallback<T>>) -> T {
    if let Err(fb) = &res {
        warn!(reason = %fb.reason, "showing fallback content");
    }
    res.or_fallback()
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
