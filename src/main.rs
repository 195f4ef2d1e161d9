use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use photo_gallery::{Catalog, CatalogEntry, GalleryConfig, Generator, TierStatus};

#[derive(Parser, Debug)]
#[command(name = "gallery")]
#[command(about = "Build derivatives and browse the photo gallery catalog", long_about = None)]
struct Cli {
    /// JSON gallery config (defaults to the user data directory layout)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the thumbnail for one source image
    Thumb { filename: String },
    /// Generate every resize tier for one source image
    Sizes { filename: String },
    /// Generate thumbnails for the whole catalog
    Thumbs,
    /// Generate resize tiers for the whole catalog
    AllSizes,
    /// List every catalog entry
    List,
    /// Show one page of the catalog
    Page {
        number: usize,
        #[arg(short, long)]
        size: Option<usize>,
    },
    /// Case-insensitive pattern search over image names
    Search { query: String },
    /// Print the catalog as rows
    Grid {
        #[arg(short, long)]
        width: Option<usize>,
    },
    /// Find the source file behind an image name
    Resolve { name: String },
    /// Delete a source image and its derivatives
    Remove { filename: String },
}

/// Application state: one catalog, one generator, same config
struct Gallery {
    catalog: Catalog,
    generator: Generator,
    config: GalleryConfig,
}

impl Gallery {
    fn open(path: Option<PathBuf>) -> Result<Self> {
        let config = match path {
            Some(path) => GalleryConfig::load(&path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GalleryConfig::default(),
        };
        config.ensure_dirs().context("creating gallery directories")?;

        info!(source = %config.source_dir.display(), "gallery opened");

        Ok(Self {
            catalog: Catalog::new(&config),
            generator: Generator::new(config.clone()),
            config,
        })
    }
}

fn print_entries(entries: &[CatalogEntry]) {
    for entry in entries {
        println!("{}\t{}", entry.name, entry.thumb);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let gallery = Gallery::open(cli.config)?;

    match cli.command {
        Command::Thumb { filename } => {
            let outcome = gallery.generator.generate_thumbnail(&filename).await?;
            println!("{}", outcome.path().display());
        }
        Command::Sizes { filename } => {
            let report = gallery.generator.generate_all_sizes(&filename).await?;
            for tier in &report.tiers {
                let status = match &tier.status {
                    TierStatus::Generated => "generated".to_string(),
                    TierStatus::Cached => "cached".to_string(),
                    TierStatus::Failed(err) => format!("failed: {}", err),
                };
                println!("{}\t{}px\t{}", tier.path.display(), tier.effective_width, status);
            }
            println!("took {:?}", report.elapsed);
        }
        Command::Thumbs => {
            let filenames = gallery.catalog.filenames()?;
            let results = gallery.generator.generate_thumbnails_for(filenames).await;
            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            println!("{} thumbnails checked, {} failed", results.len(), failed);
        }
        Command::AllSizes => {
            let filenames = gallery.catalog.filenames()?;
            let results = gallery.generator.generate_sizes_for(filenames).await;
            let incomplete = results
                .iter()
                .filter(|(_, r)| !matches!(r, Ok(report) if report.is_complete()))
                .count();
            println!("{} images resized, {} incomplete", results.len(), incomplete);
        }
        Command::List => print_entries(&gallery.catalog.list_all()?),
        Command::Page { number, size } => {
            let size = size.unwrap_or(gallery.config.page_size);
            print_entries(&gallery.catalog.paginate(number, size)?);
        }
        Command::Search { query } => {
            let results = gallery.catalog.search(&query)?;
            println!("{} results for '{}'", results.count, results.query);
            print_entries(&results.entries);
        }
        Command::Grid { width } => {
            let grid = match width {
                Some(width) => photo_gallery::partition_grid(gallery.catalog.list_all()?, width)?,
                None => gallery.catalog.grid()?,
            };
            for row in &grid.rows {
                let names: Vec<&str> = row.iter().map(|entry| entry.name.as_str()).collect();
                println!("{}", names.join("\t"));
            }
        }
        Command::Resolve { name } => println!("{}", gallery.catalog.resolve(&name)?),
        Command::Remove { filename } => {
            for path in gallery.generator.remove_image(&filename)? {
                println!("removed {}", path.display());
            }
        }
    }

    Ok(())
}
