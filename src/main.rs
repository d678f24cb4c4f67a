//! CLI entry point for ringlog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ringlog::commands::{list, new, render};

#[derive(Parser)]
#[command(name = "ringlog")]
#[command(author = "Ring-a-Log")]
#[command(version = "0.1.0")]
#[command(about = "Markdown content tools for the Ring-a-Log blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file to HTML
    #[command(alias = "r")]
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List posts or tags
    List {
        /// Type of content to list (posts, tags)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a published post by slug
    Show {
        slug: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Description (defaults to the title)
        #[arg(long)]
        description: Option<String>,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Slug (generated from the title if omitted)
        #[arg(short, long)]
        slug: Option<String>,

        /// Mark the post as a draft
        #[arg(long)]
        draft: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "ringlog=debug,info"
    } else {
        "ringlog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Render { file, output } => {
            let blog = ringlog::Blog::new(&base_dir)?;
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            render::run(&blog, &file, output.as_deref())?;
        }

        Commands::List {
            r#type,
            tag,
            page,
            json,
        } => {
            let blog = ringlog::Blog::new(&base_dir)?;
            tracing::debug!("Listing {} from {:?}", r#type, blog.blog_dir);
            let options = list::ListOptions { tag, page, json };
            list::run(&blog, &r#type, &options)?;
        }

        Commands::Show { slug } => {
            let blog = ringlog::Blog::new(&base_dir)?;
            print!("{}", render::show(&blog, &slug)?);
        }

        Commands::New {
            title,
            description,
            tags,
            slug,
            draft,
        } => {
            let blog = ringlog::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let post = new::NewPost {
                title,
                description,
                tags: tags
                    .into_iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
                slug,
                draft,
            };
            new::run(&blog, &post)?;
        }

        Commands::Version => {
            println!("ringlog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
