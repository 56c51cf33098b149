// ABOUTME: beekeeper command-line front end for clipping links into cards.
// ABOUTME: Wraps ClipService; every command prints JSON on stdout and logs to stderr.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use beekeeper_cards::{open_store, CardDraft, CardUpdate, ClipService, StoreConfig, StoreKind};
use beekeeper_clip::{classify, CancellationToken, CardType, ClipPayload, ClipRequest, Clipper};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "beekeeper")]
#[command(about = "Clip links into cards and manage them", long_about = None)]
struct Cli {
    /// Card store backend: memory or file (default: $BEEKEEPER_STORE, else memory)
    #[arg(long, global = true)]
    store: Option<StoreKind>,

    /// JSON file for the file backend (default: $BEEKEEPER_DATA, else beekeeper-cards.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// User that owns the cards
    #[arg(long, global = true, default_value = "local")]
    user: String,

    /// Page fetch timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks", global = true)]
    allow_private_networks: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a link's metadata and save it as a card
    Clip(ClipArgs),
    /// Show what clipping a link would produce, without saving
    Preview(ClipArgs),
    /// Extract metadata from a local HTML file
    Extract {
        /// HTML file to read
        #[arg(long)]
        html: PathBuf,
        /// URL the HTML was served from
        #[arg(long)]
        url: String,
    },
    /// Save a card typed in by hand, without fetching anything
    Note {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List cards, newest first
    List,
    /// Edit a card's title, description, tags or pinned flag
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replaces all tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Removes all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
        #[arg(long)]
        pinned: Option<bool>,
    },
    /// Pin a card
    Pin { id: String },
    /// Unpin a card
    Unpin { id: String },
    /// Delete a card permanently
    Delete { id: String },
}

#[derive(Args, Debug)]
struct ClipArgs {
    url: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    favicon: Option<String>,
    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl ClipArgs {
    fn request(&self) -> ClipRequest {
        ClipRequest {
            url: Some(self.url.clone()),
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            favicon: self.favicon.clone(),
            tags: self.tags.clone(),
        }
    }
}

#[derive(Serialize)]
struct Preview {
    #[serde(rename = "type")]
    card_type: CardType,
    #[serde(flatten)]
    payload: ClipPayload,
}

impl Cli {
    /// Flags win; the environment only fills what they leave unset.
    fn store_config(&self) -> Result<StoreConfig> {
        Ok(StoreConfig::with_overrides(self.store, self.data.clone())?)
    }

    fn clipper(&self) -> Result<Clipper> {
        Ok(Clipper::builder()
            .timeout(Duration::from_secs(self.timeout))
            .allow_private_networks(self.allow_private_networks)
            .build()?)
    }

    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let out = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        println!("{out}");
        Ok(())
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Cancels `token` on Ctrl-C so an in-flight fetch is dropped.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling clip");
            child.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let clipper = cli.clipper()?;
    if let Command::Extract { html, url } = &cli.command {
        let content = fs::read_to_string(html)
            .with_context(|| format!("reading {}", html.display()))?;
        return cli.print(&clipper.extract(&content, url));
    }

    let store = open_store(&cli.store_config()?).await?;
    let service = ClipService::new(clipper, store);
    let user = cli.user.as_str();

    match &cli.command {
        Command::Clip(args) => {
            let token = cancel_on_ctrl_c();
            let card = service
                .clip_until_cancelled(user, &args.request(), &token)
                .await?;
            cli.print(&card)
        }
        Command::Preview(args) => {
            let payload = service.preview(&args.request()).await?;
            cli.print(&Preview {
                card_type: classify(Some(&payload.url)),
                payload,
            })
        }
        Command::Note {
            title,
            description,
            url,
            tags,
        } => {
            let draft = CardDraft {
                url: url.clone(),
                title: title.clone(),
                description: description.clone(),
                tags: tags.clone(),
                ..Default::default()
            };
            cli.print(&service.add_manual(user, draft).await?)
        }
        Command::List => cli.print(&service.list(user).await?),
        Command::Update {
            id,
            title,
            description,
            tags,
            clear_tags,
            pinned,
        } => {
            let update = CardUpdate {
                title: title.clone(),
                description: description.clone(),
                tags: if *clear_tags {
                    Some(Vec::new())
                } else if tags.is_empty() {
                    None
                } else {
                    Some(tags.clone())
                },
                pinned: *pinned,
            };
            if update.is_empty() {
                bail!("nothing to update: pass --title, --description, --tag, --clear-tags or --pinned");
            }
            cli.print(&service.update(user, id, update).await?)
        }
        Command::Pin { id } => cli.print(&service.pin(user, id, true).await?),
        Command::Unpin { id } => cli.print(&service.pin(user, id, false).await?),
        Command::Delete { id } => {
            let deleted = service.delete(user, id).await?;
            cli.print(&serde_json::json!({ "id": id, "deleted": deleted }))
        }
        Command::Extract { .. } => Ok(()),
    }
}
