//! page-tags command line
//!
//! Works on page snapshots (JSON files produced by `capture`) so tags can be
//! created and re-rendered without a browser extension:
//!
//! ```text
//! page-tags capture https://example.com -o page.json
//! page-tags locate --page page.json --find "some quote"
//! page-tags tag --page page.json --store tags.json --site https://example.com \
//!     --start "/html/body/P[2]/text()[1]" --start-offset 4 --end-offset 18 --text "@bob look"
//! page-tags render --page page.json --store tags.json --site https://example.com -o out.html
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use page_tags::{
    DecorationEngine, Document, JsonFileStore, LaunchOptions, NodeId, NotificationCenter, OverlayManager,
    PageCapture, PageContext, ScrollPosition, SelectionController, SelectionRange, Settings, locator,
};
use page_tags::dom::load_snapshot;
use page_tags::error::Error;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "page-tags")]
#[command(version)]
#[command(about = "Anchor tags to spans of web pages and highlight them again later", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Snapshot a live page into a JSON page model
    Capture {
        url: String,

        /// Output file for the snapshot
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,

        /// Launch browser in headed mode (default: headless)
        #[arg(long, short = 'H')]
        headed: bool,

        /// Path to custom browser executable
        #[arg(long, value_name = "PATH")]
        executable_path: Option<PathBuf>,

        /// Milliseconds to wait after navigation
        #[arg(long, default_value = "500")]
        settle_ms: u64,
    },

    /// Print the locator of a node in a snapshot
    Locate {
        #[arg(long, value_name = "FILE")]
        page: PathBuf,

        /// Child indices from the document element, e.g. `1.0.2`
        #[arg(long, conflicts_with = "find")]
        node_path: Option<String>,

        /// First text node containing this text
        #[arg(long)]
        find: Option<String>,
    },

    /// Tag a span of a snapshot and save it to a store file
    Tag {
        #[arg(long, value_name = "FILE")]
        page: PathBuf,

        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        /// URL of the captured page
        #[arg(long)]
        site: String,

        /// Locator of the start container
        #[arg(long)]
        start: String,

        /// Locator of the end container (defaults to the start container)
        #[arg(long)]
        end: Option<String>,

        #[arg(long, default_value = "0")]
        start_offset: usize,

        #[arg(long)]
        end_offset: usize,

        /// Tag input: `@name` recipients followed by an optional message
        #[arg(long)]
        text: String,

        /// Owner recorded for the tag
        #[arg(long, default_value = "me")]
        owner: String,

        /// Settings JSON file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },

    /// Render the stored tags of a site onto a snapshot
    Render {
        #[arg(long, value_name = "FILE")]
        page: PathBuf,

        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        #[arg(long)]
        site: String,

        /// Settings JSON file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Write the decorated HTML here instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load(path).with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => {
            let mut settings = Settings::default();
            settings.apply_env()?;
            settings
        }
    };
    Ok(settings)
}

fn page_context(site: &str, settings: Settings) -> (PageContext, Rc<NotificationCenter>) {
    let center = Rc::new(NotificationCenter::new());
    (PageContext::new(site, settings, center.clone()), center)
}

fn print_notifications(center: &NotificationCenter) {
    for notification in center.active() {
        eprintln!("[{:?}] {}", notification.level, notification.message);
    }
}

fn node_at(doc: &Document, path: &str) -> anyhow::Result<NodeId> {
    let mut node = doc.document_element();
    for part in path.split('.').filter(|p| !p.is_empty()) {
        let index: usize = part.parse().with_context(|| format!("Invalid child index '{}'", part))?;
        node = *doc
            .children(node)
            .get(index)
            .with_context(|| format!("Node has no child {}", index))?;
    }
    Ok(node)
}

fn find_text(doc: &Document, needle: &str) -> Option<(NodeId, usize)> {
    doc.descendants(doc.document_element()).find_map(|node| {
        let text = doc.text(node)?;
        let byte = text.find(needle)?;
        Some((node, text[..byte].encode_utf16().count()))
    })
}

fn resolve_container(doc: &Document, path: &str) -> anyhow::Result<NodeId> {
    locator::resolve(doc, path).ok_or_else(|| Error::ResolutionFailed(path.to_string()).into())
}

fn capture(url: &str, output: &Path, options: LaunchOptions) -> anyhow::Result<()> {
    let capture = PageCapture::launch(options)?;
    let doc = capture.capture(url)?;
    let json = serde_json::to_string_pretty(&doc.to_snapshot())?;
    std::fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!("Captured {} into {}", url, output.display());
    Ok(())
}

fn locate(page: &Path, node_path: Option<&str>, find: Option<&str>) -> anyhow::Result<()> {
    let doc = load_snapshot(page)?;
    match (node_path, find) {
        (Some(path), _) => {
            let node = node_at(&doc, path)?;
            println!("{}", locator::locate(&doc, node)?);
        }
        (None, Some(needle)) => {
            let Some((node, offset)) = find_text(&doc, needle) else {
                bail!("No text node contains '{}'", needle);
            };
            let end = offset + needle.encode_utf16().count();
            println!("{}\t{}\t{}", locator::locate(&doc, node)?, offset, end);
        }
        (None, None) => bail!("Pass --node-path or --find"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn tag(
    page: &Path,
    store: &Path,
    site: &str,
    start: &str,
    end: Option<&str>,
    start_offset: usize,
    end_offset: usize,
    text: &str,
    owner: &str,
    settings: Settings,
) -> anyhow::Result<()> {
    if settings.is_blocked(site) {
        return Err(Error::Blocked(site.to_string()).into());
    }

    let mut doc = load_snapshot(page)?;
    let start_container = resolve_container(&doc, start)?;
    let end_container = match end {
        Some(end) => resolve_container(&doc, end)?,
        None => start_container,
    };

    let (ctx, center) = page_context(site, settings);
    let mut controller = SelectionController::new(ctx);
    let mut engine = DecorationEngine::new();
    let store = JsonFileStore::new(store, owner);

    let range = SelectionRange::new(start_container, start_offset, end_container, end_offset);
    if !controller.pointer_up(&mut doc, &engine, range, ScrollPosition::default())? {
        bail!("Selection is empty");
    }
    controller.affordance_click(&mut doc)?;
    controller.input(&mut doc, text);

    let result = controller.submit(&mut doc, &mut engine, &store).await;
    print_notifications(&center);
    let outcomes = result?;
    if outcomes.is_empty() {
        bail!("Nothing was tagged");
    }

    let anchor = engine
        .registry()
        .iter()
        .map(|d| doc.text_content(d.element))
        .collect::<Vec<_>>()
        .join(" .. ");
    println!("Tagged \"{}\"", anchor);
    Ok(())
}

async fn render(page: &Path, store: &Path, site: &str, settings: Settings, output: Option<&Path>) -> anyhow::Result<()> {
    let mut doc = load_snapshot(page)?;
    let (ctx, center) = page_context(site, settings);
    let mut manager = OverlayManager::new(ctx);
    let mut engine = DecorationEngine::new();
    let store = JsonFileStore::new(store, "me");

    let result = manager.load(&mut doc, &mut engine, &store).await;
    print_notifications(&center);
    let Some(report) = result? else {
        eprintln!("Nothing rendered for {}", site);
        return Ok(());
    };

    let html = doc.to_html();
    match output {
        Some(path) => std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", html),
    }

    eprintln!(
        "Rendered {}/{} tags ({} decorations){}",
        report.rendered,
        report.total,
        report.decorations,
        if report.stale { " from stale cache" } else { "" }
    );
    for skipped in &report.skipped {
        eprintln!("  skipped #{} by {}: {}", skipped.index, skipped.owner, skipped.reason);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Capture {
            url,
            output,
            headed,
            executable_path,
            settle_ms,
        } => {
            let mut options = LaunchOptions::new().headless(!headed).settle_ms(settle_ms);
            if let Some(path) = executable_path {
                options = options.chrome_path(path);
            }
            capture(&url, &output, options)
        }
        Command::Locate { page, node_path, find } => locate(&page, node_path.as_deref(), find.as_deref()),
        Command::Tag {
            page,
            store,
            site,
            start,
            end,
            start_offset,
            end_offset,
            text,
            owner,
            settings,
        } => {
            let settings = load_settings(settings.as_deref())?;
            tag(
                &page,
                &store,
                &site,
                &start,
                end.as_deref(),
                start_offset,
                end_offset,
                &text,
                &owner,
                settings,
            )
            .await
        }
        Command::Render {
            page,
            store,
            site,
            settings,
            output,
        } => {
            let settings = load_settings(settings.as_deref())?;
            render(&page, &store, &site, settings, output.as_deref()).await
        }
    }
}
