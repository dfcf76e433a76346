use clap::{Parser, Subcommand};
use memories::config::{self, WidgetConfig};
use memories::gallery::{Gallery, HostDocument, HostElement};
use memories::lightbox::{Key, LightboxEvent};
use memories::manifest::{
    DirFetcher, Fetch, FetchError, FetchResponse, HttpFetcher, Loader, Offline,
};
use memories::output;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

/// Flags describing the page the widget is mounted on.
#[derive(clap::Args, Clone)]
struct HostArgs {
    /// Mark the container with the carousel class
    #[arg(long)]
    carousel: bool,

    /// File holding the page's inline JSON manifest
    #[arg(long)]
    inline: Option<PathBuf>,

    /// Page URL the manifest path is fetched relative to
    #[arg(long, conflicts_with = "root")]
    base_url: Option<String>,

    /// Local site directory the manifest path is read from
    #[arg(long)]
    root: Option<PathBuf>,

    /// Seed for the carousel shuffle (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Render as if the page had no grid container
    #[arg(long)]
    no_container: bool,
}

#[derive(Parser)]
#[command(name = "memories")]
#[command(about = "Image gallery widget: masonry or carousel grid with a lightbox")]
#[command(long_about = "\
Image gallery widget: masonry or carousel grid with a lightbox

The manifest is taken from the first source that works:

  1. Inline data      --inline FILE (used only when it lists at least one image)
  2. Manifest file    assets/memories/index.json, under --root DIR or --base-url URL
  3. Placeholders     15 numbered images (assets/memories/1.webp ...)

Manifests are either a JSON array of images or {\"images\": [...]}:

  [{\"src\": \"a.webp\", \"thumb\": \"a-small.webp\", \"full\": \"a-large.webp\",
    \"title\": \"Dawn\", \"alt\": \"Sun over hills\", \"w\": 1600, \"h\": 1200}]

Lightbox events for 'view':

  click:N   open at image N (as a thumbnail click)
  right     ArrowRight      left      ArrowLeft       escape    Escape
  next      next button     prev      previous button close     close button
  backdrop  click outside the image

Run 'memories gen-config' to generate a documented memories.toml.")]
#[command(version)]
struct Cli {
    /// Widget config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mount the widget and print its markup
    Render {
        #[command(flatten)]
        host: HostArgs,

        /// Wrap the markup in a complete HTML document
        #[arg(long)]
        page: bool,

        /// Print the manifest source and layout instead of markup
        #[arg(long)]
        summary: bool,
    },
    /// Mount the widget and replay lightbox events
    View {
        #[command(flatten)]
        host: HostArgs,

        /// Events to replay, in order
        #[arg(required = true)]
        events: Vec<String>,
    },
    /// Print a stock memories.toml with all options documented
    GenConfig,
}

/// Routes the remote source to whichever fetcher the flags select.
enum HostFetcher {
    Http(HttpFetcher),
    Dir(DirFetcher),
    Offline,
}

impl Fetch for HostFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        match self {
            HostFetcher::Http(f) => f.get(url),
            HostFetcher::Dir(f) => f.get(url),
            HostFetcher::Offline => Offline.get(url),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => WidgetConfig::default(),
    };

    match cli.command {
        Command::Render {
            host,
            page,
            summary,
        } => {
            let Some(gallery) = mount(&host, &config)? else {
                return Ok(());
            };
            if summary {
                output::print_mount(&gallery);
            } else if page {
                println!("{}", gallery.render_page("Memories").into_string());
            } else {
                println!("{}", gallery.render().into_string());
            }
        }
        Command::View { host, events } => {
            let events = events
                .iter()
                .map(|e| parse_event(e).map(|parsed| (e.as_str(), parsed)))
                .collect::<Result<Vec<_>, _>>()?;
            let Some(mut gallery) = mount(&host, &config)? else {
                return Ok(());
            };
            output::print_mount(&gallery);
            for (label, event) in events {
                match event {
                    Event::Click(index) => {
                        gallery.click(index);
                    }
                    Event::Lightbox(event) => gallery.dispatch(&event),
                }
                println!("{}", output::format_step(label, gallery.lightbox()));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Build the host document and mount the widget on it.
///
/// `Ok(None)` when the page has no container; the widget stays inactive.
fn mount(
    host: &HostArgs,
    config: &WidgetConfig,
) -> Result<Option<Gallery>, Box<dyn std::error::Error>> {
    let mut document = HostDocument::default();
    if !host.no_container {
        let mut container = HostElement::new(&config.container_id);
        if host.carousel {
            container = container.with_class(&config.carousel_class);
        }
        document = document.with_element(container);
    }
    if let Some(path) = &host.inline {
        let text = std::fs::read_to_string(path)?;
        document = document.with_element(HostElement::new(&config.inline_data_id).with_text(text));
    }

    let fetcher = match (&host.base_url, &host.root) {
        (Some(url), _) => HostFetcher::Http(HttpFetcher::new(url)?),
        (None, Some(root)) => HostFetcher::Dir(DirFetcher::new(root)),
        (None, None) => HostFetcher::Offline,
    };
    let inline = document.inline_data(&config.inline_data_id);
    let loader = Loader::standard(config, inline, fetcher);

    let gallery = match host.seed {
        Some(seed) => Gallery::mount(&document, config, &loader, &mut StdRng::seed_from_u64(seed)),
        None => Gallery::mount(&document, config, &loader, &mut rand::rng()),
    };
    Ok(gallery)
}

enum Event {
    Click(usize),
    Lightbox(LightboxEvent),
}

fn parse_event(text: &str) -> Result<Event, String> {
    if let Some(index) = text.strip_prefix("click:") {
        return index
            .parse()
            .map(Event::Click)
            .map_err(|_| format!("invalid click index in '{text}'"));
    }
    let event = match text {
        "right" => LightboxEvent::Key(Key::ArrowRight),
        "left" => LightboxEvent::Key(Key::ArrowLeft),
        "escape" => LightboxEvent::Key(Key::Escape),
        "next" => LightboxEvent::NextButton,
        "prev" => LightboxEvent::PrevButton,
        "close" => LightboxEvent::CloseButton,
        "backdrop" => LightboxEvent::Backdrop,
        other => return Err(format!("unknown event '{other}'")),
    };
    Ok(Event::Lightbox(event))
}
