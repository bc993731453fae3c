use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use flat_gal::types::DisplayMode;
use flat_gal::{bundle, config, generate, output, scan, serve, thumbs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("FLAT_GAL_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FLAT_GAL_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "flat-gal")]
#[command(about = "Single-page gallery for a directory of rendered images")]
#[command(long_about = "\
Single-page gallery for a directory of rendered images

The directory is the data source. Every image becomes a thumbnail on the page,
newest first, linking to the full-size file. The most recent bundle is linked
at the top of the page.

Directory structure:

  gallery/
  ├── config.toml                      # Optional, overrides stock defaults
  ├── favicon.png                      # Linked as the icon, never listed
  ├── Vaquita.png                      # Full-size image (primary format)
  ├── Vaquita.svg                      # Alternate format, linked with ?svg
  ├── thumbs/
  │   └── Vaquita.png                  # Thumbnail shown on the page
  ├── gallery_png_2020-11-14.zip       # Newest primary bundle gets linked
  └── gallery_svg_2020-11-14.zip

Run 'flat-gal gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Gallery directory
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Log debug diagnostics (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List images and archives in display order
    Check {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the static gallery pages into the directory
    Generate,
    /// Create missing thumbnails
    Thumbs {
        /// Regenerate thumbnails that already exist
        #[arg(long)]
        force: bool,
    },
    /// Write zip bundles of the full-size files
    Bundle {
        /// Which format to bundle
        #[arg(long, value_enum, default_value_t = BundleMode::Both)]
        mode: BundleMode,
        /// Date tag for the archive name (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Serve the gallery over HTTP, rendering on every request
    Serve {
        /// Address to bind (default from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default from config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum BundleMode {
    Primary,
    Alternate,
    Both,
}

impl BundleMode {
    fn modes(self) -> &'static [DisplayMode] {
        match self {
            BundleMode::Primary => &[DisplayMode::Primary],
            BundleMode::Alternate => &[DisplayMode::Alternate],
            BundleMode::Both => &DisplayMode::ALL,
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check { json } => {
            let (config, listing) = scan::scan_dir(&cli.dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("==> Checking {}", cli.dir.display());
                output::print_scan_output(&listing, &config);
            }
        }
        Command::Generate => {
            let config = config::load_config(&cli.dir)?;
            let report = generate::generate(&cli.dir, &config)?;
            output::print_generate_output(&report, &config);
        }
        Command::Thumbs { force } => {
            let config = config::load_config(&cli.dir)?;
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_thumb_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = thumbs::create_thumbnails(&cli.dir, &config, force, Some(tx))?;
            printer.join().unwrap();
            println!("Thumbnails: {}", report);
        }
        Command::Bundle { mode, date } => {
            let config = config::load_config(&cli.dir)?;
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            for &display_mode in mode.modes() {
                let report = bundle::bundle(&cli.dir, &config, display_mode, date)?;
                output::print_bundle_output(&report);
            }
        }
        Command::Serve { host, port } => {
            let config = config::load_config(&cli.dir)?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = serve::ServeState {
                dir: cli.dir,
                config,
            };
            tokio::runtime::Runtime::new()?.block_on(serve::run(state, &host, port))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
