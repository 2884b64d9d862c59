use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use coinjoin_web::imaging::{RustBackend, Scale};
use coinjoin_web::thumbnails::{DEFAULT_WORKERS, ThumbnailOptions, generate_thumbnails};
use coinjoin_web::{config, content, dates::BuildStamp, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        // Leaked once at startup
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "coinjoin-web")]
#[command(about = "Static report site and thumbnail generator for CoinJoin statistics")]
#[command(long_about = "\
Static report site and thumbnail generator for CoinJoin statistics

'build' turns a chart directory tree into a static HTML site described by a
JSON structure file. 'thumbnails' mirrors an image tree as scaled copies.

Chart tree (data_source):

  data/
  ├── summary.json                 # {\"date\": \"...\"} → \"Last updated\"
  ├── texts/
  │   ├── whirlpool.html           # Snippet above a page's charts
  │   └── ww2_kruw.md              # Markdown works too
  ├── ww2_kruw/                    # Coordinator directory
  │   ├── top.png
  │   ├── 2024-06-01 10-00-00/     # Heading \"June 2024\", newest first
  │   └── 2024-05-01 10-00-00/
  └── whirlpool/

Thumbnails keep relative paths: SRC/a/b.png → DST/a/b.png. Existing
thumbnails newer than their source are skipped unless --overwrite is set.

Set RUST_LOG (e.g. RUST_LOG=debug) for finer control than -v.")]
#[command(version = version_string())]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the HTML site from the structure file
    Build {
        /// Site structure file
        #[arg(long, default_value = "structure.json")]
        config: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Build date (YYYY-MM-DD) used for cache busting and the fallback
        /// "Last updated" text; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Validate the structure file without writing anything
    Check {
        /// Site structure file
        #[arg(long, default_value = "structure.json")]
        config: PathBuf,
    },
    /// Write scaled copies of every image under SRC into DST
    Thumbnails {
        /// Source image tree
        src: PathBuf,

        /// Destination tree (created if missing)
        dst: PathBuf,

        /// Scale factor in (0, 1]; images 900px tall never go below 0.2
        #[arg(long, default_value_t = Scale::default())]
        scale: Scale,

        /// Re-create thumbnails even when they are up to date
        #[arg(long)]
        overwrite: bool,

        /// Number of parallel workers
        #[arg(long, default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
        workers: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build {
            config,
            output: output_dir,
            date,
        } => {
            let site = config::load_config(&config)?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let stamp = BuildStamp::new(today, content::load_summary_date(&site.data_source));
            println!("==> Building {} → {}", config.display(), output_dir.display());
            let report = generate::generate(&site, &stamp, &output_dir)?;
            output::print_generate_output(&report);
        }
        Command::Check { config } => {
            println!("==> Checking {}", config.display());
            let site = config::load_config(&config)?;
            output::print_check_output(&site);
        }
        Command::Thumbnails {
            src,
            dst,
            scale,
            overwrite,
            workers,
        } => {
            let options = ThumbnailOptions {
                scale,
                overwrite,
                workers,
            };
            let summary = generate_thumbnails(&RustBackend::new(), &src, &dst, &options, |event| {
                output::print_thumbnail_event(&event)
            })?;
            output::print_thumbnail_summary(&summary);
        }
    }

    Ok(())
}

fn parse_workers(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Route `tracing` diagnostics to stderr.
///
/// `RUST_LOG` wins when set; otherwise `-v` flags step up from `warn`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
