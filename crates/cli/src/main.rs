use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use recorte_core::{Branding, Pipeline, PipelineConfig, page_margins, render_print_html};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the assembled article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, json", s)),
        }
    }
}

/// Turn a news article into a print-ready document
#[derive(Parser, Debug)]
#[command(name = "recorte")]
#[command(author = "Recorte Contributors")]
#[command(version = "1.0.0")]
#[command(about = "Turn news articles into print-ready documents", long_about = None)]
struct Args {
    /// Article URL to fetch and process
    #[arg(value_name = "URL")]
    url: String,

    /// Read rendered page HTML from a file or "-" (stdin) instead of fetching
    #[arg(long, value_name = "FILE")]
    html: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Customer branding directory containing header.png/footer.png
    #[arg(long, value_name = "DIR")]
    branding_dir: Option<PathBuf>,

    /// HTTP timeout in seconds for the source page
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Per-image fetch timeout in seconds
    #[arg(long, default_value = "15", value_name = "SECS")]
    image_timeout: u64,

    /// Maximum concurrent image downloads
    #[arg(long, default_value = "4", value_name = "NUM")]
    max_images: usize,

    /// Minimum extraction score threshold
    #[arg(long, default_value = "10", value_name = "NUM")]
    min_score: f64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Print a styled banner for verbose mode
fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Recorte".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Turn news articles into print-ready documents".dimmed());
    eprintln!();
}

/// Print a styled step message
fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("recorte_core=debug")),
            )
            .with_writer(io::stderr)
            .init();
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let config = PipelineConfig::builder()
        .min_score(args.min_score)
        .fetch_timeout(args.timeout)
        .image_timeout(args.image_timeout)
        .max_images_in_flight(args.max_images)
        .build();
    let pipeline = Pipeline::with_config(config);

    let article = match &args.html {
        Some(input) => {
            let html = if input == "-" {
                if args.verbose {
                    print_step(1, 3, "Reading rendered HTML from stdin");
                }
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read from stdin")?;
                buffer
            } else {
                if args.verbose {
                    print_step(1, 3, &format!("Reading rendered HTML from {}", input.bright_white()));
                }
                fs::read_to_string(input).with_context(|| format!("Failed to read file: {}", input))?
            };

            if args.verbose {
                print_step(2, 3, "Running the extraction pipeline");
            }
            pipeline
                .process(&html, &args.url)
                .await
                .context("Failed to process the page")?
        }
        None => {
            if args.verbose {
                print_step(1, 3, &format!("Fetching {}", args.url.bright_white().underline()));
                print_step(2, 3, "Running the extraction pipeline");
            }
            pipeline
                .fetch_and_process(&args.url)
                .await
                .context("Failed to process the page")?
        }
    };

    if args.verbose {
        eprintln!("  {} {}", "Title:".dimmed(), article.title.bright_white());
        if let Some(date) = &article.published_date {
            eprintln!("  {} {}", "Date:".dimmed(), date.bright_white());
        }
        eprintln!("  {} {}", "Length:".dimmed(), article.length().to_string().bright_white());
        eprintln!();
        print_step(3, 3, "Writing output");
    }

    let output = match args.format {
        OutputFormat::Html => render_print_html(&article),
        OutputFormat::Json => serde_json::to_string_pretty(&article).context("Failed to serialize article")?,
    };

    if let Some(dir) = &args.branding_dir {
        let branding = Branding::from_dir(dir);
        let margins = page_margins(&branding);
        if args.verbose {
            print_info(&format!(
                "Branding: header {}, footer {} (margins top {} / bottom {})",
                if branding.header.is_some() { "yes" } else { "no" },
                if branding.footer.is_some() { "yes" } else { "no" },
                margins.top,
                margins.bottom,
            ));
        }
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
