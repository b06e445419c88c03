mod echo;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use herald_core::{
    ConfigLoader, ConfigLoaderBuilder, FetchConfig, Herald, JsonConfig, PageSources, ProjectConfig, ReleaseReport,
    Version, report_to_json,
};
use owo_colors::OwoColorize;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use echo::{print_banner, print_detail, print_info, print_step, print_success, print_timing, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const STEPS: usize = 4;

/// Output format for the generated announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Post,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" | "text" | "txt" => Ok(Self::Post),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: post, json", s)),
        }
    }
}

/// Generate a release announcement post from a project's release notes
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(version)]
#[command(about = "Generate release announcement posts from release notes", long_about = None)]
struct Args {
    /// Release version, e.g. 1.7
    #[arg(value_name = "VERSION", required_unless_present = "completions")]
    release: Option<String>,

    /// Output format (post, json)
    #[arg(short, long, default_value = "post", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Read the release notes page from a file instead of fetching it
    #[arg(long, value_name = "FILE")]
    notes_file: Option<PathBuf>,

    /// Read the release highlights page from a file instead of fetching it
    #[arg(long, value_name = "FILE")]
    highlights_file: Option<PathBuf>,

    /// Project profile (default: ~/.config/herald/project.txt if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project name used in the post
    #[arg(long, value_name = "NAME")]
    project: Option<String>,

    /// Documentation root the page URLs are built from
    #[arg(long, value_name = "URL")]
    docs_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Logs go to stderr so the post on stdout stays clean. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let base_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| if verbose { "debug" } else { "warn" }.to_string());
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(verbose).with_writer(io::stderr))
        .init();
}

fn load_project(args: &Args) -> anyhow::Result<ProjectConfig> {
    let loader = match &args.config {
        Some(path) => ConfigLoaderBuilder::new().custom_path(path).build(),
        None => ConfigLoader::default(),
    };

    if args.verbose
        && let Some(path) = loader.profile_path().context("Failed to locate project profile")?
    {
        print_detail("Profile", &path.display().to_string());
    }

    let mut project = loader.load().context("Failed to load project profile")?;

    if let Some(name) = &args.project {
        project.project = name.clone();
    }
    if let Some(docs_url) = &args.docs_url {
        project.docs_url = docs_url.trim_end_matches('/').to_string();
    }

    Ok(project)
}

fn render(herald: &Herald, report: &ReleaseReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Post => Ok(herald.compose(report)),
        OutputFormat::Json => report_to_json(report, &JsonConfig::default()).context("Failed to render JSON report"),
    }
}

/// A local file replaces the fetch for its page
fn source_label(file: Option<&PathBuf>, url: &str) -> String {
    file.map_or_else(|| url.to_string(), |path| path.display().to_string())
}

fn print_report_details(report: &ReleaseReport) {
    if !report.provenance.notes_page {
        print_warning("Release notes unavailable, counts are zero");
    }
    if !report.provenance.highlights_page {
        print_warning("Highlights page unavailable, highlights come from the release notes");
    }
    print_detail("Tag strategy", report.provenance.tag_strategy.unwrap_or("none"));
    print_detail("Highlight strategy", report.provenance.highlight_strategy.unwrap_or("none"));
    print_detail("Tags", &report.tags.total().to_string());
    print_detail("Highlights", &report.highlights.len().to_string());
    print_detail("Contributors", &report.contributors.to_string());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "herald", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
        print_step(1, STEPS, "Checking version");
    }

    let version = Version::parse(args.release.as_deref().unwrap_or_default()).context("Failed to read version")?;

    if args.verbose {
        print_step(2, STEPS, "Loading project profile");
    }

    let project = load_project(&args)?;

    let fetch = FetchConfig {
        timeout: args.timeout,
        user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
    };
    let herald = Herald::with_project(project).fetch_config(fetch);
    let urls = herald.urls(&version).context("Failed to build release page URLs")?;

    if args.verbose {
        print_detail("Project", &herald.project().project);
        eprintln!();
        print_step(3, STEPS, &format!("Retrieving release {}", version.as_str().bright_white()));
        print_detail("Notes", &source_label(args.notes_file.as_ref(), &urls.notes));
        print_detail("Highlights", &source_label(args.highlights_file.as_ref(), &urls.highlights));
    }

    let sources = PageSources { notes_file: args.notes_file.clone(), highlights_file: args.highlights_file.clone() };
    let started = Instant::now();
    let report = herald.generate(&version, &sources).await.context("Failed to generate release report")?;

    if args.verbose {
        print_timing("Elapsed", started.elapsed().as_millis());
        print_report_details(&report);
        eprintln!();
    }

    let output = render(&herald, &report, args.format)?;

    if args.verbose {
        print_step(4, STEPS, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{}\n", output))
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            if args.verbose {
                print_success(&format!("Output written to {}", path.display().bright_white()));
            }
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
