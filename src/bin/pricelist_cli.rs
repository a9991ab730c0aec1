//! Price List CLI - render and export cards from JSON documents
//!
//! Commands: seed, themes, validate, render, export, share
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation or export failure

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use url::Url;

use pricelist_core::{
    document_fingerprint, render_page, share_link, ExportFormat, PriceListDocument, Session,
    SessionConfig, Settings, ThemeCatalog, Validator,
};

#[derive(Parser)]
#[command(name = "pricelist-cli")]
#[command(about = "Price List CLI - card editor and export engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the seed document
    Seed,

    /// List available themes
    Themes,

    /// Validate a document
    Validate {
        /// Document JSON file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Render the editor page as HTML
    Render {
        /// Document JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Page URL; `?view=public` renders the read-only view
        #[arg(short, long)]
        url: Option<Url>,

        /// Write HTML here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export the card as PNG or PDF
    Export {
        /// Document JSON file
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// Directory the artifact is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the read-only link for a page URL
    Share {
        #[arg(short, long)]
        url: Url,
    },
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!(error = %e, "could not serialize output"),
    }
}

fn fail(code: u8, message: impl std::fmt::Display) -> ExitCode {
    print_json(&json!({ "success": false, "error": message.to_string() }));
    ExitCode::from(code)
}

fn read_document(path: &Path) -> Result<PriceListDocument, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    PriceListDocument::from_json(&content).map_err(|e| format!("Invalid document: {}", e))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "pricelist_core=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => match Settings::load(path) {
            Ok(s) => s,
            Err(e) => return fail(1, format!("Failed to load settings: {}", e)),
        },
        None => Settings::default(),
    };

    match cli.command {
        Commands::Seed => match PriceListDocument::default().to_json_pretty() {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => fail(1, e),
        },

        Commands::Themes => {
            let themes: Vec<_> = ThemeCatalog::list()
                .iter()
                .map(|t| json!({
                    "key": t.key,
                    "name": t.name,
                    "bg": t.bg,
                    "card": t.card,
                    "accent": t.accent,
                    "text": t.text,
                    "muted": t.muted,
                }))
                .collect();
            print_json(&Value::Array(themes));
            ExitCode::SUCCESS
        }

        Commands::Validate { input } => {
            let document = match read_document(&input) {
                Ok(d) => d,
                Err(e) => return fail(1, e),
            };
            let result = Validator::new().validate(&document);
            print_json(&json!(result));
            if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }

        Commands::Render { input, url, out } => {
            let document = match read_document(&input) {
                Ok(d) => d,
                Err(e) => return fail(1, e),
            };
            let (config, share_href) = match &url {
                Some(url) => (
                    SessionConfig::from_url(settings, url),
                    share_link(url).to_string(),
                ),
                None => (SessionConfig::editing(settings), "?view=public".to_string()),
            };
            let session = match Session::from_document(config, document) {
                Ok(s) => s,
                Err(e) => return fail(2, e),
            };
            let html = match render_page(&session, &share_href) {
                Ok(h) => h,
                Err(e) => return fail(1, e),
            };
            match out {
                Some(path) => match std::fs::write(&path, html) {
                    Ok(()) => {
                        print_json(&json!({ "success": true, "path": path }));
                        ExitCode::SUCCESS
                    }
                    Err(e) => fail(1, e),
                },
                None => {
                    println!("{}", html);
                    ExitCode::SUCCESS
                }
            }
        }

        Commands::Export { input, format, out_dir } => {
            let document = match read_document(&input) {
                Ok(d) => d,
                Err(e) => return fail(1, e),
            };
            let fingerprint = match document_fingerprint(&document) {
                Ok(f) => f,
                Err(e) => return fail(1, e),
            };
            let session = match Session::from_document(SessionConfig::editing(settings), document) {
                Ok(s) => s,
                Err(e) => return fail(2, e),
            };
            let artifact = match session.export(format.into()).await {
                Ok(a) => a,
                Err(e) => return fail(2, e),
            };
            match artifact.save(&out_dir) {
                Ok(path) => {
                    print_json(&json!({
                        "success": true,
                        "path": path,
                        "artifact": artifact,
                        "document": fingerprint,
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(1, e),
            }
        }

        Commands::Share { url } => {
            print_json(&json!({ "url": share_link(&url).as_str() }));
            ExitCode::SUCCESS
        }
    }
}
