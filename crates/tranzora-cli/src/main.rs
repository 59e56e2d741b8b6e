//! Tranzora CLI - Translate documents via the remote translation service,
//! export the result, and manage the local translation history.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use tranzora_core::{
    AppConfig, DocumentTranslator, ExportFormat, HistoryStore, Lang, TranslationOutcome,
    TranslatorConfig, is_supported_language, target_languages,
    util::{format_file_size, history_store_path, preview_text},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatOption {
    Txt,
    Pdf,
    Docx,
}

impl From<FormatOption> for ExportFormat {
    fn from(opt: FormatOption) -> Self {
        match opt {
            FormatOption::Txt => Self::Text,
            FormatOption::Pdf => Self::Pdf,
            FormatOption::Docx => Self::Docx,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tranzora")]
#[command(author, version, about = "Translate documents and export the result", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Translation service base URL
    #[arg(
        long,
        env = "TRANZORA_API_BASE",
        global = true,
        default_value = "http://localhost:3000"
    )]
    api_base: String,

    /// API key for the translation service
    #[arg(long, env = "TRANZORA_API_KEY", global = true)]
    api_key: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a document or image and export the result
    Translate {
        /// Input document or image
        input: PathBuf,

        /// Target language code (see `tranzora languages`)
        #[arg(short, long, default_value = tranzora_core::DEFAULT_TARGET_LANG)]
        target: String,

        /// Export formats to produce
        #[arg(short, long, value_enum, default_value = "txt")]
        format: Vec<FormatOption>,

        /// Output directory (default: alongside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the translated text to stdout
        #[arg(long)]
        show: bool,
    },

    /// Manage the translation history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// List supported target languages
    Languages,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List saved translations (newest first)
    List,

    /// Print a saved translation
    Show {
        /// Record id (from `history list`)
        id: i64,
    },

    /// Save a record's translated text as a .txt file
    Save {
        /// Record id (from `history list`)
        id: i64,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete one record by id
    Delete {
        /// Record id (from `history list`)
        id: i64,
    },

    /// Delete all records
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    config.translator = TranslatorConfig::new(args.api_base, args.api_key);

    match args.command {
        Command::Translate {
            input,
            target,
            format,
            output,
            show,
        } => run_translate(config, &input, &target, &format, output, show).await,
        Command::History { command } => run_history(&config, &command),
        Command::Languages => {
            #[allow(clippy::print_stdout)]
            for lang in target_languages() {
                println!("{}  {:<12} {}", lang.flag, lang.code, lang.name);
            }
            Ok(())
        }
    }
}

async fn run_translate(
    mut config: AppConfig,
    input: &Path,
    target: &str,
    formats: &[FormatOption],
    output: Option<PathBuf>,
    show: bool,
) -> Result<()> {
    if !is_supported_language(target) {
        anyhow::bail!("unsupported target language '{target}' (see `tranzora languages`)");
    }
    config.target_lang = Lang::new(target);

    let mut translator =
        DocumentTranslator::new(config).context("Failed to initialize translator")?;

    translator
        .select_file(input)
        .context(format!("Cannot translate {}", input.display()))?;

    if let Some(file) = translator.session().source_file() {
        info!("Selected {} ({})", file.file_name, format_file_size(file.size));
    }

    // Setup progress bar over the four checkpoints
    let pb = ProgressBar::new(100);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let bar = pb.clone();
    let outcome = translator
        .translate(Some(Box::new(move |stage| {
            bar.set_position(u64::from(stage.percent()));
            bar.set_message(stage.label());
        })))
        .await?;

    match outcome {
        TranslationOutcome::Completed { layout_preserved } => {
            pb.finish_with_message(if layout_preserved {
                "Translation complete (layout preserved)"
            } else {
                "Translation complete"
            });
        }
        TranslationOutcome::Failed => {
            pb.abandon_with_message("Translation failed");
            warn!("The service could not translate the document; exporting the failure notice");
        }
        TranslationOutcome::NoSourceFile => anyhow::bail!("no input file selected"),
    }

    #[allow(clippy::print_stdout)]
    if show {
        println!("{}", translator.session().translated_text());
    }

    let out_dir = output.unwrap_or_else(|| {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    });

    for format in formats {
        let format = ExportFormat::from(*format);
        let Some(artifact) = translator.export_and_record(format)? else {
            continue;
        };

        let path = out_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)
            .context(format!("Failed to write export: {}", path.display()))?;

        #[allow(clippy::print_stdout)]
        {
            println!("Saved {format} export to: {}", path.display());
        }
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_history(config: &AppConfig, command: &HistoryCommand) -> Result<()> {
    let history_path = config
        .history
        .path
        .clone()
        .unwrap_or_else(history_store_path);
    let mut store = HistoryStore::open(history_path).context("Failed to open history store")?;

    match command {
        HistoryCommand::List => {
            if store.is_empty() {
                println!("No translations yet.");
                return Ok(());
            }
            for record in store.records() {
                println!(
                    "{:<15} {}  {}{}",
                    record.id,
                    record.date,
                    record.file_name,
                    if record.layout_preserved { "  [layout]" } else { "" }
                );
                println!("    {}", preview_text(&record.translated_text).replace('\n', " "));
            }
        }
        HistoryCommand::Show { id } => {
            let record = store
                .find(*id)
                .with_context(|| format!("No history record with id {id}"))?;
            println!("File:     {}", record.file_name);
            println!("Date:     {}", record.date);
            if let Some(ref structure) = record.document_structure {
                println!("Layout:   preserved ({} pages)", structure.page_count());
            }
            println!("\n{}", record.translated_text);
        }
        HistoryCommand::Save { id, output } => {
            let record = store
                .find(*id)
                .with_context(|| format!("No history record with id {id}"))?;

            let file_name = format!("translated-{}.txt", record.file_name);
            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(file_name);
            std::fs::write(&path, record.translated_text.as_bytes())
                .context(format!("Failed to write {}", path.display()))?;
            println!("Saved translation to: {}", path.display());
        }
        HistoryCommand::Delete { id } => {
            if store.find(*id).is_none() {
                anyhow::bail!("No history record with id {id}");
            }
            store.delete_by_id(*id)?;
            println!("Deleted record {id}");
        }
        HistoryCommand::Clear { yes } => {
            let confirmed = *yes || confirm("Are you sure you want to clear all translation history?")?;
            if confirmed {
                store.clear_all(true)?;
                println!("Translation history cleared.");
            } else {
                println!("Aborted.");
            }
        }
    }

    Ok(())
}

/// Blocking yes/no gate on stdin.
fn confirm(question: &str) -> Result<bool> {
    #[allow(clippy::print_stdout)]
    {
        print!("{question} [y/N] ");
    }
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
