use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsift::cli::{CommandContext, load_config};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(
    version,
    about = "Structure analysis and documentation search for source repositories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Config file (replaces the global/project lookup)")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inventory a repository: languages, categories, ecosystem
    Scan {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Extract functions from one source file
    Functions {
        file: PathBuf,
        #[arg(long, short, help = "Language key (py, java, js, ts, ...); inferred from the extension by default")]
        language: Option<String>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Classify directories into architectural layers
    Architecture {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Render a depth-bounded directory tree
    Tree {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Outline imports, classes and methods of one file
    Summarize {
        file: PathBuf,
        #[arg(long, short, help = "Language key; inferred from the extension by default")]
        language: Option<String>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Mermaid class diagram of Java classes
    Diagram {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long, short, help = "Write a fenced Mermaid block to this file")]
        output: Option<PathBuf>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Search generated documentation
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long, help = "Documentation folder (defaults to search.docs_dir)")]
        docs_dir: Option<PathBuf>,
        #[arg(long, help = "Show index status instead of searching")]
        status: bool,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Markdown overview of a repository
    Report {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long, short, help = "Write the report to this file")]
        output: Option<PathBuf>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// List languages with a function extractor
    Languages {
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective configuration
    Show {
        #[arg(short = 'f', long, default_value = "toml", help = "Output format: toml, json")]
        format: String,
    },
    /// Show configuration file paths
    Path,
}

fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mdocsift encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        if std::env::var("RUST_BACKTRACE").is_ok() {
            default_hook(panic_info);
        }
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Scan { path, format } => {
            let ctx = CommandContext::load(config_path)?;
            docsift::cli::commands::scan::run(&ctx, &path, &format)?;
        }
        Commands::Functions {
            file,
            language,
            format,
        } => {
            let ctx = CommandContext::load(config_path)?;
            docsift::cli::commands::functions::run(&ctx, &file, language.as_deref(), &format)?;
        }
        Commands::Architecture { path, format } => {
            let ctx = CommandContext::load(config_path)?;
            docsift::cli::commands::architecture::run(&ctx, &path, &format)?;
        }
        Commands::Tree { path, format } => {
            let ctx = CommandContext::load(config_path)?;
            docsift::cli::commands::tree::run(&ctx, &path, &format)?;
        }
        Commands::Summarize {
            file,
            language,
            format,
        } => {
            docsift::cli::commands::summarize::run(&file, language.as_deref(), &format)?;
        }
        Commands::Diagram {
            path,
            output,
            format,
        } => {
            let ctx = CommandContext::load(config_path)?;
            docsift::cli::commands::diagram::run(&ctx, &path, output.as_deref(), &format)?;
        }
        Commands::Search {
            query,
            docs_dir,
            status,
            format,
        } => {
            let config = load_config(config_path)?;
            docsift::cli::commands::search::run(
                &config.search,
                &query,
                docs_dir.as_deref(),
                status,
                &format,
            )?;
        }
        Commands::Report {
            path,
            output,
            format,
        } => {
            let ctx = CommandContext::load(config_path)?;
            docsift::cli::commands::report::run(&ctx, &path, output.as_deref(), &format)?;
        }
        Commands::Languages { format } => {
            let ctx = CommandContext::load(config_path)?;
            docsift::cli::commands::languages::run(&ctx.extractors, &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let config = load_config(config_path)?;
                docsift::cli::commands::config::show(&config, &format)?;
            }
            ConfigAction::Path => {
                docsift::cli::commands::config::path()?;
            }
        },
    }

    Ok(())
}
