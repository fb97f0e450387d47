use anyhow::Result;
use clap::{Parser, Subcommand};
use docbind_cli::{EmitMode, RenderArgs, render_file};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docbind", version, about = "Render content documents")]
struct Cli {
    /// Log more (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON document tree to HTML.
    Render {
        /// Path to the document JSON
        document: PathBuf,
        /// JSON object to use as directive context
        #[arg(long)]
        context: Option<PathBuf>,
        /// Ambient attribute, KEY=VALUE (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        /// Host element tag (default: div)
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, value_enum, default_value_t = EmitMode::Html)]
        emit: EmitMode,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Render {
            document,
            context,
            vars,
            tag,
            emit,
        } => {
            let out = render_file(&RenderArgs {
                document,
                context,
                vars,
                tag,
                emit,
            })?;
            println!("{out}");
        }
    }
    Ok(())
}
