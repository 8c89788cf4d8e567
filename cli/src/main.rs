//! Exam Forge - exam paper builder
//!
//! Command line front end over the working exam: save and load snapshots,
//! fill in generated content, export DOCX and write the print surface.

mod commands;
mod generator;
mod session;
mod state;

use clap::{Parser, Subcommand};
use session::SessionError;
use state::AppContext;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "exam-forge")]
#[command(version)]
#[command(about = "Build exam papers, export them as DOCX and print them", long_about = None)]
struct Cli {
    /// Directory holding the saved exam, settings and working exam
    #[arg(long, global = true, env = "EXAM_FORGE_DATA_DIR", value_name = "DIR", default_value = ".exam-forge")]
    data_dir: PathBuf,

    /// Settings file (defaults to settings.json in the data directory)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Working exam document (defaults to exam.json in the data directory)
    #[arg(long, global = true, value_name = "FILE")]
    exam: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the working exam to the storage slot
    Save,

    /// Replace the working exam with the saved one
    Load {
        /// Overwrite the working exam without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Change one question of the working exam
    Edit {
        /// Question id
        id: String,

        /// New question text
        #[arg(long)]
        text: Option<String>,

        /// New marks
        #[arg(long, conflicts_with = "unscored")]
        marks: Option<u32>,

        /// Remove the marks from the question
        #[arg(long)]
        unscored: bool,

        /// Replacement option, repeat for each one in order
        #[arg(long = "option", value_name = "TEXT")]
        options: Vec<String>,
    },

    /// Fill the exam with generated content
    Autofill {
        /// JSON file holding a partial exam
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Topic passed to the generator
        #[arg(long, default_value = "")]
        topic: String,

        /// Seconds to wait for the generator
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Export the exam as a DOCX file
    Export {
        /// Output file or directory
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Write the print view of the exam as HTML
    Print {
        /// Output file or directory
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Check the exam for problems that block export
    Validate,

    /// Show how the exam is paginated
    Layout {
        /// Print the full layout plan as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting Exam Forge");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::open(cli.data_dir, cli.settings, cli.exam)
        .await
        .map_err(user_facing)?;

    match cli.command {
        Commands::Save => println!("{}", commands::save(&ctx).map_err(user_facing)?),
        Commands::Load { yes } => println!("{}", commands::load(&ctx, yes).map_err(user_facing)?),
        Commands::Edit {
            id,
            text,
            marks,
            unscored,
            options,
        } => {
            let change = commands::QuestionEdit {
                text,
                marks,
                options: (!options.is_empty()).then_some(options),
                unscored,
            };
            println!("{}", commands::edit_question(&ctx, &id, change).map_err(user_facing)?);
        }
        Commands::Autofill { file, topic, timeout } => {
            let notice = commands::autofill(&ctx, file.as_deref(), &topic, Duration::from_secs(timeout))
                .await
                .map_err(user_facing)?;
            println!("{}", notice);
        }
        Commands::Export { out } => {
            let path = commands::export(&ctx, out.as_deref()).map_err(user_facing)?;
            println!("Exported {}", path.display());
        }
        Commands::Print { out } => {
            let path = commands::print(&ctx, out.as_deref()).map_err(user_facing)?;
            println!("Print view written to {}", path.display());
        }
        Commands::Validate => {
            let report = commands::validate(&ctx).map_err(user_facing)?;
            println!("{}", report);
            if !report.is_valid() {
                anyhow::bail!("{} problem(s) block export", report.issues.len());
            }
        }
        Commands::Layout { json } => println!("{}", commands::layout(&ctx, json).map_err(user_facing)?),
    }

    Ok(())
}

fn user_facing(err: SessionError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}
