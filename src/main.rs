#![allow(missing_docs)]

//! Tasklens CLI — the transport surface over the two core operations.
//!
//! Prints the operation payload contract as JSON on stdout; diagnostics go
//! to stderr via tracing so the output stays machine-readable.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use tasklens::api::{self, ApiError, ApiResponse, NormalizedTask};
use tasklens::config::TasklensConfig;
use tasklens::providers::openai::OpenAiGenerator;
use tasklens::store::sqlite::SqliteTaskStore;
use tasklens::store::TaskStore;
use tasklens::types::Period;

#[derive(Parser)]
#[command(name = "tasklens", about = "Natural-language task capture and analytics")]
struct Cli {
    /// Owner identity to scope every operation to.
    #[arg(long)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a free-form task description and store the result.
    Add {
        /// The task description, in any supported language.
        text: String,
    },
    /// List all tasks for the owner.
    List,
    /// Mark a task completed.
    Done {
        /// Task id.
        id: String,
    },
    /// Delete a task.
    Rm {
        /// Task id.
        id: String,
    },
    /// Produce a narrative analysis for a period.
    Analyze {
        /// Analysis period.
        #[arg(value_parser = parse_period)]
        period: Period,
    },
}

fn parse_period(s: &str) -> Result<Period, String> {
    Period::parse(s).ok_or_else(|| format!("invalid period {s:?}, expected today or week"))
}

fn build_generator(config: &TasklensConfig) -> Result<OpenAiGenerator, ApiError> {
    let Some(api_key) = config.llm.api_key.clone() else {
        return Err(ApiError::missing_credential());
    };
    OpenAiGenerator::new(
        config.llm.base_url.clone(),
        api_key,
        config.llm.model.clone(),
        Duration::from_secs(config.llm.timeout_seconds),
    )
    .map_err(|e| ApiError::from(tasklens::extract::ExtractError::Provider(e)))
}

fn print_and_exit(err: &ApiError) -> ! {
    let envelope: ApiResponse<serde_json::Value> = ApiResponse::failure(err);
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_owned())
    );
    std::process::exit(1);
}

fn print_ok<T: serde::Serialize>(data: T) {
    let envelope = ApiResponse::ok(data);
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_owned())
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = TasklensConfig::load().context("failed to load configuration")?;
    // File layer failure (unwritable logs dir) degrades to stderr-only.
    let _logging_guard = match tasklens::logging::init_with_file(
        std::path::Path::new(&config.paths.logs_dir),
        &config.core.log_level,
    ) {
        Ok(guard) => Some(guard),
        Err(_) => {
            tasklens::logging::init_cli(&config.core.log_level);
            None
        }
    };

    let owner = cli.owner.unwrap_or_else(|| config.core.owner_id.clone());
    let store = SqliteTaskStore::open(&config.paths.db_path)
        .await
        .context("failed to open task store")?;

    // Every operation captures its reference instant exactly once.
    let now = Local::now().naive_local();

    match cli.command {
        Command::Add { text } => {
            let generator = match build_generator(&config) {
                Ok(g) => g,
                Err(e) => print_and_exit(&e),
            };
            match api::normalize_task(&generator, now, &text).await {
                Ok(draft) => {
                    let task = match store.create(&owner, &draft, now).await {
                        Ok(t) => t,
                        Err(e) => print_and_exit(&ApiError::from(e)),
                    };
                    tracing::info!(id = %task.id, "task created");
                    print_ok(NormalizedTask::from(&draft));
                }
                Err(e) => print_and_exit(&e),
            }
        }
        Command::List => match store.list(&owner).await {
            Ok(tasks) => print_ok(tasks),
            Err(e) => print_and_exit(&ApiError::from(e)),
        },
        Command::Done { id } => match store.set_completed(&owner, &id, true).await {
            Ok(()) => print_ok(serde_json::json!({ "id": id, "completed": true })),
            Err(e) => print_and_exit(&ApiError::from(e)),
        },
        Command::Rm { id } => match store.delete(&owner, &id).await {
            Ok(()) => print_ok(serde_json::json!({ "id": id, "deleted": true })),
            Err(e) => print_and_exit(&ApiError::from(e)),
        },
        Command::Analyze { period } => {
            let generator = match build_generator(&config) {
                Ok(g) => g,
                Err(e) => print_and_exit(&e),
            };
            match api::analyze_tasks(&generator, &store, &owner, now, period).await {
                Ok(result) => print_ok(result),
                Err(e) => print_and_exit(&e),
            }
        }
    }

    Ok(())
}
