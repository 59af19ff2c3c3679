mod cli;
mod config;
mod format;
mod repl;

use clap::Parser;
use color_eyre::eyre;
use screening_core::model::SubjectId;
use services::Dashboard;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};
use crate::format::{format_saved, format_search};

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> eyre::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| eyre::eyre!("invalid database url: {db_url}"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(eyre::eyre!("invalid database url: {db_url}"));
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn subject(raw: &str) -> eyre::Result<SubjectId> {
    Ok(SubjectId::parse(raw)?)
}

async fn run(args: Args) -> eyre::Result<()> {
    let mut cfg = config::load(args.config.as_deref())?;
    if let Some(db) = args.db {
        cfg.storage.db_url = db;
    }
    init_tracing(&cfg.log_level);

    // Open + migrate SQLite here so services never touch the filesystem layout.
    let db_url = normalize_sqlite_url(&cfg.storage.db_url);
    prepare_sqlite_file(&db_url)?;
    let dashboard = Dashboard::new_sqlite(&db_url, cfg.answer_key()?, cfg.fetcher()).await?;
    tracing::info!(%db_url, "dashboard ready");

    match args.command.unwrap_or(Command::Repl) {
        Command::Repl => repl::run_repl(&dashboard).await?,
        Command::Search { ids, save } => {
            let found = dashboard.search(&ids.join(" ")).await?;
            for line in format_search(&found) {
                println!("{line}");
            }
            if save {
                for result in found.entries.iter().filter_map(|e| e.as_scored()) {
                    match dashboard.save(result.clone()).await {
                        Ok(()) => println!("saved {}", result.subject_id()),
                        Err(err) => eprintln!("{err}"),
                    }
                }
            }
        }
        Command::List => {
            for line in format_saved(&dashboard.list_saved().await) {
                println!("{line}");
            }
        }
        Command::Delete { subject_id } => {
            let removed = dashboard.delete_by_subject_id(&subject(&subject_id)?).await?;
            println!("deleted {}", removed.subject_id());
        }
        Command::Note { subject_id, text } => {
            let id = subject(&subject_id)?;
            dashboard.set_note(&id, &text.join(" ")).await?;
            println!("note updated for {id}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    run(Args::parse()).await
}
