//! Line-driven session: one command per line from stdin until `quit` or EOF.

use clap::Parser;
use screening_core::model::SubjectId;
use services::Dashboard;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::{ReplCommand, ReplLine};
use crate::format::{format_entry, format_saved, format_search};

pub enum Flow {
    Continue,
    Quit,
}

pub async fn run_repl(dashboard: &Dashboard) -> color_eyre::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"screening> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parsed = match ReplLine::try_parse_from(trimmed.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        if let Flow::Quit = execute(dashboard, parsed.command).await {
            break;
        }
    }

    Ok(())
}

async fn execute(dashboard: &Dashboard, command: ReplCommand) -> Flow {
    match command {
        ReplCommand::Search { ids } => match dashboard.search(&ids.join(" ")).await {
            Ok(found) => print_lines(format_search(&found)),
            Err(err) => eprintln!("{err}"),
        },
        ReplCommand::Save { subject_id } => {
            if let Some(id) = subject(&subject_id) {
                match dashboard.save_from_session(&id).await {
                    Ok(_) => println!("saved {id}"),
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
        ReplCommand::Delete { subject_id } => {
            if let Some(id) = subject(&subject_id) {
                match dashboard.delete_by_subject_id(&id).await {
                    Ok(_) => println!("deleted {id}"),
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
        ReplCommand::Note { subject_id, text } => {
            if let Some(id) = subject(&subject_id) {
                match dashboard.set_note(&id, &text.join(" ")).await {
                    Ok(()) => println!("note updated for {id}"),
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
        ReplCommand::Results => {
            let entries = dashboard.session_results().await;
            if entries.is_empty() {
                println!("no results this session");
            }
            print_lines(entries.iter().map(format_entry));
        }
        ReplCommand::List => print_lines(format_saved(&dashboard.list_saved().await)),
        ReplCommand::Clear => {
            dashboard.clear_session().await;
            println!("session cleared");
        }
        ReplCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn subject(raw: &str) -> Option<SubjectId> {
    match SubjectId::parse(raw) {
        Ok(id) => Some(id),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}
