// src/main.rs
//! `uno`: query a Notion workspace from the command line.

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde::Serialize;
use std::fs;
use ultimate_notion::config::{Command, CommandLineInput};
use ultimate_notion::{ObjRef, Session, SessionConfig};

/// Sets up logging: console on stderr, full debug log in the temp dir.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("ultimate_notion.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stdout carries the JSON output
    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stderr", Box::new(stderr_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn as_refs(parents: &[String]) -> Vec<&(dyn ObjRef + Sync)> {
    parents.iter().map(|p| p as &(dyn ObjRef + Sync)).collect()
}

/// Runs one subcommand against the session.
async fn run(session: &Session, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Status => {
            let me = session.connected_user().await?;
            eprintln!("✓ Connected to Notion as {}", me.name());
        }
        Command::Whoami => print_json(&session.whoami().await?)?,
        Command::Users => print_json(&session.all_users().await?)?,
        Command::SearchDb {
            name,
            substring,
            parents,
        } => {
            let dbs = session
                .search_db(name.as_deref(), !substring, &as_refs(parents))
                .await?;
            log::info!("Found {} database(s)", dbs.len());
            print_json(&dbs)?;
        }
        Command::SearchPage {
            name,
            substring,
            parents,
        } => {
            let pages = session
                .search_page(name.as_deref(), !substring, &as_refs(parents))
                .await?;
            log::info!("Found {} page(s)", pages.len());
            print_json(&pages)?;
        }
        Command::Db { reference } => print_json(&session.get_db(reference.as_str()).await?)?,
        Command::Page { reference } => {
            print_json(&session.get_page(reference.as_str()).await?)?
        }
        Command::User { reference } => {
            print_json(&session.get_user(reference.as_str()).await?)?
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    let config = SessionConfig::resolve(&cli)?;
    let session = Session::new(config)?;

    let result = run(&session, &cli.command).await;
    session.close();
    result
}
