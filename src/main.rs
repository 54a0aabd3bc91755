mod cli;
mod config;
mod error;
mod extractor;
mod llm;
mod naming;
mod pipeline;
mod prompts;
mod report;
mod response;
mod scanner;
#[cfg(test)]
mod testing;
mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use colored::*;
use config::Config;
use llm::AnthropicClient;
use log::info;
use pipeline::{FileOutcome, Renamer};
use scanner::{CandidateFile, Scanner};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "pdf_renamer=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    info!("Starting pdf renamer with args: {:?}", args);

    let directory = match &args.path {
        Some(path) => path.clone(),
        None => prompt_for_directory()?,
    };
    let scanner = Scanner::new(&directory)?;

    let config = Config::from_args(&args)?;
    info!("Using {:?}", config);

    let files = scanner.scan()?;
    info!("Found {} PDFs in {:?}", files.len(), scanner.root());

    let client = AnthropicClient::new(&config)?;
    let mut renamer = Renamer::new(Box::new(client), &config);

    if config.dry_run && !args.json {
        println!("\n{}", "═══ DRY RUN MODE ═══".bold().bright_blue());
    }

    let report = renamer
        .process_all(&files, |file, outcome| {
            if !args.json {
                print_outcome(file, outcome);
            }
        })
        .await;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let verb = if report.dry_run { "to rename" } else { "renamed" };
    println!(
        "\n{} {} {}, {} {}",
        "📝".bright_white(),
        report.renamed.len().to_string().bright_cyan().bold(),
        verb,
        report.skipped.len().to_string().yellow().bold(),
        "left untouched"
    );
    println!(
        "\n{} {}",
        "✓".green().bold(),
        "Finished processing all PDFs!".bright_green().bold()
    );
    Ok(())
}

fn print_outcome(file: &CandidateFile, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Renamed { to } => println!(
            "{} {} {} {}",
            "RENAME:".green().bold(),
            file.name.bright_white(),
            "→".bright_blue().bold(),
            display_name(to).bright_cyan()
        ),
        FileOutcome::Planned { to } => println!(
            "{} {} {} {}",
            "PLAN:".bright_blue().bold(),
            file.name.bright_white(),
            "→".bright_blue().bold(),
            display_name(to).bright_cyan()
        ),
        FileOutcome::Skipped(reason) => println!(
            "{} {} {}",
            "SKIP:".yellow().bold(),
            file.name.bright_white(),
            format!("({})", reason.message()).bright_black()
        ),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .to_string()
}

fn prompt_for_directory() -> Result<PathBuf> {
    print!("Enter directory with PDFs: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read directory from stdin")?;

    Ok(expand_home(line.trim()))
}

fn expand_home(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~/Papers"), home.join("Papers"));
        assert_eq!(expand_home("/srv/papers"), PathBuf::from("/srv/papers"));
        assert_eq!(expand_home("~other/x"), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            display_name(Path::new("/docs/OECD - Report (2024).pdf")),
            "OECD - Report (2024).pdf"
        );
    }
}
