//! Line-based stand-in for the browser's input events.

use anyhow::{Context, Result};
use remote_list::{
    CatalogPipeline, CharacterStatus, CycleOutcome, FilterCriteria, PagedPipeline, RecordId,
    Renderer, ResultRecord,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Debug, PartialEq)]
pub enum CatalogCommand {
    Filter(String),
    Select(RecordId),
    Reload,
    Help,
    Quit,
}

pub fn parse_catalog(line: &str) -> CatalogCommand {
    let trimmed = line.trim();
    let (head, rest) = split_head(trimmed);

    match head {
        ":q" | ":quit" => CatalogCommand::Quit,
        ":help" => CatalogCommand::Help,
        ":reload" => CatalogCommand::Reload,
        ":select" | ":s" if !rest.is_empty() => CatalogCommand::Select(RecordId::from(rest)),
        // anything else is what the user typed in the search box
        _ => CatalogCommand::Filter(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

#[derive(Debug, PartialEq)]
pub enum PagedCommand {
    Search(FilterCriteria),
    Clear,
    Next,
    Previous,
    Page(u32),
    Select(RecordId),
    Help,
    Quit,
}

pub fn parse_paged(line: &str) -> Result<PagedCommand, String> {
    let (head, rest) = split_head(line.trim());

    match head {
        "q" | "quit" => Ok(PagedCommand::Quit),
        "help" | "?" => Ok(PagedCommand::Help),
        "clear" => Ok(PagedCommand::Clear),
        "n" | "next" => Ok(PagedCommand::Next),
        "p" | "prev" | "previous" => Ok(PagedCommand::Previous),
        "page" => rest
            .parse::<u32>()
            .ok()
            .filter(|page| *page > 0)
            .map(PagedCommand::Page)
            .ok_or_else(|| format!("invalid page '{}'", rest)),
        "select" | "s" if !rest.is_empty() => Ok(PagedCommand::Select(RecordId::from(rest))),
        "search" => parse_criteria(rest).map(PagedCommand::Search),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

/// `name=rick sanchez status=alive species=Human`. Words without `=`
/// continue the previous value.
pub fn parse_criteria(input: &str) -> Result<FilterCriteria, String> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for word in input.split_whitespace() {
        match word.split_once('=') {
            Some((key, value)) => fields.push((key.to_lowercase(), value.to_string())),
            None => match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => fields.push(("name".to_string(), word.to_string())),
            },
        }
    }

    let mut criteria = FilterCriteria::new();
    for (key, value) in fields {
        match key.as_str() {
            "name" => criteria.name = value,
            "species" => criteria.species = value,
            "status" if value.trim().is_empty() => criteria.status = None,
            "status" => criteria.status = Some(value.parse::<CharacterStatus>()?),
            other => return Err(format!("unknown filter '{}'", other)),
        }
    }
    Ok(criteria)
}

fn split_head(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

fn prompt(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush().context("Failed to flush stdout")
}

fn report(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Ignored => println!("(nothing to do)"),
        CycleOutcome::Superseded => debug!("Result superseded by a newer request"),
        _ => {}
    }
}

const CATALOG_HELP: &str = "Type to filter by name or number. :select <id>, :reload, :quit";
const PAGED_HELP: &str = "search [name=..] [status=alive|dead|unknown] [species=..] | clear | next | prev | page <n> | select <id> | quit";

pub async fn run_catalog<T: ResultRecord, R: Renderer>(pipeline: &CatalogPipeline<T, R>) -> Result<()> {
    println!("{}", CATALOG_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt("search> ")?;
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match parse_catalog(&line) {
            CatalogCommand::Quit => break,
            CatalogCommand::Help => println!("{}", CATALOG_HELP),
            CatalogCommand::Reload => report(&pipeline.load().await),
            CatalogCommand::Select(id) => {
                if !pipeline.select(&id) {
                    println!("No visible record with id {}", id);
                }
            }
            CatalogCommand::Filter(query) => {
                pipeline.filter(&query);
            }
        }
    }

    info!("Bye");
    Ok(())
}

pub async fn run_paged<T: ResultRecord, R: Renderer>(pipeline: &PagedPipeline<T, R>) -> Result<()> {
    println!("{}", PAGED_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_paged(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        let outcome = match command {
            PagedCommand::Quit => break,
            PagedCommand::Help => {
                println!("{}", PAGED_HELP);
                continue;
            }
            PagedCommand::Select(id) => {
                if !pipeline.select(&id) {
                    println!("No record with id {} on this page", id);
                }
                continue;
            }
            PagedCommand::Search(criteria) => pipeline.search(criteria).await,
            PagedCommand::Clear => pipeline.clear_filters().await,
            PagedCommand::Next => pipeline.next_page().await,
            PagedCommand::Previous => pipeline.previous_page().await,
            PagedCommand::Page(page) => pipeline.fetch_page(page).await,
        };
        report(&outcome);
    }

    info!("Bye");
    Ok(())
}
