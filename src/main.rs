use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tagpath::{json, parse_path, parse_tag, PathError, Tag, TagPath};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Query and edit tag trees with path expressions.
#[derive(Parser, Debug)]
#[command(name = "tagpath", version)]
struct Cli {
    /// Document to operate on; read from stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Read the document as JSON instead of SNBT.
    #[arg(long)]
    json_input: bool,

    /// Print results as JSON instead of SNBT.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every tag the path selects.
    Get { path: String },
    /// Print how many tags the path selects.
    Count { path: String },
    /// Select the path, creating it with VALUE where absent, and print the document.
    Create { path: String, value: String },
    /// Write VALUE everywhere the path selects and print the document.
    Set { path: String, value: String },
    /// Insert VALUEs at INDEX into every list the path selects and print the document.
    Insert {
        path: String,
        #[arg(allow_hyphen_values = true)]
        index: i32,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Remove everything the path selects and print the document.
    Remove { path: String },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{error}")]
    Path { error: PathError, text: String },
}

/// Attach the text being parsed so the report can point into it.
fn in_text(text: &str) -> impl FnOnce(PathError) -> CliError + '_ {
    move |error| CliError::Path {
        error,
        text: text.to_string(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        report(&err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let source = match &cli.input {
        Some(file) => fs::read_to_string(file)?,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input
        }
    };
    let mut root = if cli.json_input {
        let value: serde_json::Value = serde_json::from_str(&source)?;
        json::from_json(&value).map_err(in_text(&source))?
    } else {
        parse_tag(&source).map_err(in_text(&source))?
    };

    match &cli.command {
        Command::Get { path } => {
            let path = compile(path)?;
            let found = path.get(&root).map_err(in_text(path.as_str()))?;
            for tag in found {
                println!("{}", render(tag, cli.json)?);
            }
            return Ok(());
        }
        Command::Count { path } => {
            println!("{}", compile(path)?.count_matching(&root));
            return Ok(());
        }
        Command::Create { path, value } => {
            let path = compile(path)?;
            let value = literal(value)?;
            let selected = path
                .get_or_create(&mut root, || value.clone())
                .map_err(in_text(path.as_str()))?
                .len();
            eprintln!("selected {}", selected);
        }
        Command::Set { path, value } => {
            let path = compile(path)?;
            let changed = path
                .set(&mut root, literal(value)?)
                .map_err(in_text(path.as_str()))?;
            eprintln!("changed {}", changed);
        }
        Command::Insert {
            path,
            index,
            values,
        } => {
            let path = compile(path)?;
            let tags = values
                .iter()
                .map(|v| literal(v))
                .collect::<Result<Vec<_>, _>>()?;
            let modified = path
                .insert(*index, &mut root, &tags)
                .map_err(in_text(path.as_str()))?;
            eprintln!("modified {}", modified);
        }
        Command::Remove { path } => {
            let removed = compile(path)?.remove(&mut root);
            eprintln!("removed {}", removed);
        }
    }

    println!("{}", render(&root, cli.json)?);
    Ok(())
}

fn compile(text: &str) -> Result<TagPath, CliError> {
    parse_path(text).map_err(in_text(text))
}

fn literal(text: &str) -> Result<Tag, CliError> {
    parse_tag(text).map_err(in_text(text))
}

fn render(tag: &Tag, as_json: bool) -> Result<String, CliError> {
    if as_json {
        Ok(serde_json::to_string_pretty(&json::to_json(tag))?)
    } else {
        Ok(tag.to_string())
    }
}

fn report(err: &CliError) {
    eprintln!("ERROR: {}", err);
    let CliError::Path { error, text } = err else {
        return;
    };
    let Some(offset) = error.offset() else {
        return;
    };

    let offset = offset.min(text.len());
    let consumed = &text[..offset];
    let line_num = consumed.matches('\n').count();
    let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = consumed[line_start..].chars().count();
    let line_text = text.lines().nth(line_num).unwrap_or("");

    if line_num > 0 {
        eprintln!("at line {}:", line_num + 1);
    }
    eprintln!("{}", line_text);
    eprintln!("{}^", " ".repeat(column));
}
