//! Print the OpenAPI document as JSON, or write it to a file.

use std::path::PathBuf;

use clap::Parser;
use kudos_backend::doc::ApiDoc;
use utoipa::OpenApi;

/// Export the ledger API description.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Args {
    /// Write to this path instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let json = ApiDoc::openapi().to_pretty_json()?;
    match args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
