use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lightport_core::{ConversionDriver, LightDataDocument, SchemaDialect};
use tagsnap::SnapshotTagStore;

#[derive(Parser)]
#[command(name = "lightport", about = "Convert level light data between tag assets and portable JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read light definitions and instances from a tag snapshot and write
    /// the portable JSON document.
    Extract {
        /// Path to the tag snapshot.
        asset: PathBuf,
        /// Destination JSON file.
        #[arg(long, short)]
        out: PathBuf,
        /// Schema dialect: "legacy" or "modern".
        #[arg(long, default_value = "legacy")]
        dialect: String,
    },
    /// Read a portable JSON document and append its lights into a tag
    /// snapshot (created if missing).
    Inject {
        /// Path to the tag snapshot.
        asset: PathBuf,
        /// Source JSON file.
        #[arg(long, short)]
        from: PathBuf,
        /// Schema dialect: "legacy" or "modern".
        #[arg(long, default_value = "modern")]
        dialect: String,
    },
}

fn cmd_extract(asset: &Path, out: &Path, dialect: &str) -> Result<()> {
    let dialect = SchemaDialect::by_name(dialect)?;
    let driver = ConversionDriver::new(dialect);
    let document = driver.extract(&SnapshotTagStore::new(), &asset.to_string_lossy())?;
    eprintln!(
        "[extract] {} definitions, {} instances ({} dialect)",
        document.light_definitions.len(),
        document.light_instances.len(),
        dialect.name
    );

    fs::write(out, document.to_json()?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn cmd_inject(asset: &Path, from: &Path, dialect: &str) -> Result<()> {
    let dialect = SchemaDialect::by_name(dialect)?;
    let text = fs::read_to_string(from)
        .with_context(|| format!("failed to read {}", from.display()))?;
    let document = LightDataDocument::from_json(&text)
        .with_context(|| format!("failed to parse {}", from.display()))?;
    eprintln!(
        "[inject] {} definitions, {} instances ({} dialect)",
        document.light_definitions.len(),
        document.light_instances.len(),
        dialect.name
    );

    let driver = ConversionDriver::new(dialect);
    driver.inject(
        &document,
        &SnapshotTagStore::creating_missing(),
        &asset.to_string_lossy(),
    )?;
    println!("Wrote {}", asset.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Extract { asset, out, dialect } => cmd_extract(asset, out, dialect),
        Command::Inject { asset, from, dialect } => cmd_inject(asset, from, dialect),
    }
}
