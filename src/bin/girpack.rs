//! girpack CLI: .gir-Dateien parsen und inspizieren.

use clap::{Args, Parser, Subcommand};
use girpack::ParserResult;
use girpack::gir::gir_components;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "girpack", about = ".gir parser: blob tables, indexes, crossrefs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Größenstatistik der Blob-Tabellen
    Stats(FileArgs),
    /// Objekt- und Globalindex ausgeben
    Index(FileArgs),
    /// Unaufgelöste Querverweise ausgeben
    Crossrefs(FileArgs),
}

#[derive(Args)]
struct FileArgs {
    /// .gir-Dateien
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Stats(args) => for_each_file(&args, print_stats),
        Command::Index(args) => for_each_file(&args, print_index),
        Command::Crossrefs(args) => for_each_file(&args, print_crossrefs),
    }
}

/// Parst alle Dateien mit einem gemeinsamen Parser, so dass der
/// Builder-Pool zwischen den Dateien wiederverwendet wird.
fn for_each_file(args: &FileArgs, print: impl Fn(&ParserResult)) -> Result<(), String> {
    let mut parser = girpack::Parser::new();
    for path in &args.files {
        let result = parser
            .parse_file(path)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        warn_on_name_mismatch(&result);
        print(&result);
    }
    Ok(())
}

fn warn_on_name_mismatch(result: &ParserResult) {
    if let Some((name, _)) = gir_components(result.file())
        && !result.namespace().is_empty()
        && name != result.namespace()
    {
        eprintln!(
            "Hinweis: Dateiname sagt {name}, Namespace sagt {}",
            result.namespace()
        );
    }
}

fn print_stats(result: &ParserResult) {
    print!("{}", result.stats());
    if !result.unhandled_elements().is_empty() {
        println!(
            "unhandled elements: {}",
            result.unhandled_elements().join(", ")
        );
    }
}

fn print_index(result: &ParserResult) {
    println!(
        "object index ({} entries, {} nodes):",
        result.object_index().len(),
        result.object_index().node_count()
    );
    result.object_index().for_each(|name, entries| {
        for entry in entries {
            println!("  {name:<40} {:<10} @{}", entry.kind.name(), entry.offset);
        }
    });

    println!("global index ({} entries):", result.global_index().len());
    for entry in result.global_index() {
        println!(
            "  {:<40} {:<10} {:<10} @{}{}",
            entry.name,
            entry.prefix.name(),
            entry.kind.name(),
            entry.object_offset,
            if entry.is_buildable { " buildable" } else { "" }
        );
    }
}

fn print_crossrefs(result: &ParserResult) {
    for crossref in result.crossrefs() {
        let qname = result.string(crossref.qname).unwrap_or("");
        println!(
            "{:<40} {:<10} {}",
            qname,
            crossref.kind_hint.name(),
            if crossref.is_local { "local" } else { "extern" }
        );
    }
}
