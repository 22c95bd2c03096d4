use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info};

use blockdown::{Catalog, Config, Document, Error, Result};

#[derive(Parser)]
#[command(name = "blockdown")]
#[command(about = "Render structured text documents to a block tree, HTML, Typst or PDF")]
struct Cli {
    /// Input document (reads stdin when absent or `-`)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Output file (defaults to stdout; PDF defaults to the input name with .pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Presentation config file
    #[arg(short, long, default_value = "blockdown.toml")]
    config: PathBuf,

    /// Section catalog to read documents from
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Render this catalog section instead of an input file
    #[arg(long, requires = "catalog")]
    section: Option<String>,

    /// Print the catalog outline
    #[arg(long, requires = "catalog")]
    list: bool,

    /// List catalog sections matching a query
    #[arg(long, requires = "catalog")]
    search: Option<String>,

    /// Log pipeline details
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One line per block
    Tree,
    Json,
    Html,
    Typst,
    Pdf,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;

    let catalog = cli.catalog.as_deref().map(Catalog::load).transpose()?;
    if let Some(catalog) = &catalog {
        if cli.list {
            print_outline(catalog);
            return Ok(());
        }
        if let Some(query) = &cli.search {
            for section in catalog.search(query) {
                println!("{}\t{}", section.id, section.title);
            }
            return Ok(());
        }
    }

    let source = match (&catalog, &cli.section) {
        (Some(catalog), Some(id)) => catalog.content(id)?.to_string(),
        _ => read_input(cli.input.as_deref())?,
    };
    let doc = blockdown::render(&source);
    debug!("rendered {} blocks", doc.len());

    let text = match cli.format {
        Format::Pdf => {
            let pdf_bytes = blockdown::typst::compile_pdf(&doc, &config)?;
            let output = cli.output.unwrap_or_else(|| {
                cli.input
                    .as_deref()
                    .filter(|p| *p != Path::new("-"))
                    .map(|p| p.with_extension("pdf"))
                    .or_else(|| cli.section.as_ref().map(|id| PathBuf::from(format!("{id}.pdf"))))
                    .unwrap_or_else(|| PathBuf::from("out.pdf"))
            });
            write_file(&output, &pdf_bytes)?;
            info!("Created {}", output.display());
            return Ok(());
        }
        Format::Tree => tree(&doc),
        Format::Json => serde_json::to_string_pretty(&doc)? + "\n",
        Format::Html => blockdown::html::to_html(&doc, &config),
        Format::Typst => blockdown::typst::to_typst(&doc, &config),
    };

    match &cli.output {
        Some(path) => write_file(path, text.as_bytes())?,
        None => io::stdout()
            .write_all(text.as_bytes())
            .map_err(|source| Error::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?,
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| Error::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(source)
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// One line per block: its kind, then its source lines joined.
fn tree(doc: &Document) -> String {
    let mut out = String::new();
    for block in doc {
        out.push_str(&format!(
            "{:<10} {}\n",
            block.kind(),
            block.literal_lines().join(" ⏎ ")
        ));
    }
    out
}

fn print_outline(catalog: &Catalog) {
    for group in catalog.groups() {
        match &group.icon {
            Some(icon) => println!("{icon} {}", group.title),
            None => println!("{}", group.title),
        }
        for section in &group.sections {
            let status = if section.is_written() {
                ""
            } else {
                " (coming soon)"
            };
            println!("  {}\t{}{status}", section.id, section.title);
        }
    }
}
