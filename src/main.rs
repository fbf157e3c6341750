//! Docref CLI - resolve references in a document source and report on them

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use docref::config::{self, DocrefConfig};
use docref::source::DocumentSource;
use docref::ui::{self, Icons};
use docref::ResolvedDocument;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "docref")]
#[command(version)]
#[command(about = "Deferred cross-reference resolution, dependency graphs and coverage reports")]
#[command(long_about = r#"
Docref replays a JSON document source, resolves labels, citations and
theorem dependencies once the whole source has been read, and reports on
the result.

Example usage:
  docref report --source notes.json
  docref graph --source notes.json --output dep_graph.json
  docref bib --source notes.json --aux notes.aux
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Coverage report of theorem-like elements per section
    Report {
        /// Document source (JSON)
        #[arg(short, long)]
        source: PathBuf,

        /// Auxiliary file with citation marker overrides
        #[arg(short, long)]
        aux: Option<PathBuf>,

        /// Theorem kinds, `+`-separated (overrides the config)
        #[arg(short, long)]
        kinds: Option<String>,

        /// Sectioning kind (overrides the config)
        #[arg(long)]
        sectioning: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Export the dependency graph
    Graph {
        /// Document source (JSON)
        #[arg(short, long)]
        source: PathBuf,

        /// Output file (defaults to the configured target)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List bibliography items and their citation markers
    Bib {
        /// Document source (JSON)
        #[arg(short, long)]
        source: PathBuf,

        /// Auxiliary file with citation marker overrides
        #[arg(short, long)]
        aux: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Report { source, aux, kinds, sectioning, format } => {
            let doc = resolve(&source, aux.as_deref(), &settings)?;
            let kinds = kinds
                .map(|k| config::parse_kind_list(&k))
                .unwrap_or_else(|| settings.coverage.thms.clone());
            let sectioning = sectioning.unwrap_or_else(|| settings.coverage.sectioning.clone());

            let report = doc.coverage_report(kinds.as_slice(), &sectioning);

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                Format::Text => {
                    ui::header(&format!("Coverage of {} by {}", kinds.join(", "), sectioning));
                    if report.partials.is_empty() {
                        ui::warn(&format!("No `{}` elements found", sectioning));
                    }
                    println!("{}", ui::coverage_table(&report));

                    for partial in report.partials.iter().filter(|p| p.uncovered > 0) {
                        ui::section(&partial.title);
                        for entry in partial.entries.iter().filter(|e| !e.is_covered()) {
                            ui::summary_row(Icons::CROSS, &format!("{} ({})", entry.caption, ui::muted(&entry.id)));
                        }
                    }
                }
            }
        }

        Commands::Graph { source, output } => {
            let Some(target) = settings.dep_graph.output_path(output) else {
                ui::warn("Dependency graph disabled in config (`[dep_graph] enabled = false`)");
                return Ok(());
            };
            let doc = resolve(&source, None, &settings)?;
            let export = doc.graph().export(doc.tree());

            std::fs::write(&target, serde_json::to_string_pretty(&export)?)?;

            ui::success(&format!("Dependency graph written to {}", target.display()));
            let stats = doc.graph().stats();
            println!(
                "{}",
                ui::stats_table(&[
                    ("Nodes", stats.nodes.to_string().as_str()),
                    ("Edges", stats.edges.to_string().as_str()),
                    ("Proofs", stats.proofs.to_string().as_str()),
                    ("Covered", stats.covered.to_string().as_str()),
                ])
            );
            println!("{}", doc.stats());
        }

        Commands::Bib { source, aux, format } => {
            let doc = resolve(&source, aux.as_deref(), &settings)?;

            match format {
                Format::Json => {
                    let items: Vec<_> = doc
                        .bibliography()
                        .items()
                        .map(|item| {
                            serde_json::json!({
                                "key": item.key,
                                "marker": doc.marker(&item.key).map(str::to_string).unwrap_or_else(|| item.own_marker()),
                                "number": item.number,
                                "cited_by": doc.cited_by(&item.key),
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&items)?);
                }
                Format::Text => {
                    ui::header(&format!("{} Bibliography", Icons::BOOK));
                    let table = ui::bibliography_table(&doc);
                    if table.is_empty() {
                        ui::warn("No bibliography items");
                    } else {
                        println!("{}", table);
                    }

                    let missing: Vec<String> = doc
                        .resolved_citations()
                        .into_iter()
                        .flat_map(|(_, citation)| citation.missing)
                        .collect();
                    if !missing.is_empty() {
                        ui::section("Unresolved citations");
                        for key in missing {
                            ui::summary_row(Icons::CROSS, &key);
                        }
                    }
                }
            }
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &DocrefConfig::default(), force)?;
            ui::success(&format!("Config written to {}", path.display()));
        }
    }

    Ok(())
}

/// Build the source, apply citation overrides and drain the resolution queue
fn resolve(source: &Path, aux: Option<&Path>, settings: &DocrefConfig) -> anyhow::Result<ResolvedDocument> {
    tracing::info!("Reading document source {}", source.display());
    let mut ctx = DocumentSource::load(source)?.build()?;

    let aux = aux
        .map(Path::to_path_buf)
        .or_else(|| settings.aux.as_ref().map(PathBuf::from));
    if let Some(aux) = aux {
        let applied = ctx.load_aux(&aux);
        tracing::info!("{} Applied {} citation overrides from {}", Icons::LINK, applied, aux.display());
    }

    tracing::info!("Building phase done: {} elements, {} pending tasks", ctx.tree().len(), ctx.pending_tasks());
    Ok(ctx.drain())
}
