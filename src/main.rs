//! Symdex CLI - index a codebase and answer cross-reference queries
//!
//! The index is in-memory only, so every command indexes the given path
//! first and then runs its query in the same process.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use symdex::{Engine, Error, SymbolId};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "symdex")]
#[command(version)]
#[command(about = "Multi-language cross-reference index - go-to-definition across a mixed codebase")]
#[command(long_about = r#"
Symdex builds an in-memory symbol database from a codebase mixing several
programming languages (Go, TypeScript, JavaScript, Python, Rust) and answers
cross-reference queries by cursor position.

Example usage:
  symdex index --path ./src
  symdex def --path ./src --file ./src/pkg/foo.go --line 42 --col 17
  symdex refs --path ./src --symbol "go::src/pkg/foo.go::Handler.ServeHTTP"
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a symdex.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory and print the definition tree
    Index {
        /// Path to the directory or file to index
        #[arg(short, long)]
        path: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Find the definition for the symbol at a cursor position
    Def {
        /// Path to the directory or file to index
        #[arg(short, long)]
        path: PathBuf,

        /// File containing the cursor
        #[arg(short, long)]
        file: String,

        /// Cursor line (1-based)
        #[arg(short, long)]
        line: u32,

        /// Cursor column (1-based)
        #[arg(short, long)]
        col: u32,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the recorded references for a symbol identity
    Refs {
        /// Path to the directory or file to index
        #[arg(short, long)]
        path: PathBuf,

        /// Symbol identity, e.g. "py::app/models.py::User"
        #[arg(short, long)]
        symbol: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Dump the raw occurrence list for a file (diagnostic)
    Occurrences {
        /// Path to the directory or file to index
        #[arg(short, long)]
        path: PathBuf,

        /// File to dump
        #[arg(short, long)]
        file: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn build_engine(config: Option<&PathBuf>) -> anyhow::Result<Engine> {
    let registry = symdex::default_registry()?;
    let engine = match symdex::config::load_config(config.map(PathBuf::as_path))? {
        Some(config) => Engine::with_config(registry, config.engine_config()),
        None => Engine::with_registry(registry),
    };
    Ok(engine)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Index { path, json } => {
            let engine = build_engine(cli.config.as_ref())?;
            engine.index_root(&path)?;

            let tree = engine.definition_tree();
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                for def in &tree {
                    println!(
                        "{}:{}:{}\t{}\t{} [{}]",
                        def.file, def.range.start.line, def.range.start.col,
                        def.kind, def.name, def.lang
                    );
                }
                println!("\n{}", engine.stats());
            }
        }

        Commands::Def { path, file, line, col, json } => {
            let engine = build_engine(cli.config.as_ref())?;
            engine.index_root(&path)?;

            match engine.find_definition_at(&file, line, col) {
                Ok((def, candidates)) => {
                    if json {
                        let out = serde_json::json!({
                            "definition": def,
                            "candidates": candidates,
                        });
                        println!("{}", serde_json::to_string_pretty(&out)?);
                    } else {
                        println!(
                            "{} {} at {}:{}:{} [{}]",
                            def.kind, def.name, def.file,
                            def.range.start.line, def.range.start.col, def.lang
                        );
                    }
                }
                Err(Error::DefinitionNotFound { candidates }) => {
                    eprintln!("definition not found; candidates tried:");
                    for id in candidates {
                        eprintln!("  {id}");
                    }
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Refs { path, symbol, json } => {
            let engine = build_engine(cli.config.as_ref())?;
            engine.index_root(&path)?;

            let refs = engine.find_references(&SymbolId::from(symbol.as_str()));
            if json {
                println!("{}", serde_json::to_string_pretty(&refs)?);
            } else if refs.is_empty() {
                println!("no references recorded for {symbol}");
            } else {
                for r in refs {
                    println!("{}:{}:{}", r.file, r.range.start.line, r.range.start.col);
                }
            }
        }

        Commands::Occurrences { path, file, json } => {
            let engine = build_engine(cli.config.as_ref())?;
            engine.index_root(&path)?;

            let occurrences = engine.file_occurrences(&file);
            if json {
                println!("{}", serde_json::to_string_pretty(&occurrences)?);
            } else {
                for occ in occurrences {
                    println!(
                        "{}:{}-{}:{}\t{:?}\t{}",
                        occ.range.start.line, occ.range.start.col,
                        occ.range.end.line, occ.range.end.col,
                        occ.kind, occ.name
                    );
                }
            }
        }
    }

    Ok(())
}
