//! Command-line interface for gschema.
//!
//! # Usage
//!
//! ```bash
//! # Compile schema documents into per-module descriptor tables
//! gschema schema schema/*/*.graphql -o build/schema
//!
//! # Compile client operations into persisted-query registries
//! gschema operations web/src/**/gql.ts -o build/operations
//!
//! # Parse files and report syntax diagnostics
//! gschema check schema/users/users.graphql
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use gschema_compiler::{
    extract_embedded, CompileError, CompilerConfig, OperationCompiler, OperationInput, SchemaCompiler,
};
use gschema_core::{DiagnosticSeverity, Interner, SourceFile};
use gschema_syntax::parse;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gschema")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Compiler configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile schema documents into descriptor tables
    Schema {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory, one `<module>.json` per module
        #[arg(short, long, default_value = "build/schema")]
        output: PathBuf,
    },

    /// Compile client operations into persisted-query registries
    Operations {
        /// `.graphql` documents or host files with embedded `gql` templates
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory, one `<destination>.json` per destination
        #[arg(short, long, default_value = "build/operations")]
        output: PathBuf,
    },

    /// Parse files and report syntax diagnostics
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Output {
    verbose: bool,
    quiet: bool,
}

pub fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    let out = Output {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Schema { files, output } => compile_schema(&files, &output, &config, out),
        Commands::Operations { files, output } => compile_operations(&files, &output, &config, out),
        Commands::Check { files } => check_files(&files, out),
    }
}

fn load_config(path: Option<&Path>) -> Result<CompilerConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(CompilerConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let config = CompilerConfig::from_json(&text)
        .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
    info!(path = %path.display(), "loaded compiler config");
    Ok(config)
}

fn read_sources(files: &[PathBuf]) -> std::io::Result<Vec<SourceFile>> {
    files
        .iter()
        .map(|file| -> std::io::Result<SourceFile> {
            Ok(SourceFile::new(file.as_path(), std::fs::read_to_string(file)?))
        })
        .collect()
}

fn is_host_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts" | "tsx" | "js" | "jsx")
    )
}

fn report(err: CompileError) -> i32 {
    eprintln!("{:?}", miette::Report::new(err));
    1
}

fn compile_schema(
    files: &[PathBuf],
    output: &Path,
    config: &CompilerConfig,
    out: Output,
) -> Result<i32, Box<dyn std::error::Error>> {
    let sources = read_sources(files)?;
    let tables = match SchemaCompiler::new(config).compile(&sources) {
        Ok(tables) => tables,
        Err(err) => return Ok(report(err)),
    };

    std::fs::create_dir_all(output)?;
    for table in &tables {
        let path = output.join(format!("{}.json", table.module));
        std::fs::write(&path, table.to_json()?)?;
        if out.verbose {
            println!("{} {}", "Wrote".green(), path.display());
        }
    }

    if !out.quiet {
        println!(
            "{} {} module(s) compiled from {} file(s)",
            "Success:".green().bold(),
            tables.len(),
            files.len()
        );
    }
    Ok(0)
}

fn compile_operations(
    files: &[PathBuf],
    output: &Path,
    config: &CompilerConfig,
    out: Output,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut inputs = Vec::with_capacity(files.len());
    for file in files {
        let text = std::fs::read_to_string(file)?;
        if is_host_file(file) {
            let extracted = extract_embedded(file, &text);
            if extracted.documents.is_empty() {
                if out.verbose {
                    println!("{} {}", "Skipped".dimmed(), file.display());
                }
                continue;
            }
            inputs.push(OperationInput::from(extracted));
        } else {
            inputs.push(OperationInput::plain(SourceFile::new(file.as_path(), text)));
        }
    }

    let registries = match OperationCompiler::new(config).compile(&inputs) {
        Ok(registries) => registries,
        Err(err) => return Ok(report(err)),
    };

    std::fs::create_dir_all(output)?;
    let mut hashes = serde_json::Map::new();
    for registry in &registries {
        let path = output.join(format!("{}.json", registry.destination));
        std::fs::write(&path, registry.to_json()?)?;
        if out.verbose {
            println!("{} {}", "Wrote".green(), path.display());
        }
        hashes.insert(registry.destination.clone(), serde_json::to_value(&registry.hashes)?);
    }

    if !out.quiet {
        println!("{}", serde_json::to_string_pretty(&hashes)?);
    }
    Ok(0)
}

fn check_files(files: &[PathBuf], out: Output) -> Result<i32, Box<dyn std::error::Error>> {
    let mut has_errors = false;

    for file in files {
        if out.verbose {
            println!("{} {}", "Checking".blue(), file.display());
        }

        let text = std::fs::read_to_string(file)?;
        let documents = if is_host_file(file) {
            extract_embedded(file, &text).documents
        } else {
            vec![SourceFile::new(file.as_path(), text)]
        };

        let mut file_errors = 0;
        for document in &documents {
            let interner = Interner::new();
            let result = parse(document.text(), &interner);
            for diagnostic in result.diagnostics.iter() {
                let location = document.location(diagnostic.primary_span().unwrap_or_default());
                let label = match diagnostic.severity {
                    DiagnosticSeverity::Error => {
                        file_errors += 1;
                        "error".red().bold()
                    }
                    DiagnosticSeverity::Warning => "warning".yellow().bold(),
                };
                eprintln!("{label}[{}] {}", diagnostic.code, diagnostic.title);
                eprintln!("  {} {location}", "-->".blue());
                if diagnostic.message() != diagnostic.title {
                    eprintln!("      {}", diagnostic.message());
                }
            }
        }

        if file_errors > 0 {
            has_errors = true;
        } else if out.verbose {
            println!("{} {}", "OK".green(), file.display());
        }
    }

    if has_errors {
        Ok(1)
    } else {
        if !out.quiet {
            println!("{} {} file(s) checked", "Success:".green().bold(), files.len());
        }
        Ok(0)
    }
}
