//! Minimal CLI: compile → (objects | check)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use schemadoc::{compile_markdown, Compilation, CompilerConfig};
use tracing_subscriber::EnvFilter;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile prose specification documents into object descriptors
#[derive(Parser, Debug)]
#[command(name = "schemadoc", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile and print the object descriptors as JSON
    Objects(ObjectsOut),
    /// compile and report every section error and dangling reference
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// compiler vocabulary overrides (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// One or more markdown inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ObjectsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// treat unresolved references as errors
    #[arg(long, default_value_t = false)]
    strict: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> Result<CompilerConfig> {
        match &self.config {
            None => Ok(CompilerConfig::default()),
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                schemadoc::config::load_config(&bytes)
                    .with_context(|| format!("invalid config {}", path.display()))
            }
        }
    }

    /// Compile every input; documents are independent, so they run in parallel.
    fn compile_all(&self) -> Result<Vec<(PathBuf, Compilation)>> {
        let config = self.load_config()?;
        let source_paths = resolve_file_path_patterns(&self.input)?;
        source_paths
            .into_par_iter()
            .map(|path| -> Result<(PathBuf, Compilation)> {
                let source = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let compilation = compile_markdown(&source, &config)
                    .with_context(|| format!("failed to parse {}", path.display()))?;
                tracing::info!(path = %path.display(), sections = compilation.outcomes.len(), "compiled");
                Ok((path, compilation))
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_logging(&self) {
        let default = match self.verbose {
            0 => "schemadoc=warn",
            1 => "schemadoc=debug",
            _ => "schemadoc=trace",
        };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
            .with_writer(std::io::stderr)
            .init();
    }

    /// `Ok(false)` when the documents compiled with errors.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Objects(target) => {
                let compiled = target.input_settings.compile_all()?;
                let mut clean = true;
                let mut documents = Vec::with_capacity(compiled.len());
                for (path, compilation) in &compiled {
                    clean &= report_errors(path, compilation);
                    documents.push(serde_json::json!({
                        "source": path.to_string_lossy(),
                        "objects": compilation.descriptors().collect::<Vec<_>>(),
                    }));
                }
                let json_src = serde_json::to_string_pretty(&documents)?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("failed to create {}", parent.display()))?;
                        }
                        std::fs::write(out, &json_src)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => println!("{json_src}"),
                }
                Ok(clean)
            }
            Command::Check(target) => {
                let compiled = target.input_settings.compile_all()?;
                let mut clean = true;
                let (mut objects, mut errors, mut dangling) = (0, 0, 0);
                for (path, compilation) in &compiled {
                    clean &= report_errors(path, compilation);
                    objects += compilation.descriptors().count();
                    errors += compilation.errors().count();
                    for r in compilation.unresolved_references() {
                        dangling += 1;
                        eprintln!(
                            "{} {}: {}.{} references unknown object `{}`",
                            "warning:".yellow().bold(),
                            path.display(),
                            r.object,
                            r.field,
                            r.target,
                        );
                    }
                }
                if target.strict && dangling > 0 {
                    clean = false;
                }
                let summary = format!("{objects} object(s), {errors} error(s), {dangling} unresolved reference(s)");
                if clean {
                    eprintln!("{} {summary}", "ok:".green().bold());
                } else {
                    eprintln!("{} {summary}", "failed:".red().bold());
                }
                Ok(clean)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Print every section error of one document; `true` when there were none.
fn report_errors(path: &Path, compilation: &Compilation) -> bool {
    for err in compilation.errors() {
        eprintln!("{} {}: {err}", "error:".red().bold(), path.display());
    }
    compilation.is_ok()
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    // deterministic output order
    out.sort();
    out.dedup();
    Ok(out)
}
