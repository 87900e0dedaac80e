//! docrank CLI - persona-driven collection ranking tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docrank::pipeline::OUTPUT_FILE_NAME;
use docrank::{
    discover_collections, to_json, CollectionOutput, CollectionProcessor, DocumentSource,
    HeadingDetector, JsonFormat, LayoutJsonSource, MatchMode, PipelineOptions, ProfileAnalyzer,
    RankConfig,
};

#[derive(Parser)]
#[command(name = "docrank")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rank the sections of a document collection for a persona and task", long_about = None)]
struct Cli {
    /// Collection directory
    #[arg(value_name = "DIR")]
    input: Option<PathBuf>,

    #[command(flatten)]
    tables: TableArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Configuration table overrides.
#[derive(Args, Debug, Default)]
struct TableArgs {
    /// Combined config file (stop_words, domains, task_patterns, exclusion_patterns)
    #[arg(long, global = true, value_name = "FILE", env = "DOCRANK_CONFIG")]
    config: Option<PathBuf>,

    /// Stop-word list (JSON array)
    #[arg(long, global = true, value_name = "FILE")]
    stop_words: Option<PathBuf>,

    /// Domain indicator table (JSON object)
    #[arg(long, global = true, value_name = "FILE")]
    domains: Option<PathBuf>,

    /// Task pattern table (JSON object)
    #[arg(long, global = true, value_name = "FILE")]
    task_patterns: Option<PathBuf>,

    /// Heading exclusion patterns (JSON object)
    #[arg(long, global = true, value_name = "FILE")]
    exclusions: Option<PathBuf>,
}

/// Ranking limits shared by `rank` and `batch`.
#[derive(Args, Debug)]
struct RankArgs {
    /// Maximum ranked sections (all when not given)
    #[arg(long, value_name = "N")]
    max_sections: Option<usize>,

    /// Maximum excerpts
    #[arg(long, default_value = "10")]
    max_excerpts: usize,

    /// Match keywords exactly instead of by containment
    #[arg(long)]
    exact: bool,

    /// Load documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank one collection
    Rank {
        /// Collection directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output file (defaults to challenge1b_output.json in the collection)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        rank: RankArgs,
    },

    /// Rank every collection under a directory
    Batch {
        /// Base directory (holding Collections/ or collection* folders)
        #[arg(value_name = "DIR")]
        base: PathBuf,

        #[command(flatten)]
        rank: RankArgs,
    },

    /// Show the heading outline of a layout dump
    Outline {
        /// Layout JSON file, or a document with a layout dump next to it
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the keyword analysis of a persona and task
    Profile {
        /// Reader persona
        #[arg(long)]
        persona: String,

        /// Reader task
        #[arg(long)]
        task: String,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

impl RankArgs {
    fn options(&self) -> PipelineOptions {
        let mut options = PipelineOptions::new().with_max_excerpts(self.max_excerpts);
        if let Some(max) = self.max_sections {
            options = options.with_max_sections(max);
        }
        if self.exact {
            options = options.with_match_mode(MatchMode::Exact);
        }
        if self.sequential {
            options = options.sequential();
        }
        options
    }

    fn format(&self) -> JsonFormat {
        json_format(self.compact)
    }
}

impl Default for RankArgs {
    fn default() -> Self {
        Self {
            max_sections: None,
            max_excerpts: 10,
            exact: false,
            sequential: false,
            compact: false,
        }
    }
}

impl TableArgs {
    /// Configuration tables, or None when only the built-ins apply.
    fn load(&self) -> Result<Option<RankConfig>, Box<dyn std::error::Error>> {
        let overrides = self.stop_words.is_some()
            || self.domains.is_some()
            || self.task_patterns.is_some()
            || self.exclusions.is_some();

        let mut config = match &self.config {
            Some(path) if path.exists() => Some(RankConfig::from_file(path)?),
            Some(path) => {
                log::warn!(
                    "Config file {} not found, using built-in tables",
                    path.display()
                );
                None
            }
            None => None,
        };

        if overrides {
            let mut loaded = config.take().unwrap_or_default();
            if let Some(path) = &self.stop_words {
                loaded = loaded.with_stop_words_file(path)?;
            }
            if let Some(path) = &self.domains {
                loaded = loaded.with_domains_file(path)?;
            }
            if let Some(path) = &self.task_patterns {
                loaded = loaded.with_task_patterns_file(path)?;
            }
            if let Some(path) = &self.exclusions {
                loaded = loaded.with_exclusions_file(path)?;
            }
            config = Some(loaded);
        }

        Ok(config)
    }

    fn processor(
        &self,
        options: PipelineOptions,
    ) -> Result<CollectionProcessor, Box<dyn std::error::Error>> {
        Ok(match self.load()? {
            Some(config) => CollectionProcessor::with_config(&config, options)?,
            None => CollectionProcessor::new(options)?,
        })
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let tables = &cli.tables;

    let result = match cli.command {
        Some(Commands::Rank {
            input,
            output,
            rank,
        }) => cmd_rank(tables, &input, output.as_deref(), &rank),
        Some(Commands::Batch { base, rank }) => cmd_batch(tables, &base, &rank),
        Some(Commands::Outline {
            input,
            output,
            compact,
        }) => cmd_outline(tables, &input, output.as_deref(), compact),
        Some(Commands::Profile {
            persona,
            task,
            compact,
        }) => cmd_profile(tables, &persona, &task, compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: rank if a collection is given
            if let Some(input) = cli.input {
                cmd_rank(tables, &input, None, &RankArgs::default())
            } else {
                println!("{}", "Usage: docrank <DIR>".yellow());
                println!("       docrank --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_rank(
    tables: &TableArgs,
    input: &Path,
    output: Option<&Path>,
    rank: &RankArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let processor = tables.processor(rank.options())?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Ranking {}...", input.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let start = Instant::now();
    let result = processor.process_and_write(input, output, rank.format());
    pb.finish_and_clear();
    let (ranked, path) = result?;

    print_summary(&ranked);
    println!(
        "\n{} {} ({:.2}s)",
        "Saved to".green(),
        path.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn print_summary(output: &CollectionOutput) {
    println!("{}: {}", "Persona".bold(), output.metadata.persona);
    println!("{}: {}", "Task".bold(), output.metadata.job_to_be_done);
    println!(
        "{}: {}",
        "Documents".bold(),
        output.metadata.input_documents.len()
    );

    println!();
    println!("{}", "Ranked Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for section in &output.extracted_sections {
        println!(
            "  {:>2}. {} {}",
            section.importance_rank,
            section.section_title,
            format!("({}, p.{})", section.document, section.page_number).dimmed()
        );
    }
    println!(
        "{}: {}",
        "Excerpts".bold(),
        output.subsection_analysis.len()
    );

    for failure in &output.document_errors {
        println!(
            "  {} {}: {}",
            "!".yellow(),
            failure.document,
            failure.error.dimmed()
        );
    }
}

fn cmd_batch(
    tables: &TableArgs,
    base: &Path,
    rank: &RankArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let collections = discover_collections(base)?;
    if collections.is_empty() {
        println!("{}", "No collections found".yellow());
        println!("Collections live in a 'Collections' folder or are named 'Collection X'");
        return Ok(());
    }

    let processor = tables.processor(rank.options())?;

    let pb = ProgressBar::new(collections.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut failures = Vec::new();
    for dir in &collections {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());
        if let Err(e) = processor.process_and_write(dir, None, rank.format()) {
            failures.push((name, e.to_string()));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "  {} {}",
        "Successful:".green(),
        collections.len() - failures.len()
    );
    println!("  {} {}", "Failed:".red(), failures.len());
    for (name, error) in &failures {
        println!("  {} {}: {}", "-".dimmed(), name, error);
    }
    if failures.len() < collections.len() {
        println!("Outputs written to {} in each collection", OUTPUT_FILE_NAME);
    }

    Ok(())
}

fn cmd_outline(
    tables: &TableArgs,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let detector = match tables.load()? {
        Some(config) => HeadingDetector::from_patterns(&config.exclusion_patterns)?,
        None => HeadingDetector::embedded()?,
    };

    let spans = LayoutJsonSource::new().raw_spans(input)?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let outline = detector.outline(&spans, &name);
    let json = to_json(&outline, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_profile(
    tables: &TableArgs,
    persona: &str,
    task: &str,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = match tables.load()? {
        Some(config) => ProfileAnalyzer::from_config(config.profile),
        None => ProfileAnalyzer::embedded(),
    };
    let analysis = analyzer.analyze(persona, task);
    println!("{}", to_json(&analysis, json_format(compact))?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docrank".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Persona-driven document collection ranking");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docrank".dimmed());
    println!("License: MIT");
}
