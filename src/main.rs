mod assemble;
mod batch;
mod corpus;
mod error;
mod judges;
mod language;
mod markup;
mod record;
mod settings;
mod stats;
mod synth;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use assemble::Assembler;
use judges::Judge;
use settings::Settings;
use synth::{CohereClient, Synthesizer};

#[derive(Parser)]
#[command(
    name = "judge_corpus",
    about = "Turn archived online-judge problem pages into a JSONL problem corpus"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every page of a corpus and write one record per line
    Run {
        /// Judge whose markup the pages use
        #[arg(short, long, value_enum)]
        judge: Judge,
        /// Corpus file (.jsonl / .ndjson with {url, html} lines, or .sqlite / .db)
        #[arg(short, long)]
        input: PathBuf,
        /// Output JSONL file
        #[arg(short, long)]
        output: PathBuf,
        /// Worker threads (default: available cores - 1)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Only process the first N pages
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Skip test-case synthesis; unit_tests is null everywhere
        #[arg(long)]
        no_synthesis: bool,
        /// Table holding the pages when the corpus is SQLite
        #[arg(long, default_value = corpus::DEFAULT_TABLE)]
        table: String,
    },
    /// Run the extractors on one saved page and print each field
    Inspect {
        #[arg(short, long, value_enum)]
        judge: Judge,
        /// Saved HTML page
        #[arg(long)]
        html: PathBuf,
    },
    /// Summarize an output JSONL file
    Stats {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            judge,
            input,
            output,
            workers,
            limit,
            no_synthesis,
            table,
        } => {
            let settings = Settings::load()?;
            info!(
                workers = ?settings.workers,
                keep_failed_url = settings.keep_failed_url,
                model = %settings.model,
                "settings loaded"
            );

            let mut pages = corpus::load(&input, &table)
                .with_context(|| format!("Failed to load corpus {}", input.display()))?;
            if let Some(n) = limit {
                pages.truncate(n);
            }
            println!("Loaded {} {} pages", pages.len(), judge);

            let synthesizer = if no_synthesis {
                None
            } else {
                let Some(cohere) = settings.cohere() else {
                    bail!(
                        "No API key: set {}_API_KEY or COHERE_API_KEY, or pass --no-synthesis",
                        settings::ENV_PREFIX
                    );
                };
                let client = CohereClient::new(cohere).context("Failed to build HTTP client")?;
                Some(Synthesizer::new(Box::new(client), settings.max_attempts))
            };

            let assembler = Assembler::new(judge, synthesizer.as_ref())
                .keep_failed_url(settings.keep_failed_url);
            let workers = workers
                .or(settings.workers)
                .unwrap_or_else(batch::default_workers);

            let pb = batch::progress_bar(pages.len());
            pb.set_message("Processing problems");
            let records = batch::run(&pages, &assembler, workers, &pb)?;

            corpus::write_records(&output, &records)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            let summary = batch::BatchSummary::of(&records);
            println!(
                "Wrote {} records to {} ({} ok, {} failed)",
                summary.total,
                output.display(),
                summary.succeeded,
                summary.failed
            );
            Ok(())
        }
        Commands::Inspect { judge, html } => {
            let page_html = std::fs::read_to_string(&html)
                .with_context(|| format!("Failed to read {}", html.display()))?;
            let url = html.display().to_string();
            let doc = markup::Document::parse(&page_html);
            let assembler = Assembler::new(judge, None);
            let ex = assembler.extract(&url, &doc);

            print_field("title", &ex.title);
            print_field("problem_description", &ex.description);
            print_field("unprocessed_input", &ex.raw_input);
            print_field("unprocessed_output", &ex.raw_output);
            let description = ex.description.as_deref().unwrap_or_default();
            println!("== language: {}", language::detect(description));
            match (judge.extractors().has_image)(&doc) {
                Ok(v) => println!("== has_image: {}", v),
                Err(e) => println!("== has_image: FAILED ({})", e),
            }
            println!(
                "== policy: {:?}, record would {}",
                judge.policy(),
                if ex.any_failed && judge.policy() == judges::FailurePolicy::Strict {
                    "be dropped as failed"
                } else {
                    "be kept"
                }
            );
            Ok(())
        }
        Commands::Stats { input } => {
            let records = corpus::read_records(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            print!("{}", stats::render_markdown(&stats::collect(&records)));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn print_field(name: &str, value: &error::ExtractResult<String>) {
    match value {
        Ok(text) => println!("== {}:\n{}", name, text),
        Err(e) => println!("== {}: FAILED ({})", name, e),
    }
}
