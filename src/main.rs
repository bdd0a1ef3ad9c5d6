use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use studyrank::config::Config;
use studyrank::error::Error;
use studyrank::extract::{self, TopicBlock};
use studyrank::ranking::embeddings::SentenceEmbedder;
use studyrank::ranking::rank::rank_topics;
use studyrank::{output, preprocess, ranking};

/// Studyrank: find the syllabus topics your quizzes actually probe.
///
/// Extracts topic blocks from syllabus documents, question units from quiz
/// documents, and ranks every topic by its aggregated semantic similarity
/// to the full question set.
#[derive(Parser)]
#[command(name = "studyrank", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank syllabus topics against quiz questions
    Rank {
        /// Syllabus document(s) (.docx or .pptx)
        #[arg(long, required = true, num_args = 1..)]
        syllabus: Vec<PathBuf>,

        /// Quiz/midterm document(s) (.docx)
        #[arg(long, required = true, num_args = 1..)]
        quiz: Vec<PathBuf>,

        /// Use stemming instead of lemmatization
        #[arg(long)]
        stemming: bool,

        /// Print the extracted blocks and questions before the ranking
        #[arg(long)]
        show_extracted: bool,

        /// Emit the ranking as JSON instead of the bar chart
        #[arg(long)]
        json: bool,
    },

    /// Show the topic blocks extracted from one document
    Topics {
        /// A .docx or .pptx document
        file: PathBuf,
    },

    /// Show the question units extracted from one quiz document
    Questions {
        /// A .docx quiz document
        file: PathBuf,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("studyrank=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            syllabus,
            quiz,
            stemming,
            show_extracted,
            json,
        } => {
            run_rank(&syllabus, &quiz, stemming, show_extracted, json).await?;
        }

        Commands::Topics { file } => {
            let blocks = extract::extract_topic_blocks(&file)?;
            output::display_blocks(&blocks);
        }

        Commands::Questions { file } => {
            let questions = extract::extract_questions(&file)?;
            output::display_questions(&questions);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            println!("Downloading model files to: {}", config.model_dir.display());
            ranking::download::download_model(&config.model_dir).await?;
            println!("\n{}", "Model ready. Next: studyrank rank".bold());
        }
    }

    Ok(())
}

async fn run_rank(
    syllabus: &[PathBuf],
    quiz: &[PathBuf],
    use_stemming: bool,
    show_extracted: bool,
    json: bool,
) -> Result<()> {
    let mut raw_blocks: Vec<TopicBlock> = Vec::new();
    let mut raw_questions: Vec<String> = Vec::new();
    let mut failed_files = 0usize;

    for path in syllabus {
        match extract::extract_topic_blocks(path) {
            Ok(blocks) => {
                info!(file = %path.display(), blocks = blocks.len(), "extracted topic blocks");
                raw_blocks.extend(blocks);
            }
            Err(e) => {
                failed_files += 1;
                eprintln!("{} {e:#}", "warning:".yellow().bold());
            }
        }
    }

    for path in quiz {
        // Quiz documents contribute topic blocks too — a midterm's own
        // headings are part of the topic pool.
        match extract::extract_topic_blocks(path) {
            Ok(blocks) => raw_blocks.extend(blocks),
            Err(e) => {
                failed_files += 1;
                eprintln!("{} {e:#}", "warning:".yellow().bold());
            }
        }

        match extract::extract_questions(path) {
            Ok(questions) => {
                info!(file = %path.display(), questions = questions.len(), "extracted questions");
                raw_questions.extend(questions);
            }
            Err(e) => {
                failed_files += 1;
                eprintln!("{} {e:#}", "warning:".yellow().bold());
            }
        }
    }

    if raw_blocks.is_empty() && raw_questions.is_empty() && failed_files > 0 {
        anyhow::bail!("no file could be processed ({failed_files} failed)");
    }

    let blocks = preprocess::normalize_blocks(&raw_blocks, use_stemming);
    let questions = preprocess::normalize_questions(&raw_questions, use_stemming);

    if show_extracted {
        output::display_normalized_blocks(&blocks);
        output::display_normalized_questions(&questions);
    }

    // Ranking needs both sides; a missing side is reportable, not fatal.
    if blocks.is_empty() {
        println!(
            "{}",
            "No topic headings found — cannot rank topics.".yellow()
        );
        return Ok(());
    }
    if questions.is_empty() {
        println!("{}", "No questions found — cannot rank topics.".yellow());
        return Ok(());
    }

    let config = Config::load()?;
    config.require_model()?;

    let embedder =
        SentenceEmbedder::global(&config.model_dir).map_err(Error::EmbeddingUnavailable)?;
    let rankings = rank_topics(&blocks, &questions, embedder).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rankings)?);
    } else {
        output::display_rankings(&rankings);
    }

    Ok(())
}
