use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use capscribe::io::parse_transcript_file;
use capscribe::{
    run_pipeline, write_transcript_json, AnthropicClientConfig, AnthropicLlmClient, CaptionBundle,
    LlmClient, PipelineConfig,
};

#[derive(Parser)]
#[command(name = "capscribe")]
#[command(author, version, about = "Transcript refinement and caption rendering pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full refinement pipeline and write the refined transcript
    /// plus caption files.
    Process {
        /// Input transcript file (raw transcript JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the refined transcript (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Pipeline configuration file (JSON). Falls back to defaults
        /// when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip the LLM refinement stage even if the config enables it
        #[arg(long)]
        no_llm: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a transcript and report its shape without writing anything
    Analyze {
        /// Input transcript file (raw transcript JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            no_llm,
            verbose,
        } => {
            setup_logging(verbose);
            process_transcript(input, output, config, no_llm).await
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze_transcript(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn process_transcript(
    input: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
    no_llm: bool,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let mut transcript = parse_transcript_file(&input).context("Failed to parse input transcript")?;
    info!("Loaded {} segment(s)", transcript.segments.len());

    let mut config = match config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            PipelineConfig::from_json(&raw).context("Failed to parse pipeline config")?
        }
        None => PipelineConfig::default(),
    };

    if no_llm {
        config.llm_refinement = None;
    }

    let client: Option<AnthropicLlmClient> = match &config.llm_refinement {
        Some(llm_config) => match AnthropicClientConfig::from_env(
            llm_config.bedrock_inference_profile_id.clone(),
            llm_config.max_tokens,
            llm_config.temperature,
        ) {
            Ok(anthropic_config) => Some(AnthropicLlmClient::new(anthropic_config)),
            Err(e) => {
                info!("LLM refinement configured but client could not be built ({}); skipping", e);
                None
            }
        },
        None => None,
    };
    let client_ref: Option<&dyn LlmClient> = client.as_ref().map(|c| c as &dyn LlmClient);

    let stats = run_pipeline(&mut transcript, &config, client_ref).await;
    info!(
        "Pipeline complete: {} segment(s) after normalization",
        transcript.segments.len()
    );

    write_transcript_json(&transcript, &output).context("Failed to write refined transcript")?;
    info!("Refined transcript written to {:?}", output);

    let bundle = CaptionBundle::render(&transcript, &config.captions);
    bundle.write_to_stem(&output).context("Failed to write caption files")?;
    info!("Caption files written alongside {:?}", output);

    if let Some(refinement) = &stats.refinement {
        info!(
            "LLM refinement: {} segment(s) updated, {} speaker(s) identified",
            refinement.segments_updated, refinement.speakers_identified
        );
    }

    Ok(())
}

fn analyze_transcript(input: PathBuf) -> Result<()> {
    let transcript = parse_transcript_file(&input).context("Failed to parse input transcript")?;

    println!("Transcript Analysis");
    println!("==================");
    println!("Segments: {}", transcript.segments.len());

    let total_words: usize = transcript.segments.iter().map(|s| s.words.len()).sum();
    println!("Words: {}", total_words);

    let mut speakers: Vec<String> = transcript.segments.iter().map(|s| s.effective_speaker()).collect();
    speakers.sort();
    speakers.dedup();
    println!("Speakers: {:?}", speakers);

    let duration = transcript.segments.last().map(|s| s.end).unwrap_or(0.0);
    println!("Duration: {:.1}s", duration);

    Ok(())
}
