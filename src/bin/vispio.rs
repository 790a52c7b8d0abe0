use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use vispio::image::{DISPLAY_MAX_SIZE, TRANSFER_MAX_BYTES};
use vispio::{
    AnalysisClient, AnalysisKind, ChatSession, GeminiHttpClient, GenerationParams, ImagePipeline,
    LoggingConfig, SpeechSynthesizer,
};

#[derive(Parser)]
#[command(name = "vispio", version, about = "Vispio image captioning CLI", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a caption for an image
    Caption {
        image: PathBuf,
        #[arg(long, default_value = "descriptive")]
        style: String,
        #[arg(long)]
        max_tokens: Option<u32>,
        #[arg(long)]
        temperature: Option<f32>,
        /// Narrate the caption and write it next to the image
        #[arg(long)]
        speak: bool,
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Run a specialized analysis (location, product, comprehensive, text_extraction)
    Analyze {
        image: PathBuf,
        #[arg(long, default_value = "comprehensive")]
        kind: String,
    },
    /// Interactive chat about an image (or general chat without one)
    Chat {
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Convert text to speech
    Speak {
        text: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List supported narration languages
    Languages,
}

fn parse_kind(value: &str) -> anyhow::Result<AnalysisKind> {
    let kind = match value.to_lowercase().replace('-', "_").as_str() {
        "descriptive" => AnalysisKind::Descriptive,
        "creative" => AnalysisKind::Creative,
        "technical" => AnalysisKind::Technical,
        "simple" => AnalysisKind::Simple,
        "detailed" => AnalysisKind::Detailed,
        "location" => AnalysisKind::Location,
        "product" => AnalysisKind::Product,
        "comprehensive" => AnalysisKind::Comprehensive,
        "text_extraction" => AnalysisKind::TextExtraction,
        other => bail!("unknown analysis kind `{other}`"),
    };
    Ok(kind)
}

/// Decode, validate, and shrink an upload to fit the transfer budget.
fn prepare_image(path: &PathBuf) -> anyhow::Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let img = ImagePipeline::load(&bytes)?;
    ImagePipeline::ensure_valid(&img)?;

    let display = ImagePipeline::resize_for_display(&img, DISPLAY_MAX_SIZE);
    Ok(ImagePipeline::optimize_for_transfer(
        &display,
        TRANSFER_MAX_BYTES,
    )?)
}

async fn narrate(text: &str, lang: &str, output: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let synthesizer = SpeechSynthesizer::google();
    let artifact = synthesizer.synthesize(text, lang, 1.0).await?;
    let path = output
        .unwrap_or_else(|| PathBuf::from(format!("narration.{}", artifact.format.extension())));
    artifact.save(&path)?;
    synthesizer.cleanup_scratch();
    Ok(path)
}

async fn run_chat(image: Option<PathBuf>) -> anyhow::Result<()> {
    let client = Arc::new(GeminiHttpClient::from_env()?);
    let mut session = ChatSession::new(client);

    if let Some(path) = image {
        session.attach_image(prepare_image(&path)?);
        println!("Image attached. Suggested questions:");
        for question in session.suggested_questions().await? {
            println!("  - {question}");
        }
    }

    println!("Type a question (or `quit` to exit).");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("quit") || question.eq_ignore_ascii_case("exit") {
            break;
        }

        match session.send(question).await {
            Ok(answer) => println!("{answer}\n"),
            Err(e) => eprintln!("error: {e}\n"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Caption {
            image,
            style,
            max_tokens,
            temperature,
            speak,
            lang,
        } => {
            let kind = parse_kind(&style)?;
            if !AnalysisKind::CAPTION_STYLES.contains(&kind) {
                bail!("`{style}` is an analysis kind, not a caption style; use `vispio analyze`");
            }

            let prepared = prepare_image(&image)?;
            let client = AnalysisClient::from_env()?;

            let mut params = vispio::gemini::prompts::default_params(kind);
            if let Some(max_tokens) = max_tokens {
                params = GenerationParams {
                    max_output_tokens: max_tokens,
                    ..params
                };
            }
            if let Some(temperature) = temperature {
                params = GenerationParams {
                    temperature,
                    ..params
                };
            }

            let result = client.analyze(&prepared, kind, params).await?;
            println!("{}", result.text);

            if speak {
                if !result.success {
                    bail!("no caption produced, skipping narration");
                }
                let path = narrate(&result.text, &lang, None).await?;
                println!("narration written to {}", path.display());
            }
        }
        Command::Analyze { image, kind } => {
            let kind = parse_kind(&kind)?;
            let prepared = prepare_image(&image)?;
            let client = AnalysisClient::from_env()?;
            let result = client.analyze_with_defaults(&prepared, kind).await?;
            println!("{}", result.text);
        }
        Command::Chat { image } => run_chat(image).await?,
        Command::Speak {
            text,
            lang,
            speed,
            output,
        } => {
            let synthesizer = SpeechSynthesizer::google();
            let artifact = synthesizer.synthesize(&text, &lang, speed).await?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!("speech.{}", artifact.format.extension()))
            });
            artifact.save(&path)?;
            synthesizer.cleanup_scratch();
            println!("audio written to {}", path.display());
        }
        Command::Languages => {
            for (code, name) in SpeechSynthesizer::supported_languages() {
                println!("{code}\t{name}");
            }
        }
    }

    Ok(())
}

// parse_kind is exercised here rather than in the library: the string forms
// are a CLI concern.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_accepts_hyphenated_form() {
        assert_eq!(
            parse_kind("text-extraction").unwrap(),
            AnalysisKind::TextExtraction
        );
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        assert!(parse_kind("surreal").is_err());
    }
}
