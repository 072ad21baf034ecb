//! affectscreen CLI - offline scoring for recorded emotion sessions
//!
//! Commands:
//! - score: reduce recorded per-stimulus label sequences to a session result
//! - fuse: combine a survey tier and an emotion outcome into a risk tier

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use affectscreen::session::final_score;
use affectscreen::{
    fuse, EmotionLabel, ResponseAggregator, RiskTier, SessionOutcome, SessionResult,
    StimulusResult, SurveyAssessment, ENGINE_VERSION,
};

/// affectscreen - emotion-response session scoring for ASD screening
#[derive(Parser)]
#[command(name = "affectscreen")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score recorded emotion sessions and fuse screening modalities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score recorded per-stimulus label sequences (NDJSON, one stimulus per
    /// line) into a session result
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Fuse a survey risk tier with an emotion session outcome
    Fuse {
        /// Survey risk tier from the questionnaire classifier
        #[arg(long, value_enum)]
        survey_tier: CliTier,

        /// Survey model probability, if the model reports one
        #[arg(long)]
        probability: Option<f64>,

        /// Emotion session final score (0, 1, or 2)
        #[arg(long, conflicts_with = "no_face")]
        emotion_score: Option<u8>,

        /// The emotion session ended with the no-face sentinel
        #[arg(long)]
        no_face: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliTier {
    Low,
    Moderate,
    High,
}

impl From<CliTier> for RiskTier {
    fn from(tier: CliTier) -> Self {
        match tier {
            CliTier::Low => RiskTier::Low,
            CliTier::Moderate => RiskTier::Moderate,
            CliTier::High => RiskTier::High,
        }
    }
}

/// One recorded stimulus window, as captured by a live session run
#[derive(serde::Deserialize)]
struct StimulusRecord {
    stimulus: String,
    labels: Vec<EmotionLabel>,
    faces_detected: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ScreenCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            output_format,
        } => cmd_score(&input, &output, output_format),

        Commands::Fuse {
            survey_tier,
            probability,
            emotion_score,
            no_face,
        } => cmd_fuse(survey_tier, probability, emotion_score, no_face),
    }
}

fn cmd_score(
    input: &PathBuf,
    output: &PathBuf,
    output_format: OutputFormat,
) -> Result<(), ScreenCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(ScreenCliError::StdinIsTty);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let started_at = chrono::Utc::now();
    let mut stimuli: Vec<StimulusResult> = Vec::new();
    let mut total_faces_detected = 0u64;

    for (line_no, line) in input_data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: StimulusRecord = serde_json::from_str(line).map_err(|e| {
            ScreenCliError::ParseError(format!("line {}: {}", line_no + 1, e))
        })?;
        total_faces_detected += record.faces_detected;
        stimuli.push(ResponseAggregator::score(&record.stimulus, &record.labels));
    }

    if stimuli.is_empty() {
        return Err(ScreenCliError::NoRecords);
    }

    let outcome = if total_faces_detected == 0 {
        SessionOutcome::NoFaceDetected
    } else {
        SessionOutcome::Scored {
            final_score: final_score(&stimuli),
        }
    };

    let result = SessionResult {
        session_id: uuid::Uuid::new_v4(),
        engine_version: ENGINE_VERSION.to_string(),
        started_at,
        completed_at: chrono::Utc::now(),
        total_faces_detected,
        stimuli,
        outcome,
    };

    let output_data = match output_format {
        OutputFormat::Json => serde_json::to_string(&result)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&result)?,
    };

    if output.to_string_lossy() == "-" {
        println!("{output_data}");
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_fuse(
    survey_tier: CliTier,
    probability: Option<f64>,
    emotion_score: Option<u8>,
    no_face: bool,
) -> Result<(), ScreenCliError> {
    let emotion = if no_face {
        SessionOutcome::NoFaceDetected
    } else {
        let final_score = emotion_score.ok_or(ScreenCliError::MissingEmotionOutcome)?;
        if final_score > 2 {
            return Err(ScreenCliError::ParseError(format!(
                "emotion score must be 0, 1, or 2, got {final_score}"
            )));
        }
        SessionOutcome::Scored { final_score }
    };

    let survey = SurveyAssessment {
        tier: survey_tier.into(),
        probability,
    };
    let final_tier = fuse(&survey, &emotion);

    let report = FusionReport {
        survey,
        emotion,
        final_tier,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(serde::Serialize)]
struct FusionReport {
    survey: SurveyAssessment,
    emotion: SessionOutcome,
    /// None when the emotion session produced the no-face sentinel
    final_tier: Option<RiskTier>,
}

// Error types

#[derive(Debug)]
enum ScreenCliError {
    Io(io::Error),
    Json(serde_json::Error),
    ParseError(String),
    NoRecords,
    StdinIsTty,
    MissingEmotionOutcome,
}

impl From<io::Error> for ScreenCliError {
    fn from(e: io::Error) -> Self {
        ScreenCliError::Io(e)
    }
}

impl From<serde_json::Error> for ScreenCliError {
    fn from(e: serde_json::Error) -> Self {
        ScreenCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ScreenCliError> for CliError {
    fn from(e: ScreenCliError) -> Self {
        match e {
            ScreenCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ScreenCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ScreenCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Each line must be a stimulus record with stimulus, labels, faces_detected".to_string()),
            },
            ScreenCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No stimulus records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            ScreenCliError::StdinIsTty => CliError {
                code: "STDIN_IS_TTY".to_string(),
                message: "Refusing to read records from an interactive terminal".to_string(),
                hint: Some("Pipe NDJSON records or pass --input <file>".to_string()),
            },
            ScreenCliError::MissingEmotionOutcome => CliError {
                code: "MISSING_EMOTION_OUTCOME".to_string(),
                message: "Provide either --emotion-score or --no-face".to_string(),
                hint: None,
            },
        }
    }
}
