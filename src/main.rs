use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use clap::{Parser, ValueEnum};
use page_quiz::{
    Config, ConfluenceSource, GeminiBackend, QuestionType, Quiz, QuizError, QuizGenerator,
    QuizOverrides,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const ENV_LOG_FILE: &str = "PAGE_QUIZ_LOG";
const DEFAULT_LOG_FILE: &str = "page-quiz.log";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TypeArg {
    /// Multiple choice
    Mcq,
    /// True/false
    Tf,
}

impl From<TypeArg> for QuestionType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Mcq => QuestionType::MultipleChoice,
            TypeArg::Tf => QuestionType::TrueFalse,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Page to build the quiz from, e.g. https://acme.atlassian.net/wiki/spaces/ENG/pages/123/Title
    #[arg(short, long)]
    page: String,

    /// Number of questions (5, 10 or 15 depending on page length)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    questions: Option<u16>,

    /// Question type
    #[arg(short = 't', long = "type", value_enum)]
    question_type: Option<TypeArg>,
}

/// Log to a file; the terminal belongs to the quiz screens.
fn init_tracing() -> Result<(), QuizError> {
    let path = std::env::var(ENV_LOG_FILE).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn run(args: Args) -> Result<(), QuizError> {
    init_tracing()?;
    let config = Config::from_env()?;

    let generator = QuizGenerator::new(
        Arc::new(ConfluenceSource::new(
            config.confluence_base_url.clone(),
            config.confluence_auth.clone(),
        )?),
        Arc::new(GeminiBackend::from_config(&config)),
    );

    let overrides = QuizOverrides {
        question_count: args.questions.map(usize::from),
        question_type: args.question_type.map(QuestionType::from),
    };

    Quiz::new(generator, args.page, config.export_dir)
        .with_overrides(overrides)
        .run()
        .await
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
