use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recipeasy_ingest::ingestion_config::{select_api_key, IngestConfig, SubscriptionStatus};
use recipeasy_ingest::localization::LocalizationManager;
use recipeasy_ingest::prompt_builder::{
    CookingTimePreference, CuisinePreference, DietaryRestriction, RecipePreferences,
};
use recipeasy_ingest::sources::{fetch_html, read_text_input};
use recipeasy_ingest::{Recipe, RecipeIngestor};

#[derive(Debug, Parser)]
#[command(
    name = "recipeasy-ingest",
    version,
    about = "Turn free text, web pages and PDF text into structured recipes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key for the completion endpoint (defaults to $OPENAI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Output format for the recipe
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    /// Language for user-facing messages (e.g. "en", "fr")
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a recipe from a description
    Prompt {
        text: String,
        #[arg(long, value_enum)]
        diet: Vec<DietArg>,
        #[arg(long, value_enum)]
        time: Option<TimeArg>,
        #[arg(long, value_enum)]
        cuisine: Option<CuisineArg>,
    },
    /// Extract a recipe from a web page
    Html {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,
        /// HTML file, or "-" for standard input
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Extract a recipe from text extracted out of a PDF
    PdfText {
        /// Text file, or "-" for standard input
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DietArg {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TimeArg {
    Quick,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CuisineArg {
    Italian,
    Asian,
    Mexican,
    Mediterranean,
}

fn preferences_from_args(
    diet: &[DietArg],
    time: Option<TimeArg>,
    cuisine: Option<CuisineArg>,
) -> RecipePreferences {
    let mut preferences = RecipePreferences::default();

    for restriction in diet {
        preferences = preferences.with_restriction(match restriction {
            DietArg::Vegetarian => DietaryRestriction::Vegetarian,
            DietArg::Vegan => DietaryRestriction::Vegan,
            DietArg::GlutenFree => DietaryRestriction::GlutenFree,
            DietArg::DairyFree => DietaryRestriction::DairyFree,
        });
    }

    if let Some(time) = time {
        preferences = preferences.with_cooking_time(match time {
            TimeArg::Quick => CookingTimePreference::Quick,
            TimeArg::Medium => CookingTimePreference::Medium,
            TimeArg::Long => CookingTimePreference::Long,
        });
    }

    if let Some(cuisine) = cuisine {
        preferences = preferences.with_cuisine(match cuisine {
            CuisineArg::Italian => CuisinePreference::Italian,
            CuisineArg::Asian => CuisinePreference::Asian,
            CuisineArg::Mexican => CuisinePreference::Mexican,
            CuisineArg::Mediterranean => CuisinePreference::Mediterranean,
        });
    }

    preferences
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_recipe(recipe: &Recipe, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(recipe).context("Failed to serialize recipe")?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{recipe}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.json_logs);

    info!("recipeasy-ingest {} starting", env!("CARGO_PKG_VERSION"));

    let config = IngestConfig::from_env()?;
    let ingestor = RecipeIngestor::from_config(&config)?;
    let localization = LocalizationManager::new()?;
    let lang = cli.lang.as_deref();

    // Empty when unset; the pipeline reports the missing credential itself
    let user_key = cli
        .api_key
        .clone()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .unwrap_or_default();
    let subscriber_key = env::var("RECIPEASY_SUBSCRIBER_API_KEY").unwrap_or_default();
    let api_key = select_api_key(SubscriptionStatus::Unknown, &user_key, &subscriber_key);

    eprintln!("{}", localization.get_message("ingestion-started", lang, &[]));

    let outcome = match &cli.command {
        Command::Prompt {
            text,
            diet,
            time,
            cuisine,
        } => {
            let preferences = preferences_from_args(diet, *time, *cuisine);
            ingestor
                .from_prompt_with_preferences(text, &preferences, api_key)
                .await
        }
        Command::Html { url, file } => {
            let html = match (url, file) {
                (Some(url), _) => fetch_html(url).await?,
                (None, Some(file)) => read_text_input(file)?,
                (None, None) => anyhow::bail!("Either --url or --file is required"),
            };
            ingestor.from_html(&html, api_key).await
        }
        Command::PdfText { file } => {
            let text = read_text_input(file)?;
            ingestor.from_pdf_text(&text, api_key).await
        }
    };

    match outcome {
        Ok(recipe) => {
            for issue in recipe.validation_issues() {
                warn!("Generated recipe has a validation issue: {issue:?}");
            }
            print_recipe(&recipe, cli.format)?;
            eprintln!(
                "{}",
                localization.get_message("ingestion-succeeded", lang, &[("name", recipe.name.as_str())])
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", localization.user_message(&e, lang));
            Ok(ExitCode::FAILURE)
        }
    }
}
