use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use keyscout_common::{KeywordRecord, StrategyReport};
use keyscout_research::prompts::{DEFAULT_ANALYZE_PROMPT, DEFAULT_GEN_PROMPT};

mod api;
mod login;

use api::ApiClient;

#[derive(Parser)]
#[command(name = "keyscout", about = "SEO keyword research from the terminal")]
struct Cli {
    /// Base URL of the keyscout API
    #[arg(long, env = "KEYSCOUT_API_URL", default_value = "http://localhost:3001")]
    api_url: String,

    /// Main application that issues transfer tokens
    #[arg(long, env = "MAIN_APP_URL")]
    main_app_url: Option<String>,

    /// Host serving /api/auth/verify-transfer, tried when the main
    /// application is unreachable. Defaults to the API URL, which only works
    /// behind a proxy that routes that path to the auth service.
    #[arg(long, env = "KEYSCOUT_AUTH_ORIGIN")]
    auth_origin: Option<String>,

    /// Where the session token and user are kept
    #[arg(long, env = "KEYSCOUT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Exchange a transfer token (or a link carrying one) for a session
    Login {
        /// Address from the main application, e.g. https://app/?tt=...
        address: Option<String>,
        #[arg(long, conflicts_with = "address")]
        token: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check the API is up
    Health,
    /// Generate a round of keywords for a seed
    Generate {
        seed: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value_t = 1)]
        round: u32,
        /// Keywords already found (repeatable)
        #[arg(long = "existing")]
        existing: Vec<String>,
        /// System instruction; defaults to the built-in SEO specialist prompt
        #[arg(long)]
        instruction: Option<String>,
    },
    /// Estimate page-1 probability for keywords read as JSON
    Analyze {
        /// JSON array of keyword records, or `{"keywords": [...]}`; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value = "en")]
        ui: String,
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        instruction: Option<String>,
    },
    /// Content strategy report for one keyword
    DeepDive {
        keyword: String,
        #[arg(long, default_value = "en")]
        ui: String,
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Turn a rough prompt into an English system instruction
    TranslatePrompt { prompt: String },
    /// Translate text into Chinese (zh) or English (en)
    TranslateText {
        text: String,
        #[arg(long, default_value = "zh")]
        to: String,
    },
}

#[derive(Deserialize)]
struct KeywordsReply {
    keywords: Vec<KeywordRecord>,
}

#[derive(Deserialize)]
struct ReportReply {
    report: StrategyReport,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordInput {
    List(Vec<serde_json::Value>),
    Wrapped { keywords: Vec<serde_json::Value> },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.api_url);
    let main_app_url = session_client::normalize_main_app_url(cli.main_app_url.as_deref());
    let session_file = cli.session_file.unwrap_or_else(login::default_session_file);
    let auth_origin = cli.auth_origin.unwrap_or_else(|| cli.api_url.clone());

    match cli.command {
        Command::Login { address, token } => {
            let transfer_token = match (address, token) {
                (Some(address), _) => {
                    let (clean, token) = session_client::take_transfer_token(&address)?;
                    if token.is_none() {
                        warn!(address = %clean, "No transfer token in address");
                    }
                    token
                }
                (None, token) => token,
            };
            let user = login::login(&session_file, &main_app_url, &auth_origin, transfer_token).await?;
            match user {
                Some(user) => println!("Logged in as {} ({})", user.email, user.user_id),
                None => bail!("Not logged in. Open {main_app_url} and follow its link to this tool."),
            }
        }
        Command::Logout => {
            let redirect = login::logout(&session_file, &main_app_url)?;
            println!("Logged out. Sign in again at {redirect}");
        }
        Command::Whoami => match login::current_user(&session_file, &main_app_url).await? {
            Some(user) => print_json(&user)?,
            None => bail!("Not logged in"),
        },
        Command::Health => {
            let reply: serde_json::Value = api.get("/api/health").await?;
            print_json(&reply)?;
        }
        Command::Generate {
            seed,
            lang,
            round,
            existing,
            instruction,
        } => {
            let reply: KeywordsReply = api
                .post(
                    "/api/generate-keywords",
                    &json!({
                        "seedKeyword": seed,
                        "targetLanguage": lang,
                        "systemInstruction": instruction.unwrap_or_else(|| DEFAULT_GEN_PROMPT.to_string()),
                        "existingKeywords": existing,
                        "roundIndex": round,
                    }),
                )
                .await?;
            if reply.keywords.is_empty() {
                warn!("The model returned no keywords; try again or change the seed");
            }
            print_json(&reply.keywords)?;
        }
        Command::Analyze {
            input,
            ui,
            lang,
            instruction,
        } => {
            let keywords = read_keywords(input)?;
            let reply: KeywordsReply = api
                .post(
                    "/api/analyze-ranking",
                    &json!({
                        "keywords": keywords,
                        "systemInstruction": instruction.unwrap_or_else(|| DEFAULT_ANALYZE_PROMPT.to_string()),
                        "uiLanguage": ui,
                        "targetLanguage": lang,
                    }),
                )
                .await?;
            print_json(&reply.keywords)?;
        }
        Command::DeepDive { keyword, ui, lang } => {
            let reply: ReportReply = api
                .post(
                    "/api/deep-dive-strategy",
                    &json!({ "keyword": keyword, "uiLanguage": ui, "targetLanguage": lang }),
                )
                .await?;
            print_json(&reply.report)?;
        }
        Command::TranslatePrompt { prompt } => {
            let reply: serde_json::Value = api
                .post("/api/translate-prompt", &json!({ "prompt": prompt }))
                .await?;
            println!("{}", reply["optimized"].as_str().unwrap_or_default());
        }
        Command::TranslateText { text, to } => {
            let reply: serde_json::Value = api
                .post(
                    "/api/translate-text",
                    &json!({ "text": text, "targetLanguage": to }),
                )
                .await?;
            println!("{}", reply["translated"].as_str().unwrap_or_default());
        }
    }

    Ok(())
}

/// `RUST_LOG` plus `warn` for every workspace crate.
fn log_filter() -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for target in ["keyscout", "ai_client", "serp_client", "session_client"] {
        filter = filter.add_directive(format!("{target}=warn").parse()?);
    }
    Ok(filter)
}

fn read_keywords(input: Option<PathBuf>) -> Result<Vec<serde_json::Value>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read keywords from stdin")?;
            buf
        }
    };

    let keywords = match serde_json::from_str(&raw).context("Keywords must be JSON")? {
        KeywordInput::List(list) | KeywordInput::Wrapped { keywords: list } => list,
    };
    if keywords.is_empty() {
        bail!("No keywords to analyse");
    }
    Ok(keywords)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
