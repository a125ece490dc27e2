//! ChatGPTranslate CLI.
//!
//! Wires the stored settings, the translation client, and the usage reporter
//! together. Core errors surface here as notices; nothing below retries.

mod languages;
mod notify;
mod settings;

use clap::{Args, Parser, Subcommand};
use ct_llm::{CompletionClient, TranslateRequest, Translator, UsageReporter};
use notify::{Level, notify};
use settings::Settings;
use tracing_subscriber::EnvFilter;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0301";
/// Rough per-token price used for the completion-info estimate.
const COST_PER_TOKEN_USD: f64 = 0.000002;

#[derive(Debug, Parser)]
#[command(
    name = "chatgptranslate",
    version,
    about = "Translate text through a chat-completion API"
)]
struct Cli {
    /// API key; falls back to OPENAI_API_KEY, then the stored key.
    #[arg(long, global = true, env = "OPENAI_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate text to a target language.
    Translate(TranslateArgs),
    /// Show billing usage for the current month.
    Usage,
    /// List supported target languages and style presets.
    Languages,
    /// Manage stored settings.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
struct TranslateArgs {
    text: String,

    /// Target language code or name (see `languages`).
    #[arg(long)]
    lang: String,

    /// Style preset (see `languages`).
    #[arg(long, default_value = "")]
    style: String,

    #[arg(long, default_value_t = 1.0)]
    temperature: f32,

    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Replace the built-in prompt template verbatim.
    #[arg(long)]
    prompt: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Store the API key.
    SetKey { key: String },
    /// Show stored settings (key masked).
    Show,
    /// Restore default settings.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let settings = Settings::open_default()?;

    if settings.is_first_visit() {
        settings.reset();
        notify(
            Level::Default,
            "You need to set up your API key before using ChatGPTranslate.",
        );
        settings.mark_visited();
    }

    match cli.command {
        Command::Translate(args) => cmd_translate(&settings, cli.api_key, args).await,
        Command::Usage => cmd_usage(&settings, cli.api_key).await,
        Command::Languages => {
            cmd_languages();
            Ok(())
        }
        Command::Config(command) => {
            cmd_config(&settings, command);
            Ok(())
        }
    }
}

async fn cmd_translate(
    settings: &Settings,
    api_key: Option<String>,
    args: TranslateArgs,
) -> anyhow::Result<()> {
    let Some(api_key) = resolve_api_key(settings, api_key) else {
        return missing_key();
    };

    let Some(language) = languages::resolve(&args.lang) else {
        notify(
            Level::Error,
            &format!(
                "Unknown target language {:?}. Run `chatgptranslate languages` for the supported list.",
                args.lang
            ),
        );
        anyhow::bail!("unknown target language {:?}", args.lang);
    };
    if languages::resolve_style(&args.style).is_none() {
        notify(
            Level::Warning,
            &format!("Unknown style {:?}; translating without a preset.", args.style),
        );
    }

    let translator = Translator::new(CompletionClient::new(&api_key, &args.model));
    let request = TranslateRequest {
        text: args.text,
        target_lang: language.name.to_string(),
        temperature: args.temperature,
        style: args.style,
        override_prompt: args.prompt,
    };

    match translator.translate(&request).await {
        Ok(result) => {
            println!("{}", result.text.trim());
            println!(
                "{} s, {} tokens, {} USD",
                result.processing_time_ms as f64 / 1000.0,
                result.total_tokens,
                floor_to(COST_PER_TOKEN_USD * f64::from(result.total_tokens), 4)
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(%e, "translation failed");
            notify(
                Level::Error,
                "Translation failed. The API key may not be set up correctly.",
            );
            Err(e.into())
        }
    }
}

async fn cmd_usage(settings: &Settings, api_key: Option<String>) -> anyhow::Result<()> {
    let Some(api_key) = resolve_api_key(settings, api_key) else {
        return missing_key();
    };

    match UsageReporter::new(&api_key).get_month_usage().await {
        Ok(usage) => {
            println!(
                "Monthly usage for {}: {} USD",
                month_name(usage.month),
                floor_to(usage.usage_usd, 4)
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(%e, "usage query failed");
            notify(
                Level::Error,
                "Failed to retrieve usage status from OpenAI API.",
            );
            Err(e.into())
        }
    }
}

fn cmd_languages() {
    println!("Languages:");
    for language in languages::LANGUAGES {
        let formality = if language.supports_formality {
            "  [formality]"
        } else {
            ""
        };
        println!("  {:<6} {}{formality}", language.code, language.name);
    }
    println!();
    println!("Styles:");
    for style in languages::STYLES {
        let value = if style.value.is_empty() {
            "(default)"
        } else {
            style.value
        };
        println!("  {value:<10} {}", style.name);
    }
}

fn cmd_config(settings: &Settings, command: ConfigCommand) {
    match command {
        ConfigCommand::SetKey { key } => {
            settings.set_api_key(&key);
            notify(Level::Success, "Settings have been saved.");
        }
        ConfigCommand::Show => {
            println!("settings file: {}", settings.path().display());
            match settings.api_key() {
                Some(key) => println!("api key: {}", mask_key(&key)),
                None => notify(Level::Warning, "No API key stored."),
            }
        }
        ConfigCommand::Reset => {
            settings.reset();
            notify(Level::Success, "Settings have been reset.");
        }
    }
}

/// Flag (or env, via clap) wins over the stored key.
fn resolve_api_key(settings: &Settings, flag: Option<String>) -> Option<String> {
    flag.filter(|key| !key.is_empty())
        .or_else(|| settings.api_key())
}

fn missing_key() -> anyhow::Result<()> {
    notify(
        Level::Error,
        "No API key configured. Run `chatgptranslate config set-key <KEY>` first.",
    );
    anyhow::bail!("missing API key")
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Truncate `value` below the given number of decimal places.
fn floor_to(value: f64, digits: u32) -> f64 {
    let base = 10f64.powi(digits as i32);
    (value * base).floor() / base
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(v) => v,
        Err(_) => EnvFilter::new("warn,chatgptranslate=info,ct_llm=info,ct_store=info"),
    };
    let log_format = std::env::var("CHATGPTRANSLATE_LOG_FORMAT")
        .unwrap_or_else(|_| "compact".to_string())
        .to_ascii_lowercase();

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .pretty()
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
                .init();
        }
        other => {
            return Err(anyhow::anyhow!(
                "unsupported CHATGPTRANSLATE_LOG_FORMAT={other:?}; expected one of: pretty, compact"
            ));
        }
    }

    Ok(())
}
