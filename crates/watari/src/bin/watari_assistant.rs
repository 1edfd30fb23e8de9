use agent_tools::ToolsetSelection;
use brain_core::Brain;
use clap::Parser;
use google_calendar::CalendarConfig;
use llm_brain::LlmBrainConfig;
use tracing::info;
use watari::{assistant, build_registry, google_calendar, init_logging, ToolSources};

/// Answer one request with the selected tools. The reply goes to stdout.
#[derive(Debug, Parser)]
#[command(name = "watari-assistant", version)]
struct Cli {
    /// Toolset to expose: calendar, weather or all. Repeatable; defaults to all.
    #[arg(long = "functions", value_name = "TOOLSET")]
    functions: Vec<String>,

    /// Run the Google consent flow and store the token, then exit unless a request follows.
    #[arg(long)]
    authorize: bool,

    /// The request, e.g. "What's on my calendar tomorrow?"
    #[arg(value_name = "UTTERANCE")]
    utterance: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_logging(true);

    let cli = Cli::parse();
    let selection = ToolsetSelection::parse(cli.functions.as_slice())?;
    let utterance = cli.utterance.join(" ");

    if utterance.trim().is_empty() && !cli.authorize {
        return Err("no request given".into());
    }

    let mut sources = ToolSources::from_env();
    if selection.calendar || cli.authorize {
        let (auth, backend) = google_calendar(&CalendarConfig::from_env())?;
        if cli.authorize {
            auth.authorize().await?;
            info!("Google Calendar authorization stored");
        }
        sources = sources.with_calendar(backend);
    }

    if utterance.trim().is_empty() {
        return Ok(());
    }

    let registry = build_registry(selection, &sources)?;
    let brain = assistant(LlmBrainConfig::from_env()?, registry)?;

    let reply = brain.process(&utterance).await?;
    println!("{}", reply);

    Ok(())
}
