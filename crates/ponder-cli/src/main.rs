mod configuration;
mod error;

use anyhow::{anyhow, Context, Result};
use bat::PrettyPrinter;
use clap::{Args, Parser, Subcommand};
use cliclack::{input, spinner};
use console::style;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use configuration::{Overrides, Settings};
use ponder::agent::{Agent, Outcome};
use ponder::models::transcript::Transcript;
use ponder::providers::openai::OpenAiProvider;
use ponder::tools::ToolRegistry;

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that can perform combinatorics calculations.";

/// The canned questions run by `ponder demo`
const DEMO_SCENARIOS: [(&str, &str); 4] = [
    (
        "Simple Combination",
        "How many ways can I choose 3 items from 10 items?",
    ),
    (
        "Multiple Calculations",
        "Calculate both the combinations and permutations for choosing 2 items from 5 items. \
         Explain the difference.",
    ),
    (
        "Real-world Problem",
        "In a lottery where you need to pick 6 numbers from 49, how many different combinations \
         are possible?",
    ),
    (
        "Error Handling",
        "What happens if I try to choose 5 items from 3 items?",
    ),
];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConnectionArgs {
    /// OpenAI API key (can also be set via OPENAI_API_KEY or PONDER_PROVIDER__API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL of an OpenAI compatible endpoint
    #[arg(long, global = true)]
    host: Option<String>,

    /// Model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Maximum number of model calls per question
    #[arg(long, global = true)]
    max_iterations: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question
    Ask {
        question: String,

        /// System prompt for the run
        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system: String,

        /// Print the full transcript as JSON after the answer
        #[arg(long)]
        show_transcript: bool,
    },
    /// Run the built-in example questions
    Demo,
    /// Ask questions interactively, each on a fresh conversation
    Chat,
    /// Print the tool catalog advertised to the model
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        eprintln!("Loaded environment from {:?}", path);
    }
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Ask {
            question,
            system,
            show_transcript,
        } => {
            let agent = build_agent(&cli.connection)?;
            let (outcome, transcript) = ask(&agent, &system, &question).await?;
            render(outcome.text())?;
            if show_transcript {
                println!("{}", serde_json::to_string_pretty(&transcript)?);
            }
        }
        Command::Demo => demo(&build_agent(&cli.connection)?).await?,
        Command::Chat => chat(&build_agent(&cli.connection)?).await?,
        Command::Tools => print_tools()?,
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ponder=info,ponder_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_agent(connection: &ConnectionArgs) -> Result<Agent> {
    let overrides = Overrides {
        host: connection.host.clone(),
        api_key: connection.api_key.clone(),
        model: connection.model.clone(),
        max_iterations: connection.max_iterations,
    };
    let settings = Settings::load(&overrides).context(
        "API key must be provided via --api-key, OPENAI_API_KEY or PONDER_PROVIDER__API_KEY",
    )?;

    let provider = OpenAiProvider::new(settings.provider.into_config())?;
    Ok(Agent::new(
        Box::new(provider),
        ToolRegistry::all(),
        settings.agent.into_config(),
    ))
}

async fn ask(agent: &Agent, system: &str, question: &str) -> Result<(Outcome, Transcript)> {
    let mut transcript = Transcript::new(system).with_user(question)?;
    let outcome = agent.run(&mut transcript).await?;
    Ok((outcome, transcript))
}

async fn demo(agent: &Agent) -> Result<()> {
    for (index, (title, question)) in DEMO_SCENARIOS.iter().enumerate() {
        println!(
            "\n{}",
            style(format!("=== Example {}: {} ===", index + 1, title)).bold()
        );
        println!("{}\n", style(question).dim());

        let (outcome, _) = ask(agent, DEFAULT_SYSTEM_PROMPT, question).await?;
        render(outcome.text())?;
    }
    Ok(())
}

async fn chat(agent: &Agent) -> Result<()> {
    println!(
        "ponder {}",
        style("- type \"exit\" to end the session").dim()
    );
    println!("\n");

    loop {
        let message_text: String = input("Message:").placeholder("").multiline().interact()?;

        if message_text.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        let spin = spinner();
        spin.start("awaiting reply");
        let result = ask(agent, DEFAULT_SYSTEM_PROMPT, &message_text).await;
        spin.stop("");

        match result {
            Ok((outcome, _)) => render(outcome.text())?,
            Err(e) => eprintln!("{} {:#}", style("error:").red().bold(), e),
        }
        println!("\n");
    }
    Ok(())
}

fn print_tools() -> Result<()> {
    let catalog: Vec<_> = ToolRegistry::all()
        .describe()
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.input_schema(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

fn render(content: &str) -> Result<()> {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .map_err(|e| anyhow!("failed to render output: {}", e))?;
    Ok(())
}
