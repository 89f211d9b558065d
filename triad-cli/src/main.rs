use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use triad::{
    AgentRole, ApiKey, Backend, Event, PipelineResult, PromptBuilder, StageResult, Triad,
};

#[derive(Parser)]
#[command(name = "triad", version)]
#[command(
    about = "Researcher, Writer and Critic agents collaborating on a task",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// LLM provider to use (anthropic, openai)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Researcher -> Writer -> Critic workflow on a task
    Run {
        /// The task to work on
        task: String,

        /// API key (defaults to ANTHROPIC_API_KEY or OPENAI_API_KEY for the provider)
        #[arg(long)]
        api_key: Option<String>,

        /// Print the final result as JSON instead of stage cards
        #[arg(long)]
        json: bool,

        /// Hide the agents' thoughts in stage cards
        #[arg(long)]
        no_thoughts: bool,
    },

    /// Show the prompts an agent would receive, without calling the API
    Prompt {
        /// Agent role (researcher, writer, critic)
        role: AgentRole,

        /// Input text for the agent
        input: String,
    },

    /// List the agents in pipeline order
    Roles,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("info".parse().expect("valid log directive"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the API key: explicit flag first, then the provider's environment variable.
/// A blank value counts as absent at either level.
fn resolve_api_key(flag: Option<String>, backend: Backend) -> Result<ApiKey> {
    let present = |k: &String| !k.trim().is_empty();
    let key = flag
        .filter(present)
        .or_else(|| std::env::var(backend.api_key_env()).ok().filter(present))
        .with_context(|| {
            format!(
                "no API key: pass --api-key or set {}",
                backend.api_key_env()
            )
        })?;
    Ok(ApiKey::new(key))
}

fn render_stage(result: &StageResult, show_thoughts: bool) {
    println!("\n=== {} ===", result.role.title());
    if show_thoughts && !result.thoughts.is_empty() {
        println!("\nThoughts:\n{}", result.thoughts);
    }
    println!("\nResponse:\n{}", result.output_text);
    println!("{}", "-".repeat(70));
}

async fn run_workflow(
    triad: &Triad,
    task: &str,
    api_key: ApiKey,
    json: bool,
    show_thoughts: bool,
) -> Result<PipelineResult> {
    let mut handle = triad.run(task, api_key).await?;

    while let Some(event) = handle.next_event().await {
        match event {
            Event::StageStarted { activity, .. } => {
                if !json {
                    eprintln!("{}", activity);
                }
            }
            Event::StageCompleted { result } => {
                if !json {
                    render_stage(&result, show_thoughts);
                }
            }
            Event::StageFailed { role, error } => {
                error!(agent = %role, error = %error, "stage failed");
            }
            Event::RunStarted { run_id, .. } => debug!(run_id = %run_id, "run started"),
            Event::RunCompleted { status } => debug!(?status, "run completed"),
        }
    }

    Ok(handle.wait().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            task,
            api_key,
            json,
            no_thoughts,
        } => {
            // Precedence: CLI > project file > global file > defaults
            let mut builder = Triad::builder().from_config()?;
            if let Some(ref name) = cli.provider {
                builder = builder.provider_by_name(name, cli.model.as_deref())?;
            } else if let Some(ref model) = cli.model {
                builder = builder.model(model);
            }

            let settings = builder.model_settings().cloned().unwrap_or_default();
            let api_key = resolve_api_key(api_key, settings.backend)?;

            info!(
                provider = %settings.backend,
                model = settings.model(),
                "starting workflow"
            );

            let triad = builder.build().context("failed to build triad")?;

            match run_workflow(&triad, &task, api_key, json, !no_thoughts).await {
                Ok(result) => {
                    if json {
                        let out = serde_json::to_string_pretty(&result)
                            .context("failed to serialize result")?;
                        println!("{}", out);
                    } else {
                        eprintln!("Workflow completed!");
                    }
                }
                Err(e) => {
                    error!(error = %e, "workflow failed");
                    anyhow::bail!("workflow failed: {:#}", e);
                }
            }
        }

        Commands::Prompt { role, input } => {
            println!("--- system ---\n{}", PromptBuilder::system_prompt(role));
            println!("\n--- user ---\n{}", PromptBuilder::build(role, &input));
        }

        Commands::Roles => {
            for role in AgentRole::PIPELINE {
                println!(
                    "{}. {:<12} {}",
                    role.index() + 1,
                    role.title(),
                    role.expertise()
                );
            }
        }
    }

    Ok(())
}
