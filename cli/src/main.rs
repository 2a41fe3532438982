use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::io::Write;
use std::sync::Arc;
use support_core::agent::{Action, LoopState, SupportSession, ToolRegistry, transition};
use support_core::traits::{Provider, ToolRunner};
use support_core::{config, providers, tools};

mod onboard;

const FIRST_PROMPT: &str = "Hi I am a customer support bot. What is your question?";
const FOLLOW_UP_PROMPT: &str = "Do you have a follow up question?";
const REPLY_LABEL: &str = "Support AI AGENT:";

#[derive(Parser)]
#[command(name = "support")]
#[command(about = "Customer-support agent for the headphones desk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Onboard,
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_session(config: &config::Config) -> Result<SupportSession> {
    let provider: Arc<dyn Provider> = Arc::from(providers::create_provider(config)?);

    let registry = Arc::new(ToolRegistry::new());
    registry.register(Box::new(tools::WebScrapeTool::new()));
    registry.register(Box::new(tools::CurrentTimeTool::new(
        config.utc_offset_hours,
    )));

    let runner: Arc<dyn ToolRunner> = registry;
    Ok(SupportSession::new(
        provider,
        runner,
        config.system_prompt.clone(),
    ))
}

fn print_reply(reply: &str) {
    println!("{} {}", style(REPLY_LABEL).yellow().bold(), reply);
}

async fn run_repl(mut session: SupportSession) {
    use std::io::{self, BufRead};
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout_lock = stdout.lock();

    let mut state = LoopState::Running;
    let mut first_question = true;

    while state == LoopState::Running {
        let prompt = if first_question {
            FIRST_PROMPT
        } else {
            FOLLOW_UP_PROMPT
        };
        print!("{} ", style(prompt).cyan());
        let _ = stdout_lock.flush();

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                let (next, action) = transition(state, &input);
                state = next;

                match action {
                    Action::Quit | Action::Skip => {}
                    Action::Ask(question) => {
                        first_question = false;
                        match session.ask(&question).await {
                            Ok(reply) => print_reply(&reply),
                            Err(e) => {
                                eprintln!("{} {}", style("Error:").red().bold(), e);
                            }
                        }
                        println!();
                    }
                }
            }
            Err(_) => break,
        }
    }
}


#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() {
            Commands::Onboard
        } else {
            Commands::Chat { message: None }
        }
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
            println!(
                "Configuration saved to {}. Run 'support chat' to start.",
                config::get_config_path().display()
            );
        }
        Commands::Chat { message } => {
            let config = config::Config::load_or_init()?;
            let mut session = build_session(&config)?;

            if let Some(question) = message {
                let reply = session.ask(&question).await?;
                print_reply(&reply);
            } else {
                run_repl(session).await;
            }
        }
    }

    Ok(())
}
