//! deskpilot CLI: natural-language command routing for the desktop.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use deskpilot::config::AssistantConfig;
use deskpilot::exec::runner::Agent;

#[derive(Parser)]
#[command(name = "deskpilot", version, about = "Natural-language desktop assistant")]
struct Cli {
    /// Config file (defaults to the XDG config location).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Working directory for uploads, searches, and shell commands.
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,

    /// Skip the LLM entirely and resolve with patterns only.
    #[arg(long, global = true)]
    no_llm: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single command through the pipeline.
    Run {
        /// The natural-language command.
        command: Vec<String>,

        /// Print the full CommandResult as JSON instead of the friendly text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive loop: one command per line, `exit` to leave.
    Repl,

    /// List the supported actions and the shell whitelist.
    Actions,

    /// Show the effective configuration and LLM availability.
    Info,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AssistantConfig::load(path).map_err(deskpilot::error::DeskError::from)?,
        None => AssistantConfig::load_or_default().map_err(deskpilot::error::DeskError::from)?,
    };
    if let Some(workdir) = cli.workdir {
        config.workdir = workdir;
    }
    if cli.no_llm {
        config.llm.enabled = false;
    }

    match cli.command {
        Commands::Run { command, json } => {
            let text = command.join(" ");
            let agent = Agent::new(config);
            let result = agent.process(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
            } else {
                println!("{}", result.friendly_response);
            }
        }

        Commands::Repl => {
            let agent = Agent::new(config);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            loop {
                print!("> ");
                stdout.flush().into_diagnostic()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line).into_diagnostic()? == 0 {
                    break;
                }
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                let result = agent.process(line);
                println!("{}\n", result.friendly_response);
            }
        }

        Commands::Actions => {
            let agent = Agent::new(config);
            println!("Supported actions:");
            for (name, what) in [
                ("read_file", "read a .txt or .pdf file"),
                ("summarize", "summarize text"),
                ("generate_email", "draft an email"),
                ("run_shell", "run a whitelisted shell command"),
                ("answer_question", "answer a question"),
                ("search_files", "search a directory"),
                ("open_url", "open a URL in the browser"),
                ("open_app", "launch an application"),
                ("open_explorer", "open the file explorer"),
                ("create_file", "create a file"),
                ("create_folder", "create a folder"),
                ("open_terminal", "open a terminal window"),
                ("get_system_info", "report system specs"),
                ("get_time", "report the local time"),
            ] {
                println!("  {name:<16} {what}");
            }
            println!("\nShell whitelist:");
            println!("  {}", agent.shell_commands().join(", "));
        }

        Commands::Info => {
            println!("workdir:            {}", config.workdir.display());
            println!("shell timeout:      {}s", config.shell_timeout_secs);
            println!("llm enabled:        {}", config.llm.enabled);
            println!("llm endpoint:       {}", config.llm.base_url);
            println!("llm model:          {}", config.llm.model);

            let mut client = deskpilot::llm::LlmClient::new(config.llm.clone());
            let reachable = client.probe();
            println!("llm reachable:      {reachable}");
            if let Ok(paths) = deskpilot::paths::PilotPaths::resolve() {
                println!("config file:        {}", paths.config_file().display());
            }
        }
    }

    Ok(())
}
