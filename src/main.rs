mod error;
mod plain;
mod request;
mod secret;
mod terminal;
mod validate;

use clap::Parser;
use error::PromptError;
use request::PromptRequest;
use std::io;

/// A CLI tool that prompts the user for a single line of input:
/// optional secret (no-echo) entry, JSON validation, and
/// loop-until-non-blank. The answer is printed to stdout so shell
/// scripts can capture it.
#[derive(Parser, Debug)]
#[command(name = "askline", version, about)]
pub struct Cli {
    /// The question for the prompt
    #[arg(short, long, env = "QUESTION")]
    question: Option<String>,

    /// Read the answer with terminal echo suppressed
    #[arg(short, long, env = "SECRET")]
    secret: bool,

    /// Validate the answer as JSON
    #[arg(short, long, env = "JSON")]
    json: bool,

    /// Repeat the prompt until a non-blank answer is entered
    #[arg(short = 'l', long = "loop", env = "LOOP")]
    loop_until_filled: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askline=warn".parse().unwrap()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&cli).await {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("askline: {}", e);
            eprintln!("Try askline --help for more information.");
            // Exits without joining a reader thread abandoned by a
            // signal win; that thread may still be blocked on stdin.
            std::process::exit(1);
        }
    }
}

/// Prompt once, or repeatedly under --loop until the answer is non-blank.
///
/// The label goes to stderr so captured stdout holds only the answer.
async fn run(cli: &Cli) -> Result<String, PromptError> {
    let request = PromptRequest::new(cli.question.clone(), false);

    loop {
        let value = if cli.secret {
            secret::secret_string(&request).await?
        } else {
            plain::plain_string(&request, &mut io::stdin().lock())?
        };

        if value.is_empty() && cli.loop_until_filled {
            continue;
        }
        if cli.json {
            validate::ensure_json(&value)?;
        }
        return Ok(value);
    }
}
