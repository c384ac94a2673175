//! Sends one contact message through the same workflow the site form uses.
//!
//! ```text
//! contact_send --base-url https://example.dev --name Ada --email ada@example.dev \
//!     --message "Hello" --token <challenge-token>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use contactform::delivery::HttpMailTransport;
use contactform::form::{CAPTCHA_MISSING, SubmissionOutcome, SubmitReport};
use contactform::{ContactController, ContactOptions, InMemoryChallenge};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "contactform=info,contact_send=info";

#[derive(Debug, Parser)]
#[command(
    name = "contact_send",
    about = "Deliver a contact message to a portfolio mail endpoint"
)]
struct Cli {
    /// Site origin the endpoint path is joined onto.
    #[arg(long, env = "CONTACTFORM_BASE_URL")]
    base_url: String,

    /// JSON file with endpoint, reset_delay_ms and request_timeout_ms.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    message: String,

    /// Token produced by the bot-challenge widget.
    #[arg(long, env = "CONTACTFORM_CHALLENGE_TOKEN")]
    token: Option<String>,

    /// Wait for the delayed reset before exiting.
    #[arg(long)]
    wait_reset: bool,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let options = match &cli.config {
        Some(path) => ContactOptions::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ContactOptions::default(),
    };
    let transport =
        HttpMailTransport::new(&cli.base_url, &options).context("building mail transport")?;

    let challenge = InMemoryChallenge::new();
    if let Some(token) = cli.token {
        challenge.solve(token);
    }

    let controller = ContactController::new(options, transport, challenge);
    controller.set_field("name", cli.name)?;
    controller.set_field("email", cli.email)?;
    controller.set_field("message", cli.message)?;

    match controller.submit().await? {
        SubmitReport::Invalid(error) => {
            eprintln!("{}: {}", error.field, error.message);
            Ok(ExitCode::from(2))
        }
        SubmitReport::ChallengeMissing => {
            eprintln!("{CAPTCHA_MISSING}");
            Ok(ExitCode::from(2))
        }
        SubmitReport::Delivered { outcome, reset } => {
            let code = match &outcome {
                SubmissionOutcome::Success(message) => {
                    println!("{message}");
                    ExitCode::SUCCESS
                }
                SubmissionOutcome::Failure(message) => {
                    eprintln!("{message}");
                    ExitCode::FAILURE
                }
                SubmissionOutcome::Idle => ExitCode::SUCCESS,
            };
            if cli.wait_reset {
                reset.run().await?;
            } else {
                drop(reset);
            }
            Ok(code)
        }
    }
}
