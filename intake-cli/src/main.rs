//! intake - client intake questionnaire in the terminal
//!
//! Collects personal details and the wealth questionnaire step by step,
//! submits the answers to the questionnaire API once the respondent reaches
//! the end, and prints the returned profile.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use intake::wealth::{advisor_notes_id, wealth_catalog};
use intake::{
    Catalog, ExportBundle, Intake, IntakeFrontend, NormalizationPolicy, Session,
    SubmissionPipeline, restore_answers,
};
use intake_http::{API_URL_ENV, ApiConfig, DOCS_URL_ENV, HttpTransport};
use intake_wizard_dialoguer::{DialoguerWizard, WizardError};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

/// Command-line arguments for intake
#[derive(Parser, Debug)]
#[command(name = "intake")]
#[command(about = "Client intake questionnaire for wealth management")]
#[command(version)]
struct Args {
    /// Base URL of the questionnaire API
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// API documentation URL named in error messages (defaults to <api-url>/docs)
    #[arg(long, env = DOCS_URL_ENV)]
    docs_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Answer contract expected by the backend (other-extraction or enumerated-remap)
    #[arg(long, default_value_t = NormalizationPolicy::default())]
    contract: NormalizationPolicy,

    /// Write a JSON export of each submitted intake into this directory
    #[arg(long, value_name = "DIR")]
    export_json: Option<PathBuf>,

    /// Start from an earlier JSON export instead of blank answers
    #[arg(long, value_name = "FILE")]
    resume: Option<PathBuf>,

    /// Disable colored prompts
    #[arg(long)]
    plain: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the prompts.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::new(args.api_url.as_deref(), args.docs_url.as_deref())?;
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let transport = HttpTransport::new(&config)?;

    let catalog = wealth_catalog().context("Failed to build the questionnaire")?;
    let normalizer = args.contract.build(&catalog, Some(&advisor_notes_id()));
    let pipeline = SubmissionPipeline::new(transport, normalizer, config.docs_url.clone());
    info!(
        url = pipeline.transport().submit_url(),
        normalizer = pipeline.normalizer_name(),
        "Starting intake v{}",
        env!("CARGO_PKG_VERSION")
    );

    let intake = match args.resume.as_deref() {
        Some(path) => resume(catalog, path)?,
        None => Intake::new(catalog),
    };
    let mut session = Session::new(intake, pipeline);

    let wizard = if args.plain {
        DialoguerWizard::plain()
    } else {
        DialoguerWizard::new()
    };

    let result = run(&mut session, &wizard, args.export_json.as_deref()).await;
    if let Err(err) = &result
        && let Some(WizardError::Cancelled) = err.downcast_ref::<WizardError>()
    {
        println!("Intake cancelled.");
        if session.intake().has_unsubmitted_changes() {
            println!("Your answers were not submitted.");
        }
        return Ok(());
    }
    result
}

fn resume(catalog: Catalog, path: &Path) -> Result<Intake> {
    let bundle = ExportBundle::read_from(path)?;
    let answers = restore_answers(&catalog, &bundle.questionnaire);
    info!(path = %path.display(), answers = answers.len(), "Resuming from export");
    Ok(Intake::resume(catalog, bundle.user, answers))
}

async fn run(
    session: &mut Session<HttpTransport>,
    wizard: &DialoguerWizard,
    export_dir: Option<&Path>,
) -> Result<()> {
    loop {
        wizard.fill(session.intake_mut())?;

        let mut outcome = match session.auto_submit().await {
            Some(outcome) => outcome,
            None => session.outcome(),
        };

        while let Some(failure) = outcome.failure().cloned() {
            if failure.is_duplicate_conflict {
                let current = session
                    .intake()
                    .user_info()
                    .map(|user| user.email.clone())
                    .unwrap_or_default();
                let Some(email) = wizard.ask_new_email(&current, &failure)? else {
                    break;
                };
                if let Err(err) = session.correct_email(&email) {
                    println!("Error: {err}");
                    continue;
                }
            } else if !wizard.confirm_retry(&failure)? {
                break;
            }
            outcome = session.retry().await?;
        }

        if outcome.is_succeeded() {
            println!();
            match outcome.receipt() {
                Some(receipt) => report::print_receipt(receipt),
                None => println!("Your answers were submitted."),
            }
            report::print_answers(session.intake().catalog(), &session.answer_summary());

            if let Some(dir) = export_dir
                && let Some(bundle) = session.export()
            {
                match bundle.write_to_dir(dir, chrono::Utc::now()) {
                    Ok(path) => println!("\nExported to {}", path.display()),
                    Err(err) => warn!("Export failed: {err}"),
                }
            }
        }

        if !wizard.confirm_restart()? {
            return Ok(());
        }
        let step = session.restart().step();
        info!(?step, "Starting a new intake");
    }
}
