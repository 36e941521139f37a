//! `crmdesk` - command-line admin panel
//!
//! Lists contacts and quote requests with free-text search and status
//! badges, and sends newsletter campaigns through a simulated transport.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod render;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use crmdesk_core::{
    CancelToken, DispatchController, EntitySnapshot, SimulatedTransport, SubmitOutcome, filter,
};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use settings::{Settings, default_settings_path, load_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().or_else(default_settings_path);
    let settings = match &settings_path {
        Some(path) => load_settings(path).await.map_err(anyhow::Error::msg)?,
        None => Settings::default(),
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Settings loaded from {:?}", settings_path);

    match cli.command {
        Command::Contacts { query } => {
            let snapshot = load_snapshot(cli.data.as_ref(), &settings).await?;
            let rows = filter(&snapshot.contacts, &query);
            print!("{}", render::contacts(&rows, snapshot.contacts.len()));
        }
        Command::Quotes { query } => {
            let snapshot = load_snapshot(cli.data.as_ref(), &settings).await?;
            let rows = filter(&snapshot.quotes, &query);
            print!("{}", render::quotes(&rows, snapshot.quotes.len()));
        }
        Command::Audiences => {
            print!("{}", render::audiences(settings.audiences.audiences()));
        }
        Command::Send {
            subject,
            content,
            audience,
        } => send(&settings, subject, content, audience).await?,
    }

    Ok(())
}

/// Reads the entity snapshot, or an empty one if no source is configured.
async fn load_snapshot(
    data: Option<&PathBuf>,
    settings: &Settings,
) -> anyhow::Result<EntitySnapshot> {
    match data.or(settings.data_path.as_ref()) {
        Some(path) => EntitySnapshot::load(path)
            .await
            .with_context(|| format!("Failed to load entities from {}", path.display())),
        None => {
            info!("No entity source configured; pass --data or set data_path");
            Ok(EntitySnapshot::default())
        }
    }
}

/// Runs one compose session: fill the draft, submit, report.
async fn send(
    settings: &Settings,
    subject: String,
    content: String,
    audience: Option<String>,
) -> anyhow::Result<()> {
    let policy = settings
        .retry
        .to_policy()
        .context("Invalid retry settings")?;
    let transport = Arc::new(SimulatedTransport::new(settings.simulated_latency()));
    let (notices_tx, mut notices) = mpsc::unbounded_channel();

    let controller = DispatchController::new(settings.audiences.clone(), transport)
        .with_notifier(Arc::new(notices_tx))
        .with_retry_policy(policy);

    controller.set_subject(subject)?;
    controller.set_content(content)?;
    controller.select_audience(audience.as_deref())?;
    println!(
        "{}",
        render::reach(&controller.draft(), controller.selected_audience().as_ref())
    );

    // Ctrl+C abandons the session.
    let cancel = CancelToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling send");
                cancel.cancel();
            }
        })
    };

    let outcome = controller.submit(&cancel).await;
    interrupt.abort();

    while let Ok(notice) = notices.try_recv() {
        println!("{}", render::notice(&notice));
    }

    match outcome {
        SubmitOutcome::Delivered(count) => {
            info!("Campaign delivered to {count} recipients");
            Ok(())
        }
        SubmitOutcome::Failed(failure) => bail!(failure),
        SubmitOutcome::Ignored => bail!("A campaign is already being sent"),
    }
}
