//! slirc-replay - feed a captured IRC session through the protocol pipeline.
//!
//! Usage: `slirc-replay <config.toml> < capture.log`
//!
//! Each stdin line is treated as a line received from the server. Events
//! are logged by a dispatcher task, and the lines the session would have
//! sent are logged as they are queued.

use std::process::ExitCode;

use slirc_bot::config::validate;
use slirc_bot::{BotConfig, Event, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slirc-bot.toml".to_string());

    let config = BotConfig::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(nick = %config.nick, caps = config.caps.len(), "starting replay");

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let dispatcher = tokio::spawn(async move {
        let mut count = 0u64;
        while let Some(event) = rx.recv().await {
            count += 1;
            info!(kind = event.name(), channel = event.channel(), "{event:?}");
        }
        count
    });

    let mut session = Session::new(config);
    for line in session.start() {
        info!(%line, "-> send");
    }

    let mut tx = tx;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status = ExitCode::SUCCESS;
    while let Some(line) = lines.next_line().await? {
        if let Err(e) = session.process_line_into(&line, &mut tx) {
            error!(error = %e, code = e.error_code(), "handshake failed");
            status = ExitCode::FAILURE;
            break;
        }
        for out in session.take_outgoing() {
            info!(line = %out, "-> send");
        }
    }

    drop(tx);
    let events = dispatcher.await?;
    for (command, seen) in session.router().command_stats() {
        info!(command = %command, seen, "command stats");
    }
    info!(
        events,
        users = session.registry().user_count(),
        channels = session.registry().channel_count(),
        "replay finished"
    );
    Ok(status)
}
