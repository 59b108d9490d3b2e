mod config;
mod context;
mod error;
mod gitlab;
mod http;
mod logger;
mod pull_request;
mod report;
mod slack;
mod template;

use anyhow::{Context, Result};
use config::Config;
use context::RunContext;
use gitlab::GitlabClient;
use report::Report;
use slack::SlackNotifier;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Cannot load config")?;
    logger::init(config.log_level)?;

    log::info!("Starting");
    let gitlab = GitlabClient::new(&config.gitlab.base_url, config.gitlab.bearer)
        .context("Cannot create the gitlab client")?;
    let slack = SlackNotifier::new(&config.slack.base_url, config.slack.bearer)
        .context("Cannot create the slack notifier")?;
    let report = Report::new(gitlab, slack, &config.report_template, config.notifiers)
        .context("Cannot prepare the report")?;

    let token = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown(token.clone()));

    let mut ctx = RunContext::new(token);
    if let Some(run_timeout) = config.run_timeout {
        ctx = ctx.with_deadline(Instant::now() + run_timeout);
    }

    let summary = report.run(&ctx).await;

    log::info!(
        "Done: {} projects fetched, {} failed; {} channels notified, {} failed, {} skipped",
        summary.fetched_projects.len(),
        summary.failed_projects.len(),
        summary.delivered_channels.len(),
        summary.failed_channels.len(),
        summary.skipped_channels.len(),
    );

    Ok(())
}

async fn cancel_on_shutdown(token: CancellationToken) {
    if let Err(err) = shutdown_signal().await {
        log::warn!("cannot listen for shutdown signals: {}", err);
        return;
    }

    log::warn!("Shutdown requested, cancelling");
    token.cancel();
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
