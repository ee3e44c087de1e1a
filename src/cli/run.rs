use anyhow::Result;
use lunchline::config::Config;
use lunchline::notifier::{Notifier, Settings};
use lunchline_menu::{ReportMode, today_in};
use lunchline_notification::EmailService;
use lunchline_schoolcafe::SchoolCafeClient;
use time::Date;

#[tracing::instrument(skip(config))]
pub async fn notify(
    config: Config,
    mode: ReportMode,
    today: Option<Date>,
    dry_run: bool,
) -> Result<()> {
    if !dry_run {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
    }

    let today = today.unwrap_or_else(|| today_in(&config.report.timezone));
    tracing::info!(%today, "Starting menu notifier");

    let client = SchoolCafeClient::new(&config.api)?;
    let notifier = Notifier::new(Settings::from_config(&config), client);
    let report = notifier.prepare(mode, today).await?;

    if dry_run {
        tracing::info!("Dry run, printing report instead of sending");
        println!("Subject: {}\n", report.subject);
        println!("{report}");
        return Ok(());
    }

    let outbox = EmailService::new(&config.email)?;
    let outcome = notifier
        .deliver(&report, &outbox, &config.recipients())
        .await?;

    tracing::info!(
        sent = outcome.succeeded(),
        attempted = outcome.attempted(),
        "Menu notifier completed"
    );

    Ok(())
}
