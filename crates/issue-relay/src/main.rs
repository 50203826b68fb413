use std::process::ExitCode;

use gh_client::OctocrabClient;
use issue_relay_config::{Credentials, ScanConfig};
use slack_client::SlackClient;

mod cycle;
mod logger;
mod message;

use cycle::NotificationOutcome;

/// Exit status when a required credential is missing
const EXIT_CONFIG_ERROR: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logger::init();

    // Credentials are checked before any network call is made.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let config = ScanConfig::load();

    let tracker = match OctocrabClient::from_token(credentials.github_token.clone()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let notifier = SlackClient::new(credentials.slack_token.clone());

    log::info!("Checking for new '{}' issues...", config.label);

    match cycle::run_cycle(&tracker, &notifier, &config, &credentials.channel_id).await {
        Ok(report) => {
            log::info!(
                "Cycle complete: {} organizations, {} repositories ({} skipped), {} issues since {}",
                report.organizations_scanned,
                report.repositories_scanned,
                report.repositories_skipped,
                report.issue_urls.len(),
                report.since
            );
            if let NotificationOutcome::Failed(reason) = &report.notification {
                log::warn!("Notification was not delivered: {}", reason);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
