use std::sync::Arc;

use time::{OffsetDateTime, UtcOffset};

use marketmood_core::{
    email_subject, render_report, score, FlowFetcher, HttpClient, MailConfig, MailMessage,
    MailTransport, MarketDataFetcher, MoodIndexFetcher, ReqwestHttpClient, SmtpMailer,
};

use crate::cli::{Cli, ReportArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli, args: &ReportArgs) -> Result<(), CliError> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let mood = MoodIndexFetcher::new(http.clone()).with_timeout_ms(cli.timeout_ms);
    let market = MarketDataFetcher::new(http.clone()).with_timeout_ms(cli.timeout_ms);
    let flow = FlowFetcher::new(http).with_timeout_ms(cli.timeout_ms);

    // The three sources have no interdependency; issue them together and
    // join before scoring.
    let (mmi, market_snapshot, flow_snapshot) =
        tokio::join!(mood.fetch(), market.fetch(), flow.fetch());

    let result = score(&mmi, &market_snapshot, &flow_snapshot);
    let now = local_now();
    let report = render_report(now, &mmi, &market_snapshot, &flow_snapshot, &result);

    // The report always reaches the console, whatever happens to delivery.
    println!("{report}");

    if args.email {
        let config_path = cli.config.clone().unwrap_or_else(MailConfig::default_path);
        let config = MailConfig::load(&config_path)?;
        let mailer = SmtpMailer::from_config(&config)?;
        let message = MailMessage::new(&config, email_subject(&result, now), report);

        mailer.send(&message).await?;
        println!("Report emailed to {}", config.receiver_emails.join(", "));
    }

    Ok(())
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
        .to_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}
