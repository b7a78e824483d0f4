use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;

use housing_estimator::config::Settings;
use housing_estimator::domain::RequestStatus;
use housing_estimator::lifecycle::FeedbackOutcome;
use housing_estimator::presenter::{notification_text, status_label, ResultView};
use housing_estimator::{logging, EstimateController, PredictionClient};

#[derive(Parser, Debug)]
#[command(name = "housing-estimator", version, about = "Estimate a property's price")]
struct Cli {
    /// Form field to set, e.g. `--set area=85 --set furnishingstatus=unfurnished`
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    fields: Vec<(String, String)>,

    /// Actual sold price to send as feedback once the estimate is ready
    #[arg(long)]
    sold_price: Option<String>,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{s}`"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        api_url = %settings.api_url,
        "Starting housing estimator"
    );

    let client = PredictionClient::new(&settings.api_url, settings.request_timeout_seconds)
        .context("Failed to create prediction client")?;
    let controller = EstimateController::new(Arc::new(client), settings.poll_policy());

    for (field, value) in &cli.fields {
        controller.set_field(field, value)?;
    }

    let mut status_rx = controller.subscribe();
    // The loop below only starts once the request has been accepted
    let mut last_printed = RequestStatus::Submitting;
    println!("{}", status_label(&last_printed));

    if let Err(e) = controller.submit().await {
        println!("{}", status_label(&controller.status()));
        return Err(e).context("Prediction request failed");
    }

    loop {
        let status = status_rx.borrow_and_update().clone();
        if status != last_printed {
            println!("{}", status_label(&status));
            last_printed = status.clone();
        }
        if !status.is_in_flight() {
            break;
        }
        if status_rx.changed().await.is_err() {
            break;
        }
    }

    let state = controller.snapshot();
    let result = match (&state.status, &state.result) {
        (RequestStatus::Completed, Some(result)) => result,
        (status, _) => bail!("Estimate did not complete (status {status})"),
    };
    println!("{}", ResultView::from(result));

    if let Some(price) = cli.sold_price {
        controller.open_feedback();
        controller.set_sold_price(price);
        let outcome = controller.submit_feedback().await;

        if let Some(notification) = controller.snapshot().notification {
            let text = notification_text(notification);
            println!("{}\n{}", text.title, text.message);
        }
        if outcome == FeedbackOutcome::Failed {
            bail!("Feedback was not delivered");
        }
    }

    Ok(())
}
