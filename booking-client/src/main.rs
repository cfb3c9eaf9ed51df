use std::process::ExitCode;

use booking_client::api::{ApiClient, ClientConfig};
use booking_client::cache::{CacheConfig, CachedBookingApi};
use booking_client::driver::Driver;
use booking_client::notify::Severity;
use booking_client::session::{Event, SearchForm, Session, Timing};
use tracing::{error, info};

const USAGE: &str = "usage: booking-client [ORIGIN DESTINATION [MAX_FARE]]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("booking_client=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let search = match args.as_slice() {
        [] => None,
        [origin, destination] => Some(SearchForm::new(origin, destination)),
        [origin, destination, max_fare] => {
            Some(SearchForm::new(origin, destination).with_max_fare(max_fare))
        }
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let config = ClientConfig::from_env();
    info!(base_url = %config.base_url, "connecting to booking service");
    let timeout = config.timeout();
    let client = match ApiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let api = CachedBookingApi::new(client, &CacheConfig::default());

    let session = Session::starting_today(Timing::from_env());
    let mut driver = Driver::new(api, session).with_request_timeout(timeout);

    driver.dispatch(Event::Start);
    driver.settle().await;

    let reference = driver.session().reference();
    if reference.districts().is_empty() {
        error!("no districts loaded; is the booking service running?");
        return ExitCode::FAILURE;
    }
    info!(
        districts = reference.districts().len(),
        providers = reference.carriers().len(),
        "reference data ready"
    );

    if let Some(form) = search {
        driver.dispatch(Event::Search(form));
        driver.settle().await;

        let results = driver.session().search().results();
        if let Some(summary) = results.summary() {
            println!("{summary}");
        }
        for offer in results.offers() {
            println!(
                "{:<20} {:<30} {:>8}  seats {:>4}  rating {}",
                offer.provider,
                offer.route_label(),
                offer.fare.to_string(),
                offer.seats_label(),
                offer.rating_label(),
            );
        }
    }

    let failed = driver
        .session()
        .notifications()
        .visible()
        .filter(|n| n.severity == Severity::Error)
        .inspect(|n| error!(message = %n.message, "request failed"))
        .count();
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
