//! Boat booking session

use boat_bookings::{config::AppConfig, errors::AppError, seed::Seed, session::Session};
use tokio::{
    io::{self, BufReader},
    signal,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    #[cfg(feature = "dotenvy")]
    dotenvy::dotenv().ok();

    // Log to stderr, stdout carries the responses
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let store = Seed::load(config.seed.path.as_deref())?.into_store();
    let mut session = Session::new(store, config.calendar.slot_length()?);

    let shutdown_signal = signal::ctrl_c();

    tokio::select! {
        result = session.run(BufReader::new(io::stdin()), io::stdout()) => {
            info!("Session completed: {:?}", result);
            result?;
        }
        _ = shutdown_signal => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}
