use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use rand::rngs::StdRng;

pub mod config;
pub mod constants;
mod http;
pub mod sensors;
mod transmitter;

use config::CONFIG;
use constants::VERSION;
use http::{HttpIdentity, HttpIngestion};
use sensors::RoomSimulator;
use transmitter::Transmitter;

type Feed = Transmitter<RoomSimulator<StdRng>, HttpIdentity, HttpIngestion>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "CO2 room feed {} posting to {} every {}s",
        VERSION,
        CONFIG.ingestion_url,
        CONFIG.measurement_interval_seconds
    );

    let transmitter = Transmitter::new(
        RoomSimulator::new(&CONFIG),
        HttpIdentity::new(&CONFIG),
        HttpIngestion::new(&CONFIG),
    );

    if let Err(e) = spawner.spawn(main_task(transmitter)) {
        log::error!("Failed to spawn feed task: {:?}", e);
        std::process::exit(1);
    }
}

#[embassy_executor::task]
async fn main_task(mut transmitter: Feed) {
    loop {
        // A failed cycle is dropped, the next one starts after the usual interval
        if let Err(e) = transmitter.post_cycle() {
            log::error!("Post cycle error: {:?}", e);
        }

        if cfg!(feature = "readback") {
            match transmitter.readback() {
                Ok(datapoints) => log::debug!("Stored datapoints: {}", datapoints),
                Err(e) => log::error!("Readback error: {:?}", e),
            }
        }

        Timer::after(Duration::from_secs(CONFIG.measurement_interval_seconds)).await;
    }
}
