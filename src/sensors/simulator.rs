use chrono::{DateTime, Local, TimeZone, Timelike};
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{Reading, Sensor};
use crate::config::Config;
use crate::constants::{BELL_WIDTH, CO2_DENSITY_10C, CO2_DENSITY_40C, PEAK_HOUR};

/// Daily activity curve, 1.0 at noon and close to 0.0 around midnight.
pub fn bell(h: f64) -> f64 {
    (BELL_WIDTH * (h - PEAK_HOUR).powi(2)).exp()
}

/// CO2 density in g/mL, sliding from the 10°C value at night to the 40°C
/// value at noon.
pub fn density(h: f64) -> f64 {
    CO2_DENSITY_10C - (CO2_DENSITY_10C - CO2_DENSITY_40C) * bell(h)
}

/// Fractional hour of day, in `[0, 24)`.
pub fn phase<Tz: TimeZone>(time: &DateTime<Tz>) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}

pub fn epoch_minutes<Tz: TimeZone>(time: &DateTime<Tz>) -> f64 {
    time.timestamp_millis() as f64 / 60_000.0
}

/// Simulated room: wall clock plus one random environmental CO2 draw per sample.
pub struct RoomSimulator<R> {
    config: Config,
    rng: R,
}

impl RoomSimulator<StdRng> {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> RoomSimulator<R> {
    pub fn with_rng(config: &Config, rng: R) -> Self {
        Self {
            config: *config,
            rng,
        }
    }

    /// Environmental CO2 in ppm, uniform over the configured inclusive range.
    pub fn environmental_co2(&mut self) -> u32 {
        let (lo, hi) = self.config.co2_range;
        self.rng.gen_range(lo..=hi)
    }

    pub fn sample_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Reading {
        let co2 = self.environmental_co2();
        let h = phase(now);
        debug!("Sampling room at h={:.3} with {} ppm", h, co2);
        Reading::compose(&self.config, epoch_minutes(now), h, co2)
    }
}

impl<R: Rng> Sensor for RoomSimulator<R> {
    fn measure(&mut self) -> Reading {
        self.sample_at(&Local::now())
    }
}
