use serde::Serialize;

pub mod simulator;

pub use simulator::RoomSimulator;

use crate::config::Config;
use simulator::{bell, density};

/// One synthetic sample of the room ventilation, as stored by the ingestion service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Minutes since the Unix epoch
    pub timestamp: f64,
    /// CO2 mass concentration at the intake, g/m3
    pub intake: f64,
    /// CO2 mass concentration at the outlet, g/m3
    pub outlet: f64,
    /// Ventilation flow, m3/min
    pub airflow: f64,
    #[serde(rename = "@parties")]
    pub parties: Parties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parties {
    pub owner: Party,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Party {
    pub claims: Claims,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claims {
    pub email: Vec<&'static str>,
}

impl Parties {
    pub fn owned_by(email: &'static str) -> Self {
        Self {
            owner: Party {
                claims: Claims { email: vec![email] },
            },
        }
    }
}

impl Reading {
    /// Builds a reading for phase `h` (fractional hour of day) and one
    /// environmental CO2 draw in ppm.
    pub fn compose(config: &Config, timestamp: f64, h: f64, environmental_co2: u32) -> Self {
        let density = density(h);
        let peak = bell(h);
        let co2 = f64::from(environmental_co2);

        Self {
            timestamp,
            intake: density * co2,
            outlet: density * (co2 - config.max_compensation * peak),
            airflow: config.max_airflow * peak,
            parties: Parties::owned_by(config.owner_email),
        }
    }
}

pub trait Sensor {
    fn measure(&mut self) -> Reading;
}
