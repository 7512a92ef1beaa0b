#[derive(Debug, Clone, Copy)]
pub struct Config {
    // Token endpoint of the identity service (client-credentials grant)
    pub identity_url: &'static str,

    // Datapoint collection the readings are POSTed to
    pub ingestion_url: &'static str,

    // Datapoint collection read back when the `readback` feature is enabled
    pub datapoint_url: &'static str,

    // OAuth client id
    pub client_id: &'static str,

    // OAuth client secret
    pub client_secret: &'static str,

    // Email claimed as owner of every datapoint
    pub owner_email: &'static str,

    // Prepended as-is to the token in the Authorization header
    pub authorization_prefix: &'static str,

    // Inclusive bounds of the environmental CO2 draw, in ppm
    pub co2_range: (u32, u32),

    // CO2 removed by the ventilation at the midday peak, in ppm
    pub max_compensation: f64,

    // Airflow at the midday peak, in m3/min
    pub max_airflow: f64,

    // Delay between the end of a cycle and the start of the next
    pub measurement_interval_seconds: u64,

    // Per-request HTTP timeout (optional, unbounded when unset)
    pub http_timeout_seconds: Option<u64>,
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));
