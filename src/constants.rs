/// Current feed version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CO2 density at 10 degrees Celsius, in g/mL
pub const CO2_DENSITY_10C: f64 = 0.001881;
/// CO2 density at 40 degrees Celsius, in g/mL
pub const CO2_DENSITY_40C: f64 = 0.001697;

/// Hour of day where ventilation activity peaks
pub const PEAK_HOUR: f64 = 12.0;
/// Exponent coefficient of the daily bell curve
pub const BELL_WIDTH: f64 = -0.2;

/// Status the ingestion service answers when a datapoint is stored
pub const STATUS_OK: u16 = 200;
