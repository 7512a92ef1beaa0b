use std::{env, error::Error, fs, path::Path};

use serde::Deserialize;

#[derive(Deserialize)]
struct RawConfig {
    identity_url: String,
    ingestion_url: String,
    datapoint_url: Option<String>,
    client_id: String,
    client_secret: String,
    owner_email: String,
    authorization_prefix: Option<String>,
    co2_range: [u32; 2],
    max_compensation: f64,
    max_airflow: f64,
    measurement_interval_seconds: u64,
    http_timeout_seconds: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if toml changes
    println!("cargo:rerun-if-changed=cfg.toml");

    // Read and parse
    let toml_str = fs::read_to_string("cfg.toml")?;
    let raw: RawConfig = toml::from_str(&toml_str)?;

    let [co2_min, co2_max] = raw.co2_range;
    if co2_min > co2_max {
        return Err(format!("co2_range [{co2_min}, {co2_max}] is inverted").into());
    }

    // Readback hits the ingestion collection unless told otherwise
    let datapoint_url = raw
        .datapoint_url
        .unwrap_or_else(|| raw.ingestion_url.clone());

    // Generate Rust code
    let code = format!(
        r#"
        pub const CONFIG: Config = Config {{
            identity_url: {iu:?},
            ingestion_url: {gu:?},
            datapoint_url: {du:?},
            client_id: {cid:?},
            client_secret: {cs:?},
            owner_email: {oe:?},
            authorization_prefix: {ap:?},
            co2_range: ({lo}, {hi}),
            max_compensation: {mc:?},
            max_airflow: {ma:?},
            measurement_interval_seconds: {intv},
            http_timeout_seconds: {to:?},
        }};
    "#,
        iu = raw.identity_url,
        gu = raw.ingestion_url,
        du = datapoint_url,
        cid = raw.client_id,
        cs = raw.client_secret,
        oe = raw.owner_email,
        ap = raw.authorization_prefix.as_deref().unwrap_or("Bearer"),
        lo = co2_min,
        hi = co2_max,
        mc = raw.max_compensation,
        ma = raw.max_airflow,
        intv = raw.measurement_interval_seconds,
        to = raw.http_timeout_seconds,
    );

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    fs::write(dest_path, code)?;
    Ok(())
}
