use std::io;
use std::time::Duration;

use log::{debug, error, info};
use serde::Deserialize;
use ureq::{Agent, AgentBuilder};

use crate::config::Config;
use crate::sensors::Reading;
use crate::transmitter::{Identity, Ingestion};

#[derive(Debug)]
pub enum Error {
    #[allow(dead_code)]
    Request(Box<ureq::Error>),
    #[allow(dead_code)]
    Status(u16),
    #[allow(dead_code)]
    Io(io::Error),
    #[allow(dead_code)]
    Encode(serde_json::Error),
    MissingAccessToken,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

fn agent(config: &Config) -> Agent {
    let mut builder = AgentBuilder::new();
    if let Some(timeout) = config.http_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout));
    }
    builder.build()
}

/// Client-credentials grant against the identity service token endpoint.
pub struct HttpIdentity {
    agent: Agent,
    url: &'static str,
    client_id: &'static str,
    client_secret: &'static str,
}

impl HttpIdentity {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: agent(config),
            url: config.identity_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
        }
    }
}

impl Identity for HttpIdentity {
    fn token(&mut self) -> Result<String, Error> {
        debug!("Requesting token for client {}", self.client_id);

        let response = self
            .agent
            .post(self.url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id),
                ("client_secret", self.client_secret),
            ])
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => {
                    error!("Token endpoint answered {}", code);
                    Error::Status(code)
                }
                e => Error::Request(Box::new(e)),
            })?;

        let body: TokenResponse = response.into_json().map_err(Error::Io)?;
        body.access_token.ok_or(Error::MissingAccessToken)
    }
}

/// Datapoint collection of the ingestion service.
pub struct HttpIngestion {
    agent: Agent,
    url: &'static str,
    datapoint_url: &'static str,
    authorization_prefix: &'static str,
}

impl HttpIngestion {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: agent(config),
            url: config.ingestion_url,
            datapoint_url: config.datapoint_url,
            authorization_prefix: config.authorization_prefix,
        }
    }

    fn authorization(&self, token: &str) -> String {
        // prefix and token are joined without a separator
        format!("{}{}", self.authorization_prefix, token)
    }
}

impl Ingestion for HttpIngestion {
    fn submit(&mut self, reading: &Reading, token: &str) -> Result<u16, Error> {
        let payload = serde_json::to_string(reading).map_err(Error::Encode)?;
        debug!("Formatted datapoint: {}", payload);

        let result = self
            .agent
            .post(self.url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .set("Authorization", &self.authorization(token))
            .send_string(&payload);

        match result {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, response)) => {
                info!("Ingestion answered {} {}", code, response.status_text());
                Ok(code)
            }
            Err(e) => Err(Error::Request(Box::new(e))),
        }
    }

    fn datapoints(&mut self, token: &str) -> Result<serde_json::Value, Error> {
        self.agent
            .get(self.datapoint_url)
            .set("Accept", "application/json")
            .set("Authorization", &self.authorization(token))
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => Error::Status(code),
                e => Error::Request(Box::new(e)),
            })?
            .into_json()
            .map_err(Error::Io)
    }
}
