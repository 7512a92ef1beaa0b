use log::{info, warn};

use crate::constants::STATUS_OK;
use crate::http;
use crate::sensors::{Reading, Sensor};

/// Issues bearer tokens for the ingestion service.
pub trait Identity {
    fn token(&mut self) -> Result<String, http::Error>;
}

/// Stores datapoints. Rejections come back as status codes, only transport
/// failures are errors.
pub trait Ingestion {
    fn submit(&mut self, reading: &Reading, token: &str) -> Result<u16, http::Error>;

    fn datapoints(&mut self, token: &str) -> Result<serde_json::Value, http::Error>;
}

#[derive(Debug)]
pub enum Error {
    #[allow(dead_code)]
    Token(http::Error),
    #[allow(dead_code)]
    Submit(http::Error),
    #[allow(dead_code)]
    Readback(http::Error),
}

pub struct Transmitter<S, I, G> {
    sensor: S,
    identity: I,
    ingestion: G,
}

impl<S, I, G> Transmitter<S, I, G>
where
    S: Sensor,
    I: Identity,
    G: Ingestion,
{
    pub fn new(sensor: S, identity: I, ingestion: G) -> Self {
        Self {
            sensor,
            identity,
            ingestion,
        }
    }

    /// Samples one reading and delivers it, submitting the same reading a
    /// second time when the first attempt is not answered with 200. The
    /// outcome of the second attempt is reported but not acted upon.
    pub fn post_cycle(&mut self) -> Result<u16, Error> {
        let reading = self.sensor.measure();
        log::debug!("Reading sampled: {:?}", reading);

        let token = self.identity.token().map_err(Error::Token)?;

        let mut status = self
            .ingestion
            .submit(&reading, &token)
            .map_err(Error::Submit)?;

        if status != STATUS_OK {
            warn!("Datapoint rejected with status {}, retrying once", status);
            status = self
                .ingestion
                .submit(&reading, &token)
                .map_err(Error::Submit)?;
        }

        info!("Datapoint submitted, status {}", status);
        Ok(status)
    }

    /// Fetches the datapoints stored so far with a fresh token.
    pub fn readback(&mut self) -> Result<serde_json::Value, Error> {
        let token = self.identity.token().map_err(Error::Token)?;
        self.ingestion
            .datapoints(&token)
            .map_err(Error::Readback)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use serde_json::json;

    use super::*;
    use crate::config::CONFIG;

    struct NoonRoom {
        samples: usize,
    }

    impl Sensor for NoonRoom {
        fn measure(&mut self) -> Reading {
            self.samples += 1;
            Reading::compose(&CONFIG, 28_000_000.0 + self.samples as f64, 12.0, 1000)
        }
    }

    struct StaticIdentity {
        token: Option<&'static str>,
        issued: usize,
    }

    impl Identity for StaticIdentity {
        fn token(&mut self) -> Result<String, http::Error> {
            self.issued += 1;
            self.token
                .map(str::to_owned)
                .ok_or(http::Error::MissingAccessToken)
        }
    }

    /// Answers each submit with the next scripted outcome, `None` meaning a
    /// transport failure.
    struct ScriptedIngestion {
        outcomes: VecDeque<Option<u16>>,
        submitted: Vec<(Reading, String)>,
    }

    impl Ingestion for ScriptedIngestion {
        fn submit(&mut self, reading: &Reading, token: &str) -> Result<u16, http::Error> {
            self.submitted.push((reading.clone(), token.to_owned()));
            match self.outcomes.pop_front().flatten() {
                Some(status) => Ok(status),
                None => Err(http::Error::Io(io::ErrorKind::ConnectionRefused.into())),
            }
        }

        fn datapoints(&mut self, token: &str) -> Result<serde_json::Value, http::Error> {
            Ok(json!({ "token": token, "items": self.submitted.len() }))
        }
    }

    fn transmitter(
        token: Option<&'static str>,
        outcomes: &[Option<u16>],
    ) -> Transmitter<NoonRoom, StaticIdentity, ScriptedIngestion> {
        Transmitter::new(
            NoonRoom { samples: 0 },
            StaticIdentity { token, issued: 0 },
            ScriptedIngestion {
                outcomes: outcomes.iter().copied().collect(),
                submitted: Vec::new(),
            },
        )
    }

    #[test]
    fn accepted_first_time_submits_once() {
        let mut feed = transmitter(Some("abc123"), &[Some(200)]);

        assert_eq!(feed.post_cycle().unwrap(), 200);
        assert_eq!(feed.ingestion.submitted.len(), 1);
        assert_eq!(feed.ingestion.submitted[0].1, "abc123");
        assert_eq!(feed.sensor.samples, 1);
        assert_eq!(feed.identity.issued, 1);
    }

    #[test]
    fn rejection_is_retried_exactly_once() {
        let mut feed = transmitter(Some("abc123"), &[Some(500), Some(200)]);

        assert_eq!(feed.post_cycle().unwrap(), 200);
        assert_eq!(feed.ingestion.submitted.len(), 2);

        // same reading, same token, one sample, one token
        let (first, second) = (&feed.ingestion.submitted[0], &feed.ingestion.submitted[1]);
        assert_eq!(first, second);
        assert_eq!(feed.sensor.samples, 1);
        assert_eq!(feed.identity.issued, 1);
    }

    #[test]
    fn second_rejection_is_absorbed() {
        let mut feed = transmitter(Some("abc123"), &[Some(500), Some(503), Some(200)]);

        assert_eq!(feed.post_cycle().unwrap(), 503);
        assert_eq!(feed.ingestion.submitted.len(), 2);
    }

    #[test]
    fn non_200_success_codes_are_retried() {
        let mut feed = transmitter(Some("abc123"), &[Some(201), Some(201)]);

        assert_eq!(feed.post_cycle().unwrap(), 201);
        assert_eq!(feed.ingestion.submitted.len(), 2);
    }

    #[test]
    fn token_failure_ends_the_cycle_before_submitting() {
        let mut feed = transmitter(None, &[Some(200)]);

        assert!(matches!(
            feed.post_cycle(),
            Err(Error::Token(http::Error::MissingAccessToken))
        ));
        assert!(feed.ingestion.submitted.is_empty());
        assert_eq!(feed.sensor.samples, 1);
    }

    #[test]
    fn transport_failure_is_not_retried() {
        let mut feed = transmitter(Some("abc123"), &[None, Some(200)]);

        assert!(matches!(feed.post_cycle(), Err(Error::Submit(_))));
        assert_eq!(feed.ingestion.submitted.len(), 1);
    }

    #[test]
    fn transport_failure_on_retry_propagates() {
        let mut feed = transmitter(Some("abc123"), &[Some(502), None]);

        assert!(matches!(feed.post_cycle(), Err(Error::Submit(_))));
        assert_eq!(feed.ingestion.submitted.len(), 2);
    }

    #[test]
    fn every_cycle_samples_a_fresh_reading() {
        let mut feed = transmitter(Some("abc123"), &[Some(200), Some(200)]);

        feed.post_cycle().unwrap();
        feed.post_cycle().unwrap();

        let submitted = &feed.ingestion.submitted;
        assert_eq!(submitted.len(), 2);
        assert_ne!(submitted[0].0.timestamp, submitted[1].0.timestamp);
        assert_eq!(feed.identity.issued, 2);
    }

    #[test]
    fn readback_uses_a_fresh_token() {
        let mut feed = transmitter(Some("abc123"), &[Some(200)]);
        feed.post_cycle().unwrap();

        let listing = feed.readback().unwrap();
        assert_eq!(listing, json!({ "token": "abc123", "items": 1 }));
        assert_eq!(feed.identity.issued, 2);
    }
}
