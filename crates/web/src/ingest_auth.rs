//! Typed `X-Ingest-Token` header gating the static-refresh and
//! reliability-seed triggers. Modeled on `headers::Authorization`: a thin
//! wrapper implementing `headers::Header` so the value can be pulled out
//! via `axum_extra::TypedHeader` like any built-in header.

use std::sync::OnceLock;

use axum::http::{HeaderName, HeaderValue};
use headers::{Error, Header};

fn header_name() -> &'static HeaderName {
    static NAME: OnceLock<HeaderName> = OnceLock::new();
    NAME.get_or_init(|| HeaderName::from_static("x-ingest-token"))
}

#[derive(Debug, Clone)]
pub struct IngestToken(pub String);

impl Header for IngestToken {
    fn name() -> &'static HeaderName {
        header_name()
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(Error::invalid)?;
        let token = value.to_str().map_err(|_| Error::invalid())?;
        Ok(Self(token.to_owned()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            values.extend(std::iter::once(value));
        }
    }
}

/// Compares the supplied header against `INGEST_TOKEN`. Missing or empty
/// `INGEST_TOKEN` closes the gate entirely rather than leaving ingestion
/// open in a misconfigured deployment.
pub fn is_authorized(token: &Option<IngestToken>) -> bool {
    let Ok(expected) = std::env::var("INGEST_TOKEN") else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }
    token.as_ref().is_some_and(|provided| provided.0 == expected)
}
