//! Remote and in-memory GeoJSON feeds

use crate::{
    core::constants::USER_AGENT,
    data::geojson::GeoJson,
    MapError, Result,
};
use async_trait::async_trait;
use std::time::Duration;

/// Something that can produce a GeoJSON document on demand
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<GeoJson>;
}

/// Fetches a GeoJSON document over HTTP(S). One request per call, no retries.
pub struct HttpFeedSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            name: name.into(),
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<GeoJson> {
        log::debug!("GET {}", self.url);
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        log::debug!("{}: received {} bytes", self.name, body.len());
        GeoJson::parse(&body)
    }
}

/// Serves a fixed body; parsing happens on every fetch
pub struct StaticFeedSource {
    name: String,
    body: String,
}

impl StaticFeedSource {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    pub fn from_file(name: impl Into<String>, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let body = std::fs::read_to_string(path)?;
        Ok(Self::new(name, body))
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<GeoJson> {
        GeoJson::parse(&self.body)
    }
}

/// Always fails; stands in for an unreachable endpoint
pub struct FailingFeedSource {
    name: String,
    reason: String,
}

impl FailingFeedSource {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl FeedSource for FailingFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<GeoJson> {
        Err(MapError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            self.reason.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_feed_parses_on_fetch() {
        let source = StaticFeedSource::new(
            "quakes",
            r#"{"type": "FeatureCollection", "features": []}"#,
        );
        assert_eq!(source.name(), "quakes");
        assert!(source.fetch().await.unwrap().is_empty());

        let broken = StaticFeedSource::new("broken", "{");
        assert!(matches!(broken.fetch().await, Err(MapError::Parse(_))));
    }

    #[tokio::test]
    async fn test_failing_feed() {
        let source = FailingFeedSource::new("plates", "connection refused");
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_http_source_builds() {
        let source = HttpFeedSource::new(
            "quakes",
            "http://127.0.0.1:9/all_week.geojson",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/all_week.geojson");
    }
}
