use anyhow::{anyhow, ensure, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::filter::FilterCriteria;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues GET requests and hands back the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &Url) -> FetchResult<Value>;
}

/// Decode a GET response into `T`. Shape mismatches are decode failures.
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &Url,
) -> FetchResult<T> {
    let value = transport.get_json(url).await?;
    serde_json::from_value(value).map_err(|e| FetchError::decode(url.as_str(), e.to_string()))
}

/// reqwest-backed transport. Every request is bounded by the client timeout.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

fn classify(url: &Url, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::timeout(url.as_str())
    } else if err.is_decode() {
        FetchError::decode(url.as_str(), err.to_string())
    } else {
        FetchError::network(url.as_str(), err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &Url) -> FetchResult<Value> {
        debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Request failed with non-success status");
            return Err(FetchError::http(url.as_str(), status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| classify(url, e))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::decode(url.as_str(), e.to_string()))
    }
}

/// A REST collection such as `https://pokeapi.co/api/v2` + `pokemon`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
    resource: String,
}

impl Endpoint {
    pub fn new(base_url: &str, resource: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| anyhow!("Invalid base URL {:?}: {}", base_url, e))?;
        ensure!(
            !base.cannot_be_a_base(),
            "Base URL {:?} cannot carry a path",
            base_url
        );
        ensure!(!resource.is_empty(), "Resource name must not be empty");

        Ok(Self {
            base,
            resource: resource.trim_matches('/').to_string(),
        })
    }

    fn with_segments(&self, extra: Option<&str>) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.resource);
            if let Some(extra) = extra {
                segments.push(extra);
            }
        }
        url
    }

    /// `<base>/<resource>`
    pub fn collection_url(&self) -> Url {
        self.with_segments(None)
    }

    /// `<base>/<resource>/{id}`
    pub fn item_url(&self, id: u32) -> Url {
        self.with_segments(Some(&id.to_string()))
    }

    /// `<base>/<resource>?page=N[&name=..][&status=..][&species=..]`
    pub fn page_url(&self, page: u32, criteria: &FilterCriteria) -> Url {
        let mut url = self.collection_url();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            for (key, value) in criteria.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CharacterStatus;

    #[test]
    fn test_item_url() {
        let endpoint = Endpoint::new("https://pokeapi.co/api/v2", "pokemon").unwrap();
        assert_eq!(
            endpoint.item_url(25).as_str(),
            "https://pokeapi.co/api/v2/pokemon/25"
        );

        let endpoint = Endpoint::new("https://pokeapi.co/api/v2/", "/pokemon/").unwrap();
        assert_eq!(
            endpoint.item_url(1).as_str(),
            "https://pokeapi.co/api/v2/pokemon/1"
        );
    }

    #[test]
    fn test_page_url_omits_empty_filters() {
        let endpoint = Endpoint::new("https://rickandmortyapi.com/api", "character").unwrap();
        let criteria = FilterCriteria {
            name: String::new(),
            status: Some(CharacterStatus::Alive),
            species: String::new(),
        };

        let url = endpoint.page_url(1, &criteria);
        assert_eq!(
            url.as_str(),
            "https://rickandmortyapi.com/api/character?page=1&status=alive"
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(!pairs.iter().any(|(k, _)| k == "name" || k == "species"));
    }

    #[test]
    fn test_page_url_encodes_name() {
        let endpoint = Endpoint::new("https://rickandmortyapi.com/api", "character").unwrap();
        let criteria = FilterCriteria::new().with_name("rick sanchez").with_species("Human");
        let pairs: Vec<(String, String)> = endpoint
            .page_url(3, &criteria)
            .query_pairs()
            .into_owned()
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "3".to_string()),
                ("name".to_string(), "rick sanchez".to_string()),
                ("species".to_string(), "Human".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(Endpoint::new("not a url", "pokemon").is_err());
        assert!(Endpoint::new("mailto:ash@example.com", "pokemon").is_err());
        assert!(Endpoint::new("https://pokeapi.co", "").is_err());
    }
}
