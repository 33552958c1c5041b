use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::Url;
use serde_json::Value;
use spacebot_contracts::media::{ImageResult, MISSING_FIELD};
use tracing::{debug, warn};

use crate::config::SpaceBotConfig;
use crate::error::{ApiError, SearchError};
use crate::http::{response_json_or_error, trim_api_base};

pub const DEFAULT_MEDIA_TYPE: &str = "image";

const PROVIDER: &str = "NASA";

pub trait ImageSearch: Send + Sync {
    fn try_search(&self, query: &str, media_type: &str) -> Result<Vec<ImageResult>, SearchError>;

    /// Same as [`ImageSearch::try_search`], but any failure is logged and
    /// reported as an empty result.
    fn search(&self, query: &str, media_type: &str) -> Vec<ImageResult> {
        match self.try_search(query, media_type) {
            Ok(results) => results,
            Err(err) => {
                warn!(
                    query,
                    media_type,
                    timed_out = err.is_timeout(),
                    error = %err,
                    "image search failed"
                );
                Vec::new()
            }
        }
    }
}

/// Client for the NASA Image and Video Library search endpoint.
pub struct NasaImageClient {
    api_base: String,
    timeout: Duration,
    http: HttpClient,
}

impl NasaImageClient {
    pub fn new(config: &SpaceBotConfig) -> Self {
        Self {
            api_base: trim_api_base(&config.image_api_base),
            timeout: config.request_timeout,
            http: HttpClient::new(),
        }
    }

    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.api_base)
    }
}

impl ImageSearch for NasaImageClient {
    fn try_search(&self, query: &str, media_type: &str) -> Result<Vec<ImageResult>, SearchError> {
        let endpoint = self.endpoint();
        debug!(%endpoint, query, media_type, "searching image archive");
        let response = self
            .http
            .get(&endpoint)
            .query(&[("q", query), ("media_type", media_type)])
            .timeout(self.timeout)
            .send()
            .map_err(|source| ApiError::Transport {
                provider: PROVIDER,
                source,
            })?;
        let payload = response_json_or_error(PROVIDER, response)?;
        let results = parse_search_response(&payload)?;
        debug!(query, count = results.len(), "image search finished");
        Ok(results)
    }
}

/// Flattens `collection.items[]` into image results, keeping upstream order.
///
/// Items without metadata or without a link rendered as an image are skipped.
pub fn parse_search_response(payload: &Value) -> Result<Vec<ImageResult>, SearchError> {
    let collection = payload
        .get("collection")
        .and_then(Value::as_object)
        .ok_or(SearchError::MissingCollection)?;
    let items = collection
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    Ok(items.iter().filter_map(image_result_from_item).collect())
}

fn image_result_from_item(item: &Value) -> Option<ImageResult> {
    let metadata = item
        .get("data")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())?;
    let links = item.get("links").and_then(Value::as_array)?;

    // Only the first image-rendered link counts, even if its href is unusable.
    let image_link = links
        .iter()
        .find(|link| link.get("render").and_then(Value::as_str) == Some("image"))?;
    let image_url = image_link
        .get("href")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|href| !href.is_empty())?;
    Url::parse(image_url).ok()?;

    let title = metadata
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(MISSING_FIELD);
    let description = metadata
        .get("description_508")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .or_else(|| metadata.get("description").and_then(Value::as_str))
        .unwrap_or(MISSING_FIELD);

    Some(ImageResult::new(title, description, image_url))
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::{parse_search_response, ImageSearch, NasaImageClient, DEFAULT_MEDIA_TYPE};
    use crate::config::SpaceBotConfig;
    use crate::error::{ApiError, SearchError};
    use crate::test_support::{serve_once, test_http_client};

    fn client_for(base: &str) -> NasaImageClient {
        let config = SpaceBotConfig {
            image_api_base: base.to_string(),
            request_timeout: Duration::from_secs(5),
            ..SpaceBotConfig::default()
        };
        NasaImageClient::new(&config).with_http_client(test_http_client())
    }

    fn item(title: &str, links: Value) -> Value {
        json!({
            "data": [{"title": title, "description": format!("{title} description")}],
            "links": links,
        })
    }

    fn image_link(href: &str) -> Value {
        json!({"render": "image", "href": href, "rel": "preview"})
    }

    #[test]
    fn keeps_only_items_with_image_links_in_order() -> anyhow::Result<()> {
        let payload = json!({
            "collection": {
                "items": [
                    item("Apollo 11", json!([image_link("https://images.example/a11.jpg")])),
                    item("Launch audio", json!([{"rel": "captions", "href": "https://images.example/a.srt"}])),
                    item("Hubble", json!([
                        {"render": "video", "href": "https://images.example/h.mp4"},
                        image_link("https://images.example/hubble.jpg"),
                    ])),
                    {"data": [{"title": "No links"}]},
                    item("Webb", json!([image_link("https://images.example/webb.jpg")])),
                ]
            }
        });

        let results = parse_search_response(&payload)?;
        let titles: Vec<&str> = results.iter().map(|result| result.title.as_str()).collect();
        assert_eq!(titles, vec!["Apollo 11", "Hubble", "Webb"]);
        assert_eq!(results[1].image_url, "https://images.example/hubble.jpg");
        Ok(())
    }

    #[test]
    fn description_prefers_accessible_text_then_falls_back() -> anyhow::Result<()> {
        let payload = json!({
            "collection": {
                "items": [
                    {
                        "data": [{"title": "A", "description": "plain", "description_508": "accessible"}],
                        "links": [image_link("https://images.example/a.jpg")],
                    },
                    {
                        "data": [{"title": "B", "description": "plain", "description_508": ""}],
                        "links": [image_link("https://images.example/b.jpg")],
                    },
                    {
                        "data": [{}],
                        "links": [image_link("https://images.example/c.jpg")],
                    },
                    {
                        "data": [{"title": "D", "description": ""}],
                        "links": [image_link("https://images.example/d.jpg")],
                    },
                ]
            }
        });

        let results = parse_search_response(&payload)?;
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].description, "accessible");
        assert_eq!(results[1].description, "plain");
        assert_eq!(results[2].title, "N/A");
        assert_eq!(results[2].description, "N/A");
        assert_eq!(results[3].description, "");
        Ok(())
    }

    #[test]
    fn first_image_link_decides_even_without_usable_href() -> anyhow::Result<()> {
        let payload = json!({
            "collection": {
                "items": [
                    item("Missing href", json!([
                        {"render": "image"},
                        image_link("https://images.example/second.jpg"),
                    ])),
                    item("Relative href", json!([image_link("/relative/path.jpg")])),
                ]
            }
        });
        assert!(parse_search_response(&payload)?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_collection_is_an_error_and_missing_items_is_empty() {
        assert!(matches!(
            parse_search_response(&json!({"reason": "nope"})),
            Err(SearchError::MissingCollection)
        ));
        assert!(matches!(
            parse_search_response(&json!({"collection": {"version": "1.0"}})),
            Ok(results) if results.is_empty()
        ));
    }

    #[test]
    fn search_sends_query_and_media_type() -> anyhow::Result<()> {
        let body = json!({
            "collection": {
                "items": [item("Crab Nebula", json!([image_link("https://images.example/crab.jpg")]))]
            }
        });
        let (base, server) = serve_once(200, &body.to_string());
        let client = client_for(&base);

        let results = client.search("crab nebula", DEFAULT_MEDIA_TYPE);
        let request = server.join().expect("mock server thread");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Crab Nebula");
        assert!(request.request_line().starts_with("GET /search?"));
        assert!(request.request_line().contains("q=crab+nebula"));
        assert!(request.request_line().contains("media_type=image"));
        Ok(())
    }

    #[test]
    fn non_success_status_yields_empty_results() {
        let (base, server) = serve_once(500, r#"{"reason": "internal"}"#);
        let client = client_for(&base);
        assert!(client.search("mars", DEFAULT_MEDIA_TYPE).is_empty());
        server.join().expect("mock server thread");

        let (base, server) = serve_once(404, "not found");
        let client = client_for(&base);
        let err = client.try_search("mars", DEFAULT_MEDIA_TYPE).err();
        server.join().expect("mock server thread");
        assert!(matches!(
            err,
            Some(SearchError::Api(ApiError::Status { status: 404, .. }))
        ));
    }

    #[test]
    fn malformed_or_incomplete_body_yields_empty_results() {
        let (base, server) = serve_once(200, "{not json");
        assert!(client_for(&base).search("moon", DEFAULT_MEDIA_TYPE).is_empty());
        server.join().expect("mock server thread");

        let (base, server) = serve_once(200, r#"{"items": []}"#);
        let err = client_for(&base).try_search("moon", DEFAULT_MEDIA_TYPE).err();
        server.join().expect("mock server thread");
        assert!(matches!(err, Some(SearchError::MissingCollection)));
    }

    #[test]
    fn timeout_yields_empty_results() -> anyhow::Result<()> {
        // Accepts connections via the backlog but never answers.
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let base = format!("http://{}", listener.local_addr()?);
        let config = SpaceBotConfig {
            image_api_base: base,
            request_timeout: Duration::from_millis(200),
            ..SpaceBotConfig::default()
        };
        let client = NasaImageClient::new(&config).with_http_client(test_http_client());

        let err = client.try_search("saturn", DEFAULT_MEDIA_TYPE).err();
        assert!(matches!(&err, Some(SearchError::Api(api)) if api.is_timeout()));
        assert!(err.is_some_and(|err| err.is_timeout()));
        assert!(client.search("saturn", DEFAULT_MEDIA_TYPE).is_empty());
        drop(listener);
        Ok(())
    }

    #[test]
    fn unreachable_host_yields_empty_results() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let base = format!("http://{}", listener.local_addr()?);
        drop(listener);
        assert!(client_for(&base).search("venus", DEFAULT_MEDIA_TYPE).is_empty());
        Ok(())
    }
}
