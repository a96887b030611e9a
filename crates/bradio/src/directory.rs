//! Radio Browser directory client
//!
//! Every query maps to exactly one HTTP request. Ordering, filtering and
//! ranking are left to the directory; the request only says which endpoint
//! to hit and how to sort (see [`StationQuery::endpoint`] and
//! [`StationQuery::query_params`]).

use bradio_core::query::StationQuery;
use bradio_core::station::Station;
use bradio_core::Error;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

pub const DEFAULT_API_BASE: &str = "https://de1.api.radio-browser.info";

/// Source of station results.
///
/// Front ends depend on this trait rather than on [`RadioBrowserClient`] so
/// they can be exercised against canned results.
pub trait StationDirectory {
    /// Issue the single request answering `query`. An empty list is a valid answer.
    fn fetch(
        &self,
        query: &StationQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Station>, Error>> + Send;
}

#[derive(Debug, Clone)]
pub struct RadioBrowserClient {
    http: reqwest::Client,
    api_base: String,
}

impl RadioBrowserClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("bradio/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::external(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn request_url(&self, query: &StationQuery) -> String {
        format!("{}{}", self.api_base, query.endpoint())
    }
}

impl StationDirectory for RadioBrowserClient {
    async fn fetch(&self, query: &StationQuery) -> Result<Vec<Station>, Error> {
        let url = self.request_url(query);
        log::debug!("GET {} {:?}", url, query.query_params());

        let response = self
            .http
            .get(&url)
            .query(&query.query_params())
            .send()
            .await
            .map_err(|e| Error::external(format!("Failed to fetch stations: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::external(format!(
                "Failed to fetch stations: HTTP {}",
                response.status()
            )));
        }

        let stations: Vec<Station> = response
            .json()
            .await
            .map_err(|e| Error::external(format!("Failed to parse stations: {e}")))?;

        log::debug!("Directory returned {} stations", stations.len());

        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, Uri};
    use axum::Router;
    use bradio_core::query::QueryRequest;
    use std::sync::{Arc, Mutex};

    const BODY: &str = r#"[
        {"stationuuid":"u1","name":"Milano Lounge","url":"http://x","tags":"lounge, italian","codec":"MP3","bitrate":128,"clickcount":42,"clicktrend":1,"votes":7,"lastcheckok":1},
        {"stationuuid":"u2","name":"Lounge FM","url":"http://y","tags":"lounge","codec":"AAC","bitrate":64,"clickcount":10,"clicktrend":0,"votes":"N/A","lastcheckok":0}
    ]"#;

    /// Serve `body` with `status` for every request and record the request URIs.
    async fn spawn_directory(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Vec<Uri>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let app = Router::new().fallback(move |uri: Uri| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(uri);
                (status, [("content-type", "application/json")], body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), seen)
    }

    fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
        uri.query()
            .unwrap_or_default()
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn has_pair(uri: &Uri, key: &str, value: &str) -> bool {
        query_pairs(uri)
            .iter()
            .any(|(k, v)| k == key && v == value)
    }

    #[test]
    fn test_request_url_trims_trailing_slash() {
        let client = RadioBrowserClient::new("http://localhost:1234/").unwrap();
        let query = QueryRequest::by_tag("jazz", None).validate().unwrap();
        assert_eq!(
            client.request_url(&query),
            "http://localhost:1234/json/stations/bytagexact/jazz"
        );
    }

    #[tokio::test]
    async fn test_fetch_by_name() {
        let (base, seen) = spawn_directory(StatusCode::OK, BODY).await;
        let client = RadioBrowserClient::new(base).unwrap();
        let query = QueryRequest::by_name("Milano Lounge", Some(2))
            .validate()
            .unwrap();

        let stations = client.fetch(&query).await.unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, "Milano Lounge");
        assert_eq!(stations[1].votes, "N/A");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path(), "/json/stations/byname/Milano%20Lounge");
        assert!(has_pair(&seen[0], "order", "clickcount"));
        assert!(has_pair(&seen[0], "reverse", "true"));
        assert!(has_pair(&seen[0], "offset", "0"));
        assert!(has_pair(&seen[0], "limit", "2"));
        assert!(has_pair(&seen[0], "hidebroken", "true"));
    }

    #[tokio::test]
    async fn test_fetch_by_tag_uses_click_trend() {
        let (base, seen) = spawn_directory(StatusCode::OK, BODY).await;
        let client = RadioBrowserClient::new(base).unwrap();
        let query = QueryRequest::by_tag("ambient", None).validate().unwrap();

        client.fetch(&query).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path(), "/json/stations/bytagexact/ambient");
        assert!(has_pair(&seen[0], "order", "clicktrend"));
        assert!(has_pair(&seen[0], "limit", "12"));
    }

    #[tokio::test]
    async fn test_fetch_popular() {
        let (base, seen) = spawn_directory(StatusCode::OK, BODY).await;
        let client = RadioBrowserClient::new(base).unwrap();
        let query = QueryRequest::popular(Some(100)).validate().unwrap();

        client.fetch(&query).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path(), "/json/stations");
        assert!(has_pair(&seen[0], "order", "clickcount"));
        assert!(has_pair(&seen[0], "limit", "100"));
    }

    #[tokio::test]
    async fn test_fetch_empty_result_is_ok() {
        let (base, _) = spawn_directory(StatusCode::OK, "[]").await;
        let client = RadioBrowserClient::new(base).unwrap();
        let query = QueryRequest::by_name("nothing", None).validate().unwrap();

        assert!(client.fetch(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let (base, _) = spawn_directory(StatusCode::SERVICE_UNAVAILABLE, "[]").await;
        let client = RadioBrowserClient::new(base).unwrap();
        let query = QueryRequest::by_name("x", None).validate().unwrap();

        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, Error::ExternalService(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_body() {
        let (base, _) = spawn_directory(StatusCode::OK, "not json").await;
        let client = RadioBrowserClient::new(base).unwrap();
        let query = QueryRequest::by_name("x", None).validate().unwrap();

        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, Error::ExternalService(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RadioBrowserClient::new(format!("http://{addr}")).unwrap();
        let query = QueryRequest::by_name("x", None).validate().unwrap();

        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, Error::ExternalService(_)));
    }
}
