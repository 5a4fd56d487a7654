// src/fetch/http.rs
// =============================================================================
// Fetches URLs over HTTP(S) with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling) with the run's User-Agent and
//   per-request timeout baked in
// - Follows up to 10 redirects to the final resource
// - Treats any non-2xx status as a failure for that URL
// - Sorts reqwest errors into FetchError variants so logs say *why*
// =============================================================================

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use url::Url;

use super::{FetchError, FetchedResource, Fetcher};

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the shared HTTP client
    //
    // Parameters:
    //   user_agent: sent as the User-Agent header on every request
    //   timeout: upper bound for a whole request (connect + body)
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::Other(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await.map_err(categorize_error)?;

        Ok(FetchedResource {
            final_url,
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

// Categorizes the different ways a reqwest call can fail
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new("WebMirror/1.0", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", "WebMirror/1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html>hi</html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let resource = fetcher().fetch(&format!("{}/", server.uri())).await.unwrap();

        assert_eq!(resource.status, 200);
        assert!(resource.is_html());
        assert_eq!(resource.body, b"<html>hi</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let resource = fetcher().fetch(&format!("{}/old", server.uri())).await.unwrap();

        assert_eq!(resource.final_url, format!("{}/new", server.uri()));
        assert_eq!(resource.body, b"moved");
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let err = fetcher().fetch("tel:+15551234").await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(s) if s == "tel"));
    }
}
