//! Single-request access to the Graph API.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use super::{GraphError, GraphResult, QueryParams};
use crate::core::config::GraphConfig;

/// Query parameter that carries the credential.
const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Something that can perform one GET against a Graph endpoint.
///
/// Implementations return the decoded JSON body of a 2xx response, or a
/// `GraphError` for anything else.
pub trait PageSource: Send + Sync {
    /// Fetch `endpoint` with exactly `params` (plus any credential the
    /// source attaches itself).
    fn get(&self, endpoint: &str, params: &QueryParams) -> GraphResult<Value>;
}

/// Blocking HTTP implementation backed by `reqwest`.
///
/// The access token is attached to every request, replacing any token
/// already present in `params` (next-page URLs usually carry one).
pub struct HttpPageSource {
    base_url: String,
    access_token: String,
    timeout: Duration,
    http: OnceLock<Client>,
}

impl HttpPageSource {
    /// Create a source for the configured API version.
    pub fn new(config: &GraphConfig, access_token: impl Into<String>) -> Self {
        Self {
            base_url: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.api_version.trim_matches('/')
            ),
            access_token: access_token.into(),
            timeout: Duration::from_secs(config.timeout_secs),
            http: OnceLock::new(),
        }
    }

    /// Versioned base URL, e.g. `https://graph.facebook.com/v24.0`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    // reqwest's blocking client must be built outside the async runtime, so it
    // is created on first use from the blocking worker.
    fn http(&self) -> GraphResult<&Client> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(self.http.get_or_init(|| client))
    }
}

impl PageSource for HttpPageSource {
    fn get(&self, endpoint: &str, params: &QueryParams) -> GraphResult<Value> {
        let mut query = params.clone();
        query.insert(ACCESS_TOKEN_PARAM.to_string(), self.access_token.clone());

        debug!(endpoint, params = params.len(), "GET");

        let response = self.http()?.get(self.url_for(endpoint)).query(&query).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GraphError::from_error_body(status.as_u16(), &body));
        }

        Ok(response.json::<Value>()?)
    }
}

impl std::fmt::Debug for HttpPageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageSource")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GraphConfig {
        GraphConfig {
            base_url: "https://graph.facebook.com/".to_string(),
            api_version: "v24.0".to_string(),
            timeout_secs: 30,
            page_limit: 100,
        }
    }

    #[test]
    fn test_url_for_joins_version_and_endpoint() {
        let source = HttpPageSource::new(&config(), "token");
        assert_eq!(source.base_url(), "https://graph.facebook.com/v24.0");
        assert_eq!(
            source.url_for("/act_1/campaigns"),
            "https://graph.facebook.com/v24.0/act_1/campaigns"
        );
        assert_eq!(
            source.url_for("me/adaccounts"),
            "https://graph.facebook.com/v24.0/me/adaccounts"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let source = HttpPageSource::new(&config(), "very_secret_token");
        let debug = format!("{source:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("very_secret_token"));
    }

    /// One canned HTTP response from the local test server.
    struct Reply {
        status: &'static str,
        content_type: &'static str,
        body: String,
        delay: Duration,
    }

    impl Reply {
        fn json(status: &'static str, body: serde_json::Value) -> Self {
            Self {
                status,
                content_type: "application/json",
                body: body.to_string(),
                delay: Duration::ZERO,
            }
        }

        fn html(status: &'static str, body: &str) -> Self {
            Self {
                status,
                content_type: "text/html",
                body: body.to_string(),
                delay: Duration::ZERO,
            }
        }

        fn after(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    /// Bind a local listener and return it with its base URL.
    fn bind() -> (std::net::TcpListener, String) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        (listener, base)
    }

    /// Serve `replies` in order, one connection each. The handle yields every
    /// request line received.
    fn serve_on(
        listener: std::net::TcpListener,
        replies: Vec<Reply>,
    ) -> std::thread::JoinHandle<Vec<String>> {
        use std::io::{Read, Write};

        std::thread::spawn(move || {
            let mut request_lines = Vec::new();
            for reply in replies {
                let (mut stream, _) = listener.accept().unwrap();

                let mut raw = Vec::new();
                let mut buf = [0u8; 1024];
                while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buf[..n]);
                }
                let head = String::from_utf8_lossy(&raw);
                request_lines.push(head.lines().next().unwrap_or_default().to_string());

                std::thread::sleep(reply.delay);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    reply.content_type,
                    reply.body.len(),
                    reply.body
                );
                // The client may already have given up on a stalled reply.
                let _ = stream.write_all(response.as_bytes());
            }
            request_lines
        })
    }

    fn serve(replies: Vec<Reply>) -> (String, std::thread::JoinHandle<Vec<String>>) {
        let (listener, base) = bind();
        (base, serve_on(listener, replies))
    }

    fn local_source(base: &str, timeout_secs: u64) -> HttpPageSource {
        let config = GraphConfig {
            base_url: base.to_string(),
            api_version: "v24.0".to_string(),
            timeout_secs,
            page_limit: 100,
        };
        HttpPageSource::new(&config, "secret_token")
    }

    #[test]
    fn test_get_attaches_token_and_decodes_body() {
        let (base, server) = serve(vec![Reply::json(
            "200 OK",
            serde_json::json!({ "data": [{ "id": "act_1" }] }),
        )]);
        let source = local_source(&base, 5);

        let params = QueryParams::from([("limit".to_string(), "100".to_string())]);
        let body = source.get("/me/adaccounts", &params).unwrap();
        assert_eq!(body["data"][0]["id"], "act_1");

        let lines = server.join().unwrap();
        assert!(lines[0].starts_with("GET /v24.0/me/adaccounts?"));
        assert!(lines[0].contains("access_token=secret_token"));
        assert!(lines[0].contains("limit=100"));
    }

    #[test]
    fn test_error_status_on_second_page_fails_listing() {
        let (listener, base) = bind();
        let next = format!("{base}/v24.0/act_1/insights?limit=2&after=p2&access_token=stale");
        let server = serve_on(
            listener,
            vec![
                Reply::json(
                    "200 OK",
                    serde_json::json!({
                        "data": [{ "id": "1" }, { "id": "2" }],
                        "paging": { "next": next }
                    }),
                ),
                Reply::json(
                    "400 Bad Request",
                    serde_json::json!({
                        "error": { "message": "Bad", "code": 100, "error_subcode": 33 }
                    }),
                ),
            ],
        );
        let source = local_source(&base, 5);

        let err = super::super::Pager::new(&source)
            .fetch_all("/act_1/insights", QueryParams::new())
            .unwrap_err();

        assert!(matches!(
            err,
            GraphError::Upstream {
                status: 400,
                code: Some(100),
                subcode: Some(33),
                ..
            }
        ));
        assert_eq!(err.to_string(), "Facebook API Error 100: Bad (Subcode: 33)");

        let lines = server.join().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("after=p2"));
        assert!(lines[1].contains("access_token=secret_token"));
        assert!(!lines[1].contains("stale"));
    }

    #[test]
    fn test_html_error_body_gives_generic_message() {
        let (base, server) = serve(vec![Reply::html(
            "502 Bad Gateway",
            "<html><body>Bad Gateway</body></html>",
        )]);
        let source = local_source(&base, 5);

        let err = source.get("/me/adaccounts", &QueryParams::new()).unwrap_err();

        assert!(matches!(err, GraphError::Upstream { status: 502, code: None, .. }));
        assert_eq!(
            err.to_string(),
            "Facebook API request failed: HTTP status 502"
        );
        server.join().unwrap();
    }

    #[test]
    fn test_stalled_response_times_out() {
        let (base, _server) = serve(vec![
            Reply::json("200 OK", serde_json::json!({ "data": [] })).after(Duration::from_secs(3)),
        ]);
        let source = local_source(&base, 1);

        let err = source.get("/me/adaccounts", &QueryParams::new()).unwrap_err();

        assert!(matches!(err, GraphError::Transport(_)));
        assert!(err.to_string().starts_with("Facebook API request failed"));
        assert!(!err.to_string().contains("secret_token"));
    }
}
