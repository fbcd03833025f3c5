use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::request::error::RequestError;

/// Thin JSON client for the admin REST API.
///
/// Every call resolves to the decoded body of a 200 response or to a
/// [`RequestError`] whose message is fit to show to the user. There is no
/// retry and no timeout beyond what the underlying connection imposes.
#[derive(Debug, Clone)]
pub struct RequestClient {
    client: Client,
    base_url: String,
}

impl RequestClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RequestError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> Result<Url, RequestError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };
        Url::parse(&raw).map_err(|_| RequestError::InvalidUrl { url: raw })
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, RequestError> {
        let url = self.url(url)?;
        tracing::debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        handle_result(resp).await
    }

    /// Send `body` as JSON with the given method. A missing body is sent as
    /// an empty object.
    pub async fn send<T, B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(url)?;
        let payload = match body {
            Some(body) => serde_json::to_vec(body)?,
            None => b"{}".to_vec(),
        };
        tracing::debug!(%method, %url, bytes = payload.len(), "sending request");

        let resp = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        handle_result(resp).await
    }

    pub async fn post<T, B>(&self, url: &str, body: Option<&B>) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, url, body).await
    }

    pub async fn put<T, B>(&self, url: &str, body: Option<&B>) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, url, body).await
    }

    pub async fn patch<T, B>(&self, url: &str, body: Option<&B>) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PATCH, url, body).await
    }

    pub async fn delete<T, B>(&self, url: &str, body: Option<&B>) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::DELETE, url, body).await
    }
}

async fn handle_result<T: DeserializeOwned>(resp: Response) -> Result<T, RequestError> {
    let status = resp.status();
    if status == StatusCode::OK {
        let bytes = resp.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.text().await?;

    let reason = failure_reason(status, content_type.as_deref(), &body);
    tracing::error!(status = status.as_u16(), %reason, "request failed");
    Err(RequestError::Status {
        status: status.as_u16(),
        reason,
    })
}

/// Pick the message for a failed response.
///
/// Priority: the `error` field of a JSON body, then the raw body text, then
/// the status phrase.
pub fn failure_reason(status: StatusCode, content_type: Option<&str>, body: &str) -> String {
    let mut reason = body.to_string();

    let is_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
    if is_json {
        if let Ok(data) = serde_json::from_str::<Value>(body) {
            match data.get("error") {
                Some(Value::String(message)) if !message.is_empty() => reason = message.clone(),
                Some(value) if is_truthy(value) && !value.is_string() => {
                    reason = value.to_string()
                }
                _ => {}
            }
        }
    }

    if reason.is_empty() {
        reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
    }
    reason
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_field_wins() {
        let reason = failure_reason(
            StatusCode::NOT_FOUND,
            Some("application/json; charset=utf-8"),
            r#"{"error":"missing"}"#,
        );
        assert_eq!(reason, "missing");
    }

    #[test]
    fn json_content_type_is_case_insensitive() {
        let reason = failure_reason(
            StatusCode::BAD_REQUEST,
            Some("Application/JSON"),
            r#"{"error":"bad form"}"#,
        );
        assert_eq!(reason, "bad form");
    }

    #[test]
    fn json_without_error_field_keeps_raw_text() {
        let body = r#"{"message":"nope"}"#;
        let reason = failure_reason(StatusCode::BAD_REQUEST, Some("application/json"), body);
        assert_eq!(reason, body);
    }

    #[test]
    fn invalid_json_keeps_raw_text() {
        let reason = failure_reason(StatusCode::BAD_GATEWAY, Some("application/json"), "oops");
        assert_eq!(reason, "oops");
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        let reason = failure_reason(StatusCode::FORBIDDEN, Some("text/plain"), "forbidden here");
        assert_eq!(reason, "forbidden here");
    }

    #[test]
    fn empty_body_falls_back_to_status_phrase() {
        let reason = failure_reason(StatusCode::INTERNAL_SERVER_ERROR, None, "");
        assert_eq!(reason, "Internal Server Error");
    }

    #[test]
    fn non_string_error_is_rendered_as_json() {
        let reason = failure_reason(
            StatusCode::UNPROCESSABLE_ENTITY,
            Some("application/json"),
            r#"{"error":{"field":"name"}}"#,
        );
        assert_eq!(reason, r#"{"field":"name"}"#);
    }

    #[test]
    fn relative_paths_join_base_url() {
        let client = RequestClient::new("http://localhost:8080/admin/").unwrap();
        let url = client.url("/user/1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/admin/user/1");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let client = RequestClient::new("http://localhost:8080/admin").unwrap();
        let url = client.url("https://example.com/x").unwrap();
        assert_eq!(url.as_str(), "https://example.com/x");
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        let client = RequestClient::new("not a url").unwrap();
        assert!(matches!(
            client.url("user"),
            Err(RequestError::InvalidUrl { .. })
        ));
    }
}
