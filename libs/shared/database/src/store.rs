use anyhow::{anyhow, Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// HTTP client for the document store. Collections live under
/// `/rest/v1/<collection>` and filters use `field=eq.value` query syntax;
/// binary objects live under `/storage/v1/object/<bucket>/<path>`.
pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Builds a `field=eq.value` filter with the value percent-encoded.
pub fn eq(field: &str, value: &str) -> String {
    format!("{}=eq.{}", field, urlencoding::encode(value))
}

/// Builds a `field=in.(a,b,c)` filter.
pub fn in_list<I, S>(field: &str, values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = values
        .into_iter()
        .map(|v| urlencoding::encode(v.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    format!("{}=in.({})", field, joined)
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.trim_end_matches('/').to_string(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.api_key).context("Store API key is not a valid header value")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .context("Store API key is not a valid header value")?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            error!("Store error ({}): {}", status, text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", text),
                404 => anyhow!("Resource not found: {}", text),
                409 => anyhow!("Conflict: {}", text),
                _ => anyhow!("Store error ({}): {}", status, text),
            });
        }

        // Minimal-return writes answer with an empty body.
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        let data = serde_json::from_str::<T>(payload)
            .with_context(|| format!("Failed to decode store response from {}", path))?;
        Ok(data)
    }

    /// Rows of `collection` matching the given query string (may be empty).
    pub async fn select(&self, collection: &str, query: &str) -> Result<Vec<Value>> {
        let path = if query.is_empty() {
            format!("/rest/v1/{}", collection)
        } else {
            format!("/rest/v1/{}?{}", collection, query)
        };
        self.request(Method::GET, &path, None).await
    }

    pub async fn select_one(&self, collection: &str, query: &str) -> Result<Option<Value>> {
        let rows = self.select(collection, query).await?;
        Ok(rows.into_iter().next())
    }

    /// Inserts one row and returns the stored representation.
    pub async fn insert(&self, collection: &str, row: Value) -> Result<Value> {
        let path = format!("/rest/v1/{}", collection);
        let result: Vec<Value> = self
            .request_with_headers(Method::POST, &path, Some(row), Some(return_representation()))
            .await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Store returned no row for insert into {}", collection))
    }

    /// Patches rows matching `query`; returns the updated rows.
    pub async fn update(&self, collection: &str, query: &str, patch: Value) -> Result<Vec<Value>> {
        let path = format!("/rest/v1/{}?{}", collection, query);
        self.request_with_headers(Method::PATCH, &path, Some(patch), Some(return_representation()))
            .await
    }

    pub async fn delete(&self, collection: &str, query: &str) -> Result<()> {
        let path = format!("/rest/v1/{}?{}", collection, query);
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=minimal"));

        let _: Value = self
            .request_with_headers(Method::DELETE, &path, None, Some(headers))
            .await?;
        Ok(())
    }

    /// Uploads raw bytes to object storage and returns the public URL.
    pub async fn upload_object(
        &self,
        bucket: &str,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, object_path);
        debug!("Uploading {} bytes to {}", bytes.len(), url);

        let mut headers = self.get_headers()?;
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type).context("Invalid content type")?,
        );

        let response = self.client.post(&url).headers(headers).body(bytes).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Storage upload error ({}): {}", status, text);
            return Err(anyhow!("Storage upload failed ({}): {}", status, text));
        }

        Ok(self.get_public_url(bucket, object_path))
    }

    pub async fn delete_object(&self, bucket: &str, object_path: &str) -> Result<()> {
        let path = format!("/storage/v1/object/{}/{}", bucket, object_path);
        let _: Value = self.request(Method::DELETE, &path, None).await?;
        Ok(())
    }

    pub fn get_public_url(&self, bucket: &str, object_path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, object_path)
    }

    /// Inverse of [`get_public_url`](Self::get_public_url) for objects in `bucket`.
    pub fn object_path_from_url<'a>(&self, bucket: &str, url: &'a str) -> Option<&'a str> {
        let marker = format!("/storage/v1/object/public/{}/", bucket);
        url.split_once(marker.as_str()).map(|(_, rest)| rest)
    }
}

fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: &str) -> AppConfig {
        AppConfig {
            store_url: url.to_string(),
            store_api_key: "test-api-key".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_hours: 24,
            chat_service_url: String::new(),
            port: 3000,
        }
    }

    #[test]
    fn test_filters_are_encoded() {
        assert_eq!(eq("email", "a+b@example.com"), "email=eq.a%2Bb%40example.com");
        assert_eq!(in_list("id", ["1", "2"]), "id=in.(1,2)");
    }

    #[tokio::test]
    async fn test_select_sends_api_key_and_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("role", "eq.doctor"))
            .and(header("apikey", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "d1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = StoreClient::new(&config(&server.uri()));
        let rows = client.select("users", &eq("role", "doctor")).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_requests_representation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/appointments"))
            .and(header("Prefer", "return=representation"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": "a1"}])))
            .mount(&server)
            .await;

        let client = StoreClient::new(&config(&server.uri()));
        let row = client.insert("appointments", json!({"reason": "x"})).await.unwrap();
        assert_eq!(row["id"], "a1");
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/medical_records"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = StoreClient::new(&config(&server.uri()));
        assert!(client.delete("medical_records", &eq("id", "r1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = StoreClient::new(&config(&server.uri()));
        let err = client.select("users", "").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_object_path_round_trip() {
        let client = StoreClient::new(&config("http://store"));
        let url = client.get_public_url("medical-records", "p1/file.pdf");
        assert_eq!(client.object_path_from_url("medical-records", &url), Some("p1/file.pdf"));
    }
}
