use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::DatabaseError;

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_key(&config.supabase_url, &config.supabase_anon_key)
    }

    /// Client for server-side stores, authenticated with the service role key.
    pub fn service(config: &AppConfig) -> Self {
        Self::with_key(&config.supabase_url, &config.supabase_service_role_key)
    }

    pub fn with_key(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Bearer token used when the caller does not pass one.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap, DatabaseError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| DatabaseError::Configuration("api key is not a valid header value".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let token = auth_token.unwrap_or(&self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| DatabaseError::Configuration("auth token is not a valid header value".to_string()))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers(auth_token)?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            return Err(DatabaseError::from_response(status.as_u16(), &error_text));
        }

        let text = response.text().await?;
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str::<T>(payload)
            .map_err(|e| DatabaseError::Decode(format!("{} (body: {})", e, text)))
    }

    /// Insert rows and return what was stored.
    pub async fn insert<T>(&self, table: &str, row: Value) -> Result<Vec<T>, DatabaseError>
    where T: DeserializeOwned {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        self.request_with_headers(
            Method::POST,
            &format!("/rest/v1/{}", table),
            None,
            Some(row),
            Some(headers),
        ).await
    }

    /// Call a Postgres function. Each call runs in its own transaction.
    pub async fn rpc<T>(&self, function: &str, args: Value) -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        self.request(
            Method::POST,
            &format!("/rest/v1/rpc/{}", function),
            None,
            Some(args),
        ).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
