use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
            );
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    /// Same as `request`, with extra headers merged on top of the defaults.
    /// Write paths use this for `Prefer: return=representation`.
    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            for (name, value) in extra.iter() {
                headers.insert(name, value.clone());
            }
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

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                409 => anyhow!("Conflict: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Exact row count for a PostgREST query without fetching the rows.
    /// Uses `Prefer: count=exact` and reads the total off `Content-Range`.
    pub async fn count(&self, path: &str, auth_token: Option<&str>) -> Result<i64> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Counting rows at {}", url);

        let mut headers = self.get_headers(auth_token);
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));
        headers.insert("Range", HeaderValue::from_static("0-0"));

        let response = self.client.request(Method::GET, &url)
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Count query failed ({}): {}", status, error_text);
            return Err(anyhow!("API error ({}): {}", status, error_text));
        }

        // Content-Range is "0-0/<total>" ("*/0" when the table is empty)
        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| anyhow!("Count response missing Content-Range header"))?;

        let total = content_range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse::<i64>().ok())
            .ok_or_else(|| anyhow!("Unparseable Content-Range: {}", content_range))?;

        Ok(total)
    }

    pub async fn get_user_profile(&self, _user_id: &str, auth_token: &str) -> Result<Value> {
        // Use the Supabase Auth API to get user data
        let path = "/auth/v1/user";

        self.request::<Value>(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    // Method to get public URL for a storage path
    pub fn get_public_url(&self, storage_path: &str) -> String {
        format!("{}{}", self.base_url, storage_path)
    }
}
