use crate::api::error::ApiStatusError;
use crate::api::StocksApi;
use crate::config::Settings;
use crate::domain::stock::{
    HealthResponse, RecommendationsResponse, Stock, StocksResponse, SyncRequest, SyncResponse,
};
use anyhow::{anyhow, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// reqwest-backed client for the stocks backend.
#[derive(Debug, Clone)]
pub struct HttpStocksApi {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpStocksApi {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.api_url)
    }

    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid API base URL: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "API base URL cannot carry paths: {base_url}"
        );

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build stocks api http client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry paths: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T> {
        tracing::debug!(method, path, "stocks api request");

        let res = req
            .send()
            .await
            .with_context(|| format!("{method} {path} request failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read {method} {path} response"))?;

        if !status.is_success() {
            return Err(ApiStatusError {
                method,
                path: path.to_string(),
                status,
                body: text,
            }
            .into());
        }

        serde_json::from_str::<T>(&text).with_context(|| {
            tracing::debug!(method, path, body = %text, "undecodable stocks api response");
            format!(
                "failed to decode {method} {path} response: {}",
                body_excerpt(&text)
            )
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        let req = self.http.get(url).query(query);
        self.execute("GET", &path, req).await
    }
}

const BODY_EXCERPT_CHARS: usize = 200;

/// Keeps error messages short; the full body goes to the debug log.
fn body_excerpt(text: &str) -> String {
    match text.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}... ({} bytes)", &text[..cut], text.len()),
        None => text.to_string(),
    }
}

#[async_trait::async_trait]
impl StocksApi for HttpStocksApi {
    async fn get_stocks(&self, limit: u32, offset: u32) -> Result<StocksResponse> {
        let page: StocksResponse = self
            .get(
                &["api", "stocks"],
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        page.validate()?;
        Ok(page)
    }

    async fn get_stock_by_id(&self, id: &str) -> Result<Stock> {
        self.get(&["api", "stocks", id], &[]).await
    }

    async fn search_stocks(&self, query: &str) -> Result<StocksResponse> {
        self.get(&["api", "stocks", "search"], &[("q", query.to_string())])
            .await
    }

    async fn sync_stocks(&self, pages: Option<u32>) -> Result<SyncResponse> {
        let url = self.endpoint(&["api", "sync"])?;
        let path = url.path().to_string();
        let body = SyncRequest {
            pages: pages.unwrap_or(0),
        };
        let req = self.http.post(url).json(&body);
        self.execute("POST", &path, req).await
    }

    async fn get_recommendations(&self, limit: u32) -> Result<RecommendationsResponse> {
        self.get(&["api", "recommendations"], &[("limit", limit.to_string())])
            .await
    }

    async fn health_check(&self) -> Result<String> {
        let res: HealthResponse = self.get(&["health"], &[]).await?;
        Ok(res.status)
    }
}
