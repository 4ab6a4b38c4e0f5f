pub mod error;
pub mod http;

use crate::domain::stock::{RecommendationsResponse, Stock, StocksResponse, SyncResponse};

pub use http::HttpStocksApi;

pub const DEFAULT_STOCKS_LIMIT: u32 = 50;
pub const DEFAULT_STOCKS_OFFSET: u32 = 0;
pub const DEFAULT_RECOMMENDATIONS_LIMIT: u32 = 10;

/// Typed access to the stocks backend. Every call is a single round trip; failures
/// are returned to the caller as-is.
#[async_trait::async_trait]
pub trait StocksApi: Send + Sync {
    async fn get_stocks(&self, limit: u32, offset: u32) -> anyhow::Result<StocksResponse>;

    async fn get_stock_by_id(&self, id: &str) -> anyhow::Result<Stock>;

    async fn search_stocks(&self, query: &str) -> anyhow::Result<StocksResponse>;

    /// Only confirms that the backend accepted the job.
    async fn sync_stocks(&self, pages: Option<u32>) -> anyhow::Result<SyncResponse>;

    async fn get_recommendations(&self, limit: u32) -> anyhow::Result<RecommendationsResponse>;

    async fn health_check(&self) -> anyhow::Result<String>;
}
