use anyhow::ensure;
use serde::{Deserialize, Deserializer, Serialize};

/// One analyst rating / price-target record. Every field is passed through as the
/// backend formatted it; nothing is parsed client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: String,
    pub ticker: String,
    pub company: String,
    pub target_from: String,
    pub target_to: String,
    pub action: String,
    pub brokerage: String,
    pub rating_from: String,
    pub rating_to: String,
    pub time: String,
    pub last_updated: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecommendation {
    pub stock: Stock,
    pub score: f64,
    pub reason: String,
}

/// The backend encodes an empty result list as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A page of stocks. The search endpoint only returns `data`, so the pagination
/// fields fall back to zero when missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StocksResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Stock>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl StocksResponse {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.data.len() <= self.limit as usize,
            "stocks page exceeds its limit: {} items for limit={}",
            self.data.len(),
            self.limit
        );
        Ok(())
    }
}

/// Recommendations in server rank order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<StockRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub message: String,
    #[serde(default)]
    pub pages: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
pub(crate) fn sample_stock(id: &str, ticker: &str) -> Stock {
    Stock {
        id: id.to_string(),
        ticker: ticker.to_string(),
        company: format!("{ticker} Inc."),
        target_from: "$10.00".to_string(),
        target_to: "$12.00".to_string(),
        action: "target raised by".to_string(),
        brokerage: "Example Securities".to_string(),
        rating_from: "Neutral".to_string(),
        rating_to: "Buy".to_string(),
        time: "2025-01-10T00:30:05Z".to_string(),
        last_updated: "2025-01-11T08:00:00Z".to_string(),
        created_at: "2025-01-11T08:00:00Z".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_list_page_with_pagination_fields() {
        let v = json!({
            "data": [sample_stock("1", "AAPL")],
            "total": 1203,
            "limit": 50,
            "offset": 100,
        });

        let parsed: StocksResponse = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].ticker, "AAPL");
        assert_eq!(parsed.total, 1203);
        assert_eq!(parsed.offset, 100);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn search_shape_without_pagination_fields_defaults_to_zero() {
        let v = json!({ "data": [sample_stock("1", "AAPL"), sample_stock("2", "MSFT")] });

        let parsed: StocksResponse = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.total, 0);
        assert_eq!(parsed.limit, 0);
    }

    #[test]
    fn null_or_missing_data_reads_as_empty_list() {
        let page: StocksResponse =
            serde_json::from_value(json!({"data": null, "total": 0, "limit": 50, "offset": 0}))
                .unwrap();
        assert!(page.data.is_empty());
        assert!(page.validate().is_ok());

        let search: StocksResponse = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(search.data.is_empty());

        let recs: RecommendationsResponse =
            serde_json::from_value(json!({"data": null})).unwrap();
        assert!(recs.data.is_empty());

        let bare: RecommendationsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(bare.data.is_empty());
    }

    #[test]
    fn validate_rejects_page_larger_than_limit() {
        let page = StocksResponse {
            data: vec![sample_stock("1", "AAPL"), sample_stock("2", "MSFT")],
            total: 2,
            limit: 1,
            offset: 0,
        };
        assert!(page.validate().is_err());
    }

    #[test]
    fn stock_fields_stay_opaque_strings() {
        let v = json!({
            "id": "b3c1",
            "ticker": "BSBR",
            "company": "Banco Santander (Brasil)",
            "target_from": "$4.20",
            "target_to": "$4.70",
            "action": "upgraded by",
            "brokerage": "The Goldman Sachs Group",
            "rating_from": "Sell",
            "rating_to": "Neutral",
            "time": "2025-01-13T00:30:05.813548892Z",
            "last_updated": "2025-01-14T10:00:00Z",
            "created_at": "2025-01-14T10:00:00Z",
        });

        let parsed: Stock = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(parsed.target_to, "$4.70");
        assert_eq!(serde_json::to_value(&parsed).unwrap(), v);
    }

    #[test]
    fn recommendations_keep_server_order() {
        let v = json!({
            "data": [
                {"stock": sample_stock("2", "MSFT"), "score": 3.5, "reason": "upgrade"},
                {"stock": sample_stock("1", "AAPL"), "score": 7.25, "reason": "target raised"},
            ]
        });

        let parsed: RecommendationsResponse = serde_json::from_value(v).unwrap();
        let tickers: Vec<_> = parsed.data.iter().map(|r| r.stock.ticker.as_str()).collect();
        assert_eq!(tickers, ["MSFT", "AAPL"]);
        assert_eq!(parsed.data[1].score, 7.25);
    }

    #[test]
    fn sync_response_accepts_echoed_pages() {
        let parsed: SyncResponse = serde_json::from_value(json!({
            "message": "Stock synchronization started",
            "pages": 3,
        }))
        .unwrap();
        assert_eq!(parsed.pages, Some(3));

        let bare: SyncResponse =
            serde_json::from_value(json!({"message": "accepted"})).unwrap();
        assert_eq!(bare.pages, None);
    }
}
