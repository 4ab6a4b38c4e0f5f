use crate::domain::stock::{Stock, StockRecommendation};

/// Everything the views read. Fields are replaced wholesale by store actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub stocks: Vec<Stock>,
    pub recommendations: Vec<StockRecommendation>,
    pub current_stock: Option<Stock>,
    /// Server total after `fetch_stocks`; result count after `search_stocks`.
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub syncing: bool,
}

impl StoreState {
    pub fn has_stocks(&self) -> bool {
        !self.stocks.is_empty()
    }

    pub fn has_recommendations(&self) -> bool {
        !self.recommendations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::sample_stock;

    #[test]
    fn derived_flags_follow_the_sequences() {
        let mut state = StoreState::default();
        assert!(!state.has_stocks());
        assert!(!state.has_recommendations());

        state.stocks.push(sample_stock("1", "AAPL"));
        assert!(state.has_stocks());

        state.recommendations.push(StockRecommendation {
            stock: sample_stock("1", "AAPL"),
            score: 1.0,
            reason: "upgrade".to_string(),
        });
        assert!(state.has_recommendations());

        state.stocks.clear();
        assert!(!state.has_stocks());
        assert!(state.has_recommendations());
    }
}
