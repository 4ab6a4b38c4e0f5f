use stocklens_core::domain::stock::{Stock, StockRecommendation};
use stocklens_core::store::{StockStore, StoreState, SYNC_REFRESH_DELAY};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct HomeOptions {
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub stock: Option<String>,
    pub sync: bool,
    pub pages: Option<u32>,
    pub follow_sync: bool,
}

fn ensure_no_error(store: &StockStore) -> anyhow::Result<()> {
    match store.error() {
        Some(msg) => anyhow::bail!("{msg}"),
        None => Ok(()),
    }
}

pub async fn home(store: &StockStore, opts: &HomeOptions) -> anyhow::Result<()> {
    if opts.sync {
        store.sync_stocks(opts.pages).await;
        ensure_no_error(store)?;
        println!(
            "Sync started; the list refreshes in {}s.",
            SYNC_REFRESH_DELAY.as_secs()
        );
    }

    match opts.search.as_deref() {
        Some(query) => store.search_stocks(query).await,
        None => store.fetch_stocks(opts.limit, opts.offset).await,
    }
    ensure_no_error(store)?;
    print!("{}", render_stocks(&store.snapshot()));

    if let Some(id) = opts.stock.as_deref() {
        store.fetch_stock_by_id(id).await;
        ensure_no_error(store)?;
        if let Some(stock) = store.snapshot().current_stock {
            print!("{}", render_stock_detail(&stock));
        }
    }

    if opts.sync && opts.follow_sync {
        store.wait_for_pending_refresh().await;
        ensure_no_error(store)?;
        println!("Refreshed after sync:");
        print!("{}", render_stocks(&store.snapshot()));
    }

    Ok(())
}

pub async fn recommendations(store: &StockStore, limit: u32) -> anyhow::Result<()> {
    store.fetch_recommendations(limit).await;
    ensure_no_error(store)?;
    print!("{}", render_recommendations(&store.snapshot().recommendations));
    Ok(())
}

fn render_stocks(state: &StoreState) -> String {
    if !state.has_stocks() {
        return "No stocks found.\n".to_string();
    }

    let mut out = format!(
        "Showing {} of {} stocks\n{:<8} {:<32} {:<20} {:<24} {}\n",
        state.stocks.len(),
        state.total,
        "TICKER",
        "COMPANY",
        "TARGET",
        "RATING",
        "BROKERAGE"
    );
    for s in &state.stocks {
        let _ = writeln!(
            out,
            "{:<8} {:<32} {:<20} {:<24} {}",
            s.ticker,
            s.company,
            format!("{} -> {}", s.target_from, s.target_to),
            format!("{} -> {}", s.rating_from, s.rating_to),
            s.brokerage
        );
    }
    out
}

fn render_stock_detail(stock: &Stock) -> String {
    format!(
        "\n{} ({})\n  id:        {}\n  action:    {} {}\n  target:    {} -> {}\n  rating:    {} -> {}\n  time:      {}\n  updated:   {}\n",
        stock.ticker,
        stock.company,
        stock.id,
        stock.action,
        stock.brokerage,
        stock.target_from,
        stock.target_to,
        stock.rating_from,
        stock.rating_to,
        stock.time,
        stock.last_updated
    )
}

fn render_recommendations(items: &[StockRecommendation]) -> String {
    if items.is_empty() {
        return "No recommendations available.\n".to_string();
    }

    let mut out = String::new();
    for (i, rec) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<8} score {:>6.2}  {}",
            i + 1,
            rec.stock.ticker,
            rec.score,
            rec.reason
        );
    }
    out
}
