use anyhow::Context;
use clap::Parser;
use stocklens_core::api::HttpStocksApi;
use stocklens_core::router::{self, Route};
use stocklens_core::store::StockStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod views;

#[derive(Debug, Parser)]
#[command(name = "stocklens")]
struct Args {
    /// View to open: `/` (stock list) or `/recommendations`.
    #[arg(default_value = "/")]
    path: String,

    /// Search by ticker or company instead of listing.
    #[arg(long)]
    search: Option<String>,

    /// Page size for the stock list, or number of recommendations.
    #[arg(long)]
    limit: Option<u32>,

    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Also show the details of one stock id.
    #[arg(long)]
    stock: Option<String>,

    /// Ask the backend to sync fresh data before listing.
    #[arg(long)]
    sync: bool,

    /// Pages to sync. 0 lets the backend decide.
    #[arg(long, requires = "sync")]
    pages: Option<u32>,

    /// Wait for the post-sync refresh and print the list again.
    #[arg(long, requires = "sync")]
    follow_sync: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stocklens_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let route = router::resolve(&args.path)
        .with_context(|| format!("no view for path {:?}", args.path))?;

    let api = HttpStocksApi::from_settings(&settings)?;
    tracing::info!(api_url = %api.base_url(), route = route.name(), "opening view");

    let store = StockStore::new(api);

    match store.health_check().await {
        Ok(status) => tracing::info!(%status, "backend health"),
        Err(err) => tracing::warn!(error = %err, "backend health check failed"),
    }

    let res = match route {
        Route::Home => {
            let opts = views::HomeOptions {
                search: args.search,
                limit: args
                    .limit
                    .unwrap_or(stocklens_core::api::DEFAULT_STOCKS_LIMIT),
                offset: args.offset,
                stock: args.stock,
                sync: args.sync,
                pages: args.pages,
                follow_sync: args.follow_sync,
            };
            views::home(&store, &opts).await
        }
        Route::Recommendations => {
            let limit = args
                .limit
                .unwrap_or(stocklens_core::api::DEFAULT_RECOMMENDATIONS_LIMIT);
            views::recommendations(&store, limit).await
        }
    };

    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, route = route.name(), "view failed");
    }
    res
}

fn init_sentry(settings: &stocklens_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
