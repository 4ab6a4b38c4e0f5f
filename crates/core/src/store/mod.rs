pub mod state;

use crate::api::{StocksApi, DEFAULT_STOCKS_LIMIT, DEFAULT_STOCKS_OFFSET};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use state::StoreState;

/// Delay between an accepted sync and the refresh of the default stock list.
pub const SYNC_REFRESH_DELAY: Duration = Duration::from_secs(5);

const FETCH_STOCKS_FAILED: &str = "Error fetching stocks";
const SEARCH_STOCKS_FAILED: &str = "Error searching stocks";
const FETCH_STOCK_FAILED: &str = "Error fetching stock details";
const FETCH_RECOMMENDATIONS_FAILED: &str = "Error fetching recommendations";
const SYNC_STOCKS_FAILED: &str = "Error syncing stocks";

/// Session-wide state container. Views go through the store's actions and never
/// talk to the API client directly.
///
/// Cloning is cheap and every clone shares the same state. Actions do not lock
/// each other out: concurrent actions race on `loading` and the last one to finish
/// wins.
#[derive(Clone)]
pub struct StockStore {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn StocksApi>,
    state: Mutex<StoreState>,
    pending_refresh: Mutex<Option<PendingRefresh>>,
}

/// Scheduled post-sync refresh. `done` flips to true once the refresh ran; its
/// sender is dropped when the task is aborted.
struct PendingRefresh {
    handle: JoinHandle<()>,
    done: watch::Receiver<bool>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self
            .pending_refresh
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = slot.take() {
            pending.handle.abort();
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy)]
enum Busy {
    Loading,
    Syncing,
}

impl Busy {
    fn flag(self, state: &mut StoreState) -> &mut bool {
        match self {
            Busy::Loading => &mut state.loading,
            Busy::Syncing => &mut state.syncing,
        }
    }
}

/// Raises a busy flag and clears `error`; the flag drops back to false when the
/// guard goes away, including when the action future is dropped mid-flight.
struct BusyGuard<'a> {
    state: &'a Mutex<StoreState>,
    busy: Busy,
}

impl<'a> BusyGuard<'a> {
    fn begin(state: &'a Mutex<StoreState>, busy: Busy) -> Self {
        let mut s = lock(state);
        *busy.flag(&mut s) = true;
        s.error = None;
        Self { state, busy }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.busy.flag(&mut lock(self.state)) = false;
    }
}

impl StockStore {
    pub fn new<A: StocksApi + 'static>(api: A) -> Self {
        Self::from_arc(Arc::new(api))
    }

    pub fn from_arc(api: Arc<dyn StocksApi>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: Mutex::new(StoreState::default()),
                pending_refresh: Mutex::new(None),
            }),
        }
    }

    pub fn snapshot(&self) -> StoreState {
        self.state().clone()
    }

    pub fn has_stocks(&self) -> bool {
        self.state().has_stocks()
    }

    pub fn has_recommendations(&self) -> bool {
        self.state().has_recommendations()
    }

    pub fn loading(&self) -> bool {
        self.state().loading
    }

    pub fn syncing(&self) -> bool {
        self.state().syncing
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        lock(&self.inner.state)
    }

    fn fail(&self, err: &anyhow::Error, fallback: &'static str) {
        let detail = format!("{err:#}");
        tracing::error!(error = %detail, "{fallback}");
        self.state().error = Some(if detail.trim().is_empty() {
            fallback.to_string()
        } else {
            detail
        });
    }

    pub async fn fetch_stocks(&self, limit: u32, offset: u32) {
        let _busy = BusyGuard::begin(&self.inner.state, Busy::Loading);
        match self.inner.api.get_stocks(limit, offset).await {
            Ok(page) => {
                let mut s = self.state();
                s.stocks = page.data;
                s.total = page.total;
            }
            Err(err) => self.fail(&err, FETCH_STOCKS_FAILED),
        }
    }

    /// A blank query shows the default stock list instead. On success `total` is the
    /// number of matches, not the server's paginated total.
    pub async fn search_stocks(&self, query: &str) {
        if query.trim().is_empty() {
            return self
                .fetch_stocks(DEFAULT_STOCKS_LIMIT, DEFAULT_STOCKS_OFFSET)
                .await;
        }

        let _busy = BusyGuard::begin(&self.inner.state, Busy::Loading);
        match self.inner.api.search_stocks(query).await {
            Ok(res) => {
                let mut s = self.state();
                s.total = res.data.len() as u64;
                s.stocks = res.data;
            }
            Err(err) => self.fail(&err, SEARCH_STOCKS_FAILED),
        }
    }

    pub async fn fetch_stock_by_id(&self, id: &str) {
        let _busy = BusyGuard::begin(&self.inner.state, Busy::Loading);
        match self.inner.api.get_stock_by_id(id).await {
            Ok(stock) => self.state().current_stock = Some(stock),
            Err(err) => self.fail(&err, FETCH_STOCK_FAILED),
        }
    }

    pub async fn fetch_recommendations(&self, limit: u32) {
        let _busy = BusyGuard::begin(&self.inner.state, Busy::Loading);
        match self.inner.api.get_recommendations(limit).await {
            Ok(res) => self.state().recommendations = res.data,
            Err(err) => self.fail(&err, FETCH_RECOMMENDATIONS_FAILED),
        }
    }

    /// Triggers a backend sync. `syncing` only covers the trigger call; the stock
    /// list refresh runs `SYNC_REFRESH_DELAY` later in the background.
    pub async fn sync_stocks(&self, pages: Option<u32>) {
        let _busy = BusyGuard::begin(&self.inner.state, Busy::Syncing);
        match self.inner.api.sync_stocks(pages).await {
            Ok(res) => {
                tracing::info!(
                    message = %res.message,
                    ?pages,
                    delay_secs = SYNC_REFRESH_DELAY.as_secs(),
                    "sync accepted; stock refresh scheduled"
                );
                self.schedule_refresh();
            }
            Err(err) => self.fail(&err, SYNC_STOCKS_FAILED),
        }
    }

    pub async fn health_check(&self) -> anyhow::Result<String> {
        self.inner.api.health_check().await
    }

    /// Replaces any refresh that is still waiting. The task holds only a weak
    /// reference so it never keeps the store alive.
    fn schedule_refresh(&self) {
        let deadline = tokio::time::Instant::now() + SYNC_REFRESH_DELAY;
        let weak = Arc::downgrade(&self.inner);
        let (done_tx, done) = watch::channel(false);
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let store = StockStore { inner };
            store
                .fetch_stocks(DEFAULT_STOCKS_LIMIT, DEFAULT_STOCKS_OFFSET)
                .await;
            done_tx.send_replace(true);
        });

        let pending = PendingRefresh { handle, done };
        if let Some(previous) = lock(&self.inner.pending_refresh).replace(pending) {
            previous.handle.abort();
        }
    }

    pub fn has_pending_refresh(&self) -> bool {
        lock(&self.inner.pending_refresh)
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    /// Returns true if a refresh was still waiting and got cancelled.
    pub fn cancel_pending_refresh(&self) -> bool {
        match lock(&self.inner.pending_refresh).take() {
            Some(pending) if !pending.handle.is_finished() => {
                pending.handle.abort();
                tracing::debug!("pending stock refresh cancelled");
                true
            }
            _ => false,
        }
    }

    /// Waits until the scheduled post-sync refresh has run, was cancelled or was
    /// superseded. The refresh stays pending and cancellable while this waits.
    pub async fn wait_for_pending_refresh(&self) {
        let done = lock(&self.inner.pending_refresh)
            .as_ref()
            .map(|p| p.done.clone());
        if let Some(mut done) = done {
            if done.wait_for(|ran| *ran).await.is_err() {
                tracing::debug!("pending stock refresh did not complete");
            }
        }
    }
}
