use crate::client::PredictionApi;
use crate::records::PredictionRecord;
use std::sync::Arc;
use tokio::sync::watch;

/// Observable view of the prediction history.
///
/// `total_count` is the server-reported total and may exceed
/// `records.len()` when the server only returns a page.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub records: Vec<PredictionRecord>,
    pub total_count: u64,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// In-memory cache of prediction records, refreshed wholesale from the
/// backend and observed by consumers through a watch channel.
///
/// Concurrent `refresh`/`delete` calls are not serialized; the last
/// response to complete wins the snapshot.
pub struct PredictionStore<C: PredictionApi> {
    client: Arc<C>,
    state: watch::Sender<StoreSnapshot>,
}

impl<C: PredictionApi> PredictionStore<C> {
    pub fn new(client: C) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self {
            client: Arc::new(client),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    /// Fetch the full history and replace the cached records wholesale.
    /// `is_loading` is cleared on every exit path.
    pub async fn refresh(&self) {
        self.state.send_modify(|snapshot| {
            snapshot.is_loading = true;
            snapshot.last_error = None;
        });

        match self.client.list_all().await {
            Ok(page) => {
                tracing::debug!(
                    fetched = page.predictions.len(),
                    total = page.total_count,
                    "refreshed prediction history"
                );
                self.state.send_modify(|snapshot| {
                    snapshot.records = page.predictions;
                    snapshot.total_count = page.total_count;
                    snapshot.is_loading = false;
                });
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to refresh prediction history");
                self.state.send_modify(|snapshot| {
                    snapshot.last_error = Some(err.to_string());
                    snapshot.is_loading = false;
                });
            }
        }
    }

    /// Delete one record by id. The cached collection is only mutated
    /// after the server acknowledges the delete.
    pub async fn delete(&self, id: &str) {
        self.state.send_modify(|snapshot| {
            snapshot.last_error = None;
        });

        match self.client.delete(id).await {
            Ok(()) => {
                tracing::debug!(id, "deleted prediction");
                self.state.send_modify(|snapshot| {
                    let before = snapshot.records.len();
                    snapshot.records.retain(|record| record.id != id);
                    let removed = (before - snapshot.records.len()) as u64;
                    snapshot.total_count = snapshot.total_count.saturating_sub(removed);
                });
            }
            Err(err) => {
                tracing::error!(id, error = %err, "failed to delete prediction");
                self.state.send_modify(|snapshot| {
                    snapshot.last_error = Some(err.to_string());
                });
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|snapshot| {
            snapshot.last_error = None;
        });
    }

    pub fn records(&self) -> Vec<PredictionRecord> {
        self.state.borrow().records.clone()
    }

    pub fn recent(&self, limit: usize) -> Vec<PredictionRecord> {
        self.state
            .borrow()
            .records
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn total_count(&self) -> u64 {
        self.state.borrow().total_count
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }
}
