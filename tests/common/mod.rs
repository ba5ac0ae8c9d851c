#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use listfetch::{FetchError, FetchErrorKind, PageRequest, PageResponse, PageSource};

pub type Row = String;
pub type Reply = oneshot::Sender<Result<PageResponse<Row>, FetchError>>;
pub type ScriptedCall = (PageRequest, Reply);

/// Collaborator whose completions the test controls: every `fetch_page`
/// hands the test a reply channel and blocks until the test answers,
/// so completion order is scripted exactly.
pub struct ScriptedSource {
    calls: mpsc::UnboundedSender<ScriptedCall>,
}

pub fn scripted() -> (
    Arc<dyn PageSource<Item = Row>>,
    mpsc::UnboundedReceiver<ScriptedCall>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ScriptedSource { calls: tx }), rx)
}

#[async_trait]
impl PageSource for ScriptedSource {
    type Item = Row;

    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse<Row>, FetchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.calls
            .send((request, reply_tx))
            .expect("test dropped the call receiver");
        reply_rx
            .await
            .unwrap_or_else(|_| Err(FetchError::new(FetchErrorKind::Cancelled, "reply dropped")))
    }
}

pub fn page(items: &[&str], current_page: u32, last_page: u32, total: u64) -> PageResponse<Row> {
    PageResponse {
        items: items.iter().map(ToString::to_string).collect(),
        current_page,
        last_page,
        total,
    }
}

/// Barrier for paused-time tests: a 1 ms sleep only completes once every
/// runnable task has parked, so all delivered completions have been
/// applied when it returns.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
