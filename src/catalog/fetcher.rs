use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::models::RecordBatch;

use super::client::CatalogSource;
use super::error::FetchError;

/// Granularity at which [`Fetcher::wait`] rechecks a worker that may have died.
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// Result of a finished request, tagged with the ticket it was issued under.
struct Completion {
    ticket: u64,
    page: u32,
    result: Result<RecordBatch, FetchError>,
}

/// The in-flight request whose result the view is waiting for.
struct Pending {
    ticket: u64,
    page: u32,
    worker: JoinHandle<()>,
}

/// What the view should do after a completion was accepted.
#[derive(Debug)]
pub enum FetchEvent {
    Loaded(RecordBatch),
    Failed(FetchError),
}

/// Runs page requests on worker threads and hands back only the newest one.
///
/// Every call to [`Fetcher::request`] bumps a ticket; completions carrying an
/// older ticket are dropped on arrival, so a slow response for page 2 can never
/// overwrite a page 3 that was requested later.
pub struct Fetcher {
    source: Arc<dyn CatalogSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    next_ticket: u64,
    pending: Option<Pending>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            next_ticket: 0,
            pending: None,
        }
    }

    /// Dispatch a request for `page`, superseding whatever was in flight.
    pub fn request(&mut self, page: u32) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;

        if let Some(previous) = &self.pending {
            debug!(
                superseded_page = previous.page,
                page, "superseding in-flight catalog request"
            );
        }

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let worker = thread::spawn(move || {
            let result = source.fetch_page(page);
            // The receiver only disappears when the view is torn down.
            let _ = tx.send(Completion {
                ticket,
                page,
                result,
            });
        });

        info!(page, ticket, "dispatched catalog request");
        self.pending = Some(Pending {
            ticket,
            page,
            worker,
        });
        ticket
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Page of the request currently in flight.
    pub fn pending_page(&self) -> Option<u32> {
        self.pending.as_ref().map(|pending| pending.page)
    }

    /// Drain finished requests without blocking.
    pub fn poll(&mut self) -> Option<FetchEvent> {
        let worker_done = self
            .pending
            .as_ref()
            .map(|pending| pending.worker.is_finished())
            .unwrap_or(false);

        while let Ok(completion) = self.rx.try_recv() {
            if let Some(event) = self.accept(completion) {
                return Some(event);
            }
        }

        // A finished worker always sends before exiting, so if it is done and
        // nothing arrived for it, it panicked.
        if worker_done {
            if let Some(pending) = self.pending.take() {
                warn!(page = pending.page, "catalog worker exited without a result");
                return Some(FetchEvent::Failed(FetchError::WorkerLost { page: pending.page }));
            }
        }
        None
    }

    /// Block until the newest request completes or `timeout` elapses. Stale
    /// completions seen while waiting are discarded.
    pub fn wait(&mut self, timeout: Duration) -> Option<FetchEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return self.poll();
            }
            match self.rx.recv_timeout(remaining.min(WAIT_SLICE)) {
                Ok(completion) => {
                    if let Some(event) = self.accept(completion) {
                        return Some(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let worker_done = self
                        .pending
                        .as_ref()
                        .map(|pending| pending.worker.is_finished())
                        .unwrap_or(false);
                    if worker_done {
                        if let Some(event) = self.poll() {
                            return Some(event);
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn accept(&mut self, completion: Completion) -> Option<FetchEvent> {
        let is_current = self
            .pending
            .as_ref()
            .map(|pending| pending.ticket == completion.ticket)
            .unwrap_or(false);

        if !is_current {
            debug!(
                page = completion.page,
                ticket = completion.ticket,
                latest = self.next_ticket,
                "discarding stale catalog response"
            );
            return None;
        }

        self.pending = None;
        Some(match completion.result {
            Ok(batch) => {
                info!(
                    page = batch.page,
                    records = batch.records.len(),
                    "catalog page loaded"
                );
                FetchEvent::Loaded(batch)
            }
            Err(err) => {
                warn!(page = completion.page, error = %err, "catalog request failed");
                FetchEvent::Failed(err)
            }
        })
    }
}
