//! Single-outstanding search requests
//!
//! A `SearchSlot` holds at most one in-flight search. Issuing a new request
//! cancels the previous one first: its task is aborted and its result channel
//! dropped, so a superseded result can never be observed. Ordering is decided
//! by cancellation alone, never by comparing timestamps.

use crate::error::{Error, Result};
use crate::geo::{PlacesSearch, SearchRequest};
use crate::place::Place;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

struct InFlight {
    request: SearchRequest,
    task: JoinHandle<()>,
    result: oneshot::Receiver<Result<Vec<Place>>>,
}

/// Holds the one search a consumer is waiting on
#[derive(Default)]
pub struct SearchSlot {
    name: &'static str,
    in_flight: Option<InFlight>,
}

impl SearchSlot {
    /// Create an empty slot; `name` only labels log lines
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            in_flight: None,
        }
    }

    /// Cancel any in-flight search and start `request` on a background task
    pub fn issue<S>(&mut self, search: &Arc<S>, request: SearchRequest)
    where
        S: PlacesSearch + 'static,
    {
        self.cancel();

        let (tx, rx) = oneshot::channel();
        let search = Arc::clone(search);
        let task_request = request.clone();
        let task = tokio::spawn(async move {
            let result = search.search(&task_request).await;
            // The receiver is gone if this request was cancelled
            let _ = tx.send(result);
        });

        debug!(slot = self.name, ?request, "search issued");
        self.in_flight = Some(InFlight {
            request,
            task,
            result: rx,
        });
    }

    /// Cancel the in-flight search, if any
    ///
    /// Safe to call when idle. Returns whether something was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.task.abort();
                debug!(slot = self.name, request = ?in_flight.request, "search cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    /// The request currently in flight
    pub fn pending_request(&self) -> Option<&SearchRequest> {
        self.in_flight.as_ref().map(|f| &f.request)
    }

    /// Wait for the in-flight search to finish
    ///
    /// Pends forever when idle, so it can sit in a `select!` next to other
    /// event sources. The slot is idle again once this returns.
    pub async fn completed(&mut self) -> Result<Vec<Place>> {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return std::future::pending().await;
        };

        let outcome = (&mut in_flight.result).await;
        self.in_flight = None;

        match outcome {
            Ok(result) => result,
            // Sender dropped without a result: the task panicked
            Err(_) => Err(Error::SearchFailed(format!(
                "{} search ended without a result",
                self.name
            ))),
        }
    }
}

impl Drop for SearchSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SearchSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSlot")
            .field("name", &self.name)
            .field("pending", &self.pending_request())
            .finish()
    }
}
