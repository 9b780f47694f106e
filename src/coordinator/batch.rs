use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::loader::{Completion, LoadOutcome};

use super::request::ResourceRequest;

pub type Callback = Box<dyn FnOnce() + Send + 'static>;

// One `load` call. The callback runs once, when the last tracked script settles; a
// batch with no scripts is settled from the start and never runs it.
#[derive(Clone)]
pub struct LoadBatch {
    inner: Arc<Mutex<BatchState>>,
}

struct BatchState {
    requests: Vec<ResourceRequest>,
    tracked: usize,
    pending: usize,

    // (url, outcome) in the order completions arrived
    outcomes: Vec<(String, LoadOutcome)>,

    callback: Option<Callback>,
    fired: bool,
}

impl LoadBatch {
    pub(super) fn new(requests: Vec<ResourceRequest>, callback: Option<Callback>) -> Self {
        // every script is counted before the first dispatch, so a loader signaling
        // synchronously cannot settle the batch early
        let tracked = requests.iter().filter(|r| r.is_script()).count();

        LoadBatch {
            inner: Arc::new(Mutex::new(BatchState {
                requests,
                tracked,
                pending: tracked,
                outcomes: Vec::with_capacity(tracked),
                callback,
                fired: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, BatchState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn completion_for(&self, url: &str) -> Completion {
        let batch = self.clone();
        let url = url.to_owned();
        Completion::new(move |outcome| batch.settle(url, outcome))
    }

    fn settle(&self, url: String, outcome: LoadOutcome) {
        if let LoadOutcome::Failed(reason) = &outcome {
            warn!("Script {} failed to load: {}", url, reason);
        }

        let callback = {
            let mut state = self.state();

            if state.pending == 0 {
                warn!("Ignoring completion for {} on a settled batch", url);
                return;
            }

            state.pending -= 1;
            state.outcomes.push((url, outcome));

            if state.pending == 0 && !state.fired {
                state.fired = true;
                info!("All {} scripts of the batch settled", state.tracked);
                state.callback.take()
            } else {
                None
            }
        }; // lock released before running user code

        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn requests(&self) -> Vec<ResourceRequest> {
        self.state().requests.clone()
    }

    pub fn tracked(&self) -> usize {
        self.state().tracked
    }

    pub fn pending(&self) -> usize {
        self.state().pending
    }

    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    pub fn outcomes(&self) -> Vec<(String, LoadOutcome)> {
        self.state().outcomes.clone()
    }

    pub fn failures(&self) -> usize {
        self.state()
            .outcomes
            .iter()
            .filter(|(_, outcome)| *outcome != LoadOutcome::Loaded)
            .count()
    }

    pub fn has_fired(&self) -> bool {
        self.state().fired
    }
}
