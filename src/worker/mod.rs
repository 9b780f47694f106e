mod document;
mod loaders;
mod resource_path;

use std::path::PathBuf;

use tokio::{sync::mpsc, task::JoinSet};
use tracing::{info, warn};

use crate::loader::{Completion, LoadOutcome, Loader};

pub use document::{Document, Element, ElementId, ElementKind, ElementState};
pub use resource_path::ResourcePath;

struct LoadTask {
    element: ElementKind,
    chan: Option<Completion>,
}

pub struct Worker {
    queue: mpsc::UnboundedReceiver<LoadTask>,
    document: Document,
}

#[derive(Clone)]
pub struct SubmitQueue(mpsc::UnboundedSender<LoadTask>);

impl SubmitQueue {
    fn submit(&self, element: ElementKind, chan: Option<Completion>) {
        info!("Queueing fetch for {}", element.url());

        let task = LoadTask { element, chan };

        if let Err(mpsc::error::SendError(task)) = self.0.send(task) {
            warn!("Worker is gone, dropping {}", task.element.url());
            if let Some(chan) = task.chan {
                chan.signal(LoadOutcome::Failed("loader worker stopped".to_owned()));
            }
        }
    }
}

impl Loader for SubmitQueue {
    fn load_script(&self, url: &str, on_done: Completion) {
        self.submit(ElementKind::script(url), Some(on_done));
    }

    fn load_stylesheet(&self, url: &str, on_done: Option<Completion>) {
        self.submit(ElementKind::stylesheet(url), on_done);
    }
}

impl Worker {
    pub fn new(document: Document) -> (Self, SubmitQueue) {
        let (submit_queue, ingest_queue) = mpsc::unbounded_channel();

        (
            Worker {
                queue: ingest_queue,
                document,
            },
            SubmitQueue(submit_queue),
        )
    }

    // Runs until every queue handle is dropped and all fetches are over
    pub async fn work(self, source: PathBuf) -> Document {
        let Worker {
            mut queue,
            mut document,
        } = self;

        let mut fetches = JoinSet::new();
        let mut open = true;

        loop {
            tokio::select! {
                task = queue.recv(), if open => {
                    let Some(LoadTask { element, chan }) = task else {
                        // channel closed, only in-flight fetches left
                        open = false;
                        continue;
                    };

                    let url = element.url().to_owned();
                    let id = document.insert(element);
                    let source_ = source.clone();

                    fetches.spawn(async move {
                        let result = loaders::load_any(source_, url).await;
                        (id, result, chan)
                    });
                }

                Some(joined) = fetches.join_next() => {
                    let (id, result, chan) = match joined {
                        Ok(done) => done,
                        Err(err) => {
                            // the task's completion already reported the failure on drop
                            warn!("Fetch task did not finish: {}", err);
                            continue;
                        }
                    };

                    let (state, outcome) = match result {
                        Ok(bytes) => (ElementState::Loaded { bytes }, LoadOutcome::Loaded),
                        Err(err) => {
                            let reason = format!("{:#}", err);
                            (ElementState::Failed(reason.clone()), LoadOutcome::Failed(reason))
                        }
                    };

                    document.set_state(id, state);
                    if let Some(element) = document.get(id) {
                        info!("{}", element);
                    }

                    if let Some(chan) = chan {
                        chan.signal(outcome);
                    }
                }

                else => break,
            }
        }

        document
    }
}
