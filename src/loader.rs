use std::fmt::Display;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
}

impl Display for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use LoadOutcome::*;
        match self {
            Loaded => f.write_str("loaded"),
            Failed(reason) => f.write_fmt(format_args!("failed ({reason})")),
        }
    }
}

type Handler = Box<dyn FnOnce(LoadOutcome) + Send + 'static>;

// Completion handler for one request. Consumed on use, so it cannot be signaled twice;
// dropped unsignaled, it reports a failure.
pub struct Completion(Option<Handler>);

const DROPPED_REASON: &str = "completion dropped before the load finished";

impl Completion {
    pub fn new(f: impl FnOnce(LoadOutcome) + Send + 'static) -> Self {
        Completion(Some(Box::new(f)))
    }

    pub fn signal(mut self, outcome: LoadOutcome) {
        if let Some(handler) = self.0.take() {
            handler(outcome)
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(handler) = self.0.take() {
            handler(LoadOutcome::Failed(DROPPED_REASON.to_owned()))
        }
    }
}

/// Whatever actually injects scripts and stylesheets into a host document.
pub trait Loader {
    /// Fetch and run a script, then signal `on_done` exactly once, whether it worked
    /// or not.
    fn load_script(&self, url: &str, on_done: Completion);

    /// Inject a stylesheet. `on_done`, if given, is best effort and may never fire.
    fn load_stylesheet(&self, url: &str, on_done: Option<Completion>);
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording() -> (Arc<Mutex<Vec<LoadOutcome>>>, Completion) {
        let seen = Arc::new(Mutex::new(vec![]));
        let seen_ = seen.clone();
        let completion = Completion::new(move |outcome| seen_.lock().unwrap().push(outcome));
        (seen, completion)
    }

    #[test]
    fn signal_runs_the_handler_once() {
        let (seen, completion) = recording();
        completion.signal(LoadOutcome::Loaded);
        assert_eq!(*seen.lock().unwrap(), vec![LoadOutcome::Loaded]);
    }

    #[test]
    fn unsignaled_completion_reports_failure_on_drop() {
        let (seen, completion) = recording();
        drop(completion);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![LoadOutcome::Failed(DROPPED_REASON.to_owned())]
        );
    }

    #[test]
    fn completion_dropped_by_a_panicking_task() {
        let (seen, completion) = recording();
        let result = std::thread::spawn(move || {
            let _held = completion;
            panic!("fetch blew up");
        })
        .join();

        assert!(result.is_err());
        // the handler ran while unwinding, which poisons the lock
        let seen = seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        assert!(matches!(
            seen.as_slice(),
            [LoadOutcome::Failed(_)]
        ));
    }
}
