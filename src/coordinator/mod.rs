// Issue one load per identifier and aggregate script completions into a single
// callback per `load` call.

mod batch;
mod request;

use tracing::{debug, info};

use crate::{
    config::{ConfigOptions, Configuration},
    loader::Loader,
    resolver,
};

pub use batch::{Callback, LoadBatch};
pub use request::{ResourceKind, ResourceRequest};

pub struct LoadCoordinator<L> {
    config: Configuration,
    loader: L,
}

impl<L: Loader> LoadCoordinator<L> {
    pub fn new(config: Configuration, loader: L) -> Self {
        LoadCoordinator { config, loader }
    }

    pub fn configure(&mut self, options: ConfigOptions) {
        self.config.configure(options);
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn resolve(&self, identifier: &str) -> String {
        resolver::resolve(identifier, &self.config)
    }

    // stylesheets are fire and forget, only scripts hold up the callback
    pub fn load<I, S>(&self, identifiers: I, callback: Option<Callback>) -> LoadBatch
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requests = identifiers
            .into_iter()
            .map(|identifier| ResourceRequest::new(identifier.as_ref(), &self.config))
            .collect::<Vec<_>>();

        info!("Loading batch of {} modules", requests.len());

        let batch = LoadBatch::new(requests.clone(), callback);

        for request in requests {
            debug!("Dispatching {}", request);

            match request.kind {
                ResourceKind::Script => {
                    let on_done = batch.completion_for(&request.resolved_url);
                    self.loader.load_script(&request.resolved_url, on_done);
                }
                ResourceKind::Stylesheet => self.loader.load_stylesheet(&request.resolved_url, None),
            }
        }

        if batch.tracked() == 0 {
            debug!("Batch has no scripts, its callback will not run");
        }

        batch
    }
}
