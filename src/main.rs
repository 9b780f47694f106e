use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use modload::{
    config,
    worker::{Document, Worker},
    Callback, ConfigOptions, Configuration, LoadCoordinator,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
struct CLIArguments {
    /// TOML file with `base_url` and a `[paths]` alias table
    #[arg(short, long, default_value = "./modload.toml")]
    config: String,

    #[arg(short, long)]
    base_url: Option<String>,

    /// Alias as NAME=VALUE, may be repeated
    #[arg(short, long = "path", value_parser = parse_alias)]
    paths: Vec<(String, String)>,

    /// Directory local resources are read from
    #[arg(short, long, default_value = ".")]
    source: String,

    /// Location of the loader script itself, its directory is the initial base URL
    #[arg(long, default_value = "")]
    script_src: String,

    modules: Vec<String>,
}

fn parse_alias(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        _ => Err(format!("`{}` is not of the form NAME=VALUE", raw)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let CLIArguments {
        config: config_path,
        base_url,
        paths,
        source,
        script_src,
        modules,
    } = CLIArguments::parse();

    let document = if script_src.is_empty() {
        Document::new()
    } else {
        Document::with_script(&script_src)
    };

    // script location, then options file, then flags
    let mut configuration = Configuration::from_script_location(&document.current_script_src());
    configuration.configure(config::read(&PathBuf::from(config_path)).await?);
    configuration.configure(ConfigOptions {
        base_url,
        paths: Some(paths.into_iter().collect()),
    });

    info!(
        "Loading {} modules with base URL `{}` from `{}`.",
        modules.len(),
        configuration.base_url,
        source
    );

    let (worker, queue) = Worker::new(document);
    let worker_handle = tokio::spawn(worker.work(PathBuf::from(source)));

    let coordinator = LoadCoordinator::new(configuration, queue);

    let (send, recv) = oneshot::channel::<()>();
    let callback: Callback = Box::new(move || {
        let _ = send.send(()); // receiver may have given up
    });

    let batch = coordinator.load(&modules, Some(callback));

    if batch.tracked() == 0 {
        info!("No scripts in the batch, not waiting for the callback.");
    } else {
        recv.await
            .context("Batch callback was dropped before it ran!")?;
        info!("Batch callback ran.");
    }

    // closes the queue, the worker finishes in-flight fetches and returns
    drop(coordinator);
    let document = worker_handle
        .await
        .context("Failed to join the loader worker!")?;

    for (url, outcome) in batch.outcomes() {
        println!("{url}: {outcome}");
    }
    for element in document.elements() {
        println!("{element}");
    }

    let failures = batch.failures();
    if failures > 0 {
        anyhow::bail!("{} of {} scripts failed to load.", failures, batch.tracked())
    }

    Ok(())
}
