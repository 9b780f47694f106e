use std::{collections::HashMap, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

// `base_url` is either empty or ends with exactly one `/`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    pub base_url: String,
    pub paths: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConfigOptions {
    pub base_url: Option<String>,
    pub paths: Option<HashMap<String, String>>,
}

impl Configuration {
    // base URL is the directory of the loader's own script
    pub fn from_script_location(script_src: &str) -> Self {
        let base_url = match script_src.rfind('/') {
            Some(index) => script_src[..=index].to_owned(),
            None => String::new(),
        };

        Configuration {
            base_url,
            paths: HashMap::new(),
        }
    }

    pub fn configure(&mut self, options: ConfigOptions) {
        if let Some(mut base_url) = options.base_url {
            if !base_url.is_empty() && !base_url.ends_with('/') {
                base_url.push('/');
            }
            debug!("Base URL set to `{}`", base_url);
            self.base_url = base_url;
        }

        // merge, never clear
        if let Some(paths) = options.paths {
            for (name, path) in paths {
                debug!("Alias `{}` -> `{}`", name, path);
                self.paths.insert(name, path);
            }
        }
    }

    pub fn with(mut self, options: ConfigOptions) -> Self {
        self.configure(options);
        self
    }
}

impl ConfigOptions {
    pub fn base_url<T: ToString>(base_url: T) -> Self {
        ConfigOptions {
            base_url: Some(base_url.to_string()),
            paths: None,
        }
    }

    pub fn alias<T: ToString, U: ToString>(mut self, name: T, path: U) -> Self {
        self.paths
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), path.to_string());
        self
    }
}

pub async fn read(path: &PathBuf) -> anyhow::Result<ConfigOptions> {
    // Fails only if the file is present but fails to parse. A missing file just
    // returns empty options.

    let path_str = path.display();

    let contents = tokio::fs::read_to_string(path)
        .await
        .unwrap_or("".to_owned());

    toml::from_str::<ConfigOptions>(&contents)
        .context(format!("Failed to parse options in file {}.", path_str))
}
