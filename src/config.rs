use crate::commandline::CliArgs;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use z906_lib::client;

fn default_device_name() -> String {
    if cfg!(target_os = "windows") {
        String::from("COM1")
    } else {
        String::from("/dev/ttyUSB0")
    }
}

/// Contents of the optional YAML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub device: Option<String>,
    #[serde(flatten)]
    pub link: client::Config,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        log::debug!("Loading config file from {path:?}");
        let file =
            File::open(path).with_context(|| format!("Cannot open config file {path:?}"))?;
        serde_yaml::from_reader(file).with_context(|| format!("Cannot parse config file {path:?}"))
    }
}

/// Effective connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub device: String,
    pub link: client::Config,
}

impl Settings {
    /// Command line options win over the config file, which wins over defaults.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let file = match &args.config_file {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &CliArgs, file: FileConfig) -> Self {
        Self {
            device: args
                .device
                .clone()
                .or(file.device)
                .unwrap_or_else(default_device_name),
            link: client::Config {
                timeout: args.timeout.unwrap_or(file.link.timeout),
                deadtime: args.deadtime.unwrap_or(file.link.deadtime),
            },
        }
    }
}
