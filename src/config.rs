use std::{net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};

fn default_web_base() -> String {
    "/".to_string()
}

fn default_store_path() -> PathBuf {
    "./incidents.json".into()
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Config {
    pub prometheus_bind: Option<SocketAddr>,
    pub web_bind: SocketAddr,
    #[serde(default = "default_web_base")]
    pub web_base: String,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy)]
pub struct TimelineConfig {
    /// Offset from UTC, in minutes, used for wall-clock positions.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_incident_count() -> usize {
    15
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct SeedConfig {
    #[serde(default = "default_incident_count")]
    pub incident_count: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            incident_count: default_incident_count(),
        }
    }
}

lazy_static::lazy_static! {
    static ref CONFIG_PATH: PathBuf = {
        let var = std::env::var("INCIDENT_MONITOR_CONFIG").unwrap_or_default();
        if var.is_empty() {
            "./config.yaml".parse().unwrap()
        } else {
            var.parse().expect("invalid config path")
        }
    };
    pub static ref CONFIG: Config = {
        serde_yaml::from_str(&std::fs::read_to_string(&*CONFIG_PATH).expect("failed to read config file")).expect("failed to parse config file")
    };
}
