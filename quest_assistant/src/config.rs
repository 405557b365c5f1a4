use crate::api::DEFAULT_BASE_URL;
use std::env;
use std::path::PathBuf;

pub struct Config {
    pub base_url: String,
    pub bearer_file: PathBuf,
    pub refresh_file: PathBuf,
    pub proxy_file: PathBuf,
}

impl Config {
    // Every setting has a working default; the env vars exist so the file
    // locations and target host can be overridden without editing code.
    pub fn from_env() -> Self {
        Config {
            base_url: env::var("IDOS_BASE_URL").unwrap_or_else(|_| String::from(DEFAULT_BASE_URL)),
            bearer_file: path_var("BEARER_FILE", "bearer.txt"),
            refresh_file: path_var("REFRESH_FILE", "refresh.txt"),
            proxy_file: path_var("PROXY_FILE", "proxy.txt"),
        }
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    env::var(name).unwrap_or_else(|_| String::from(default)).into()
}
