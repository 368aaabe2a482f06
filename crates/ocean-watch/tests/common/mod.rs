#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use ocean_watch::{App, AppConfig};

/// Directory of the listings shipped with the crate.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// An app over the shipped listings whose service answers immediately.
pub fn app() -> App {
    App::new(AppConfig::new(data_dir()).with_latency(Duration::ZERO))
}
