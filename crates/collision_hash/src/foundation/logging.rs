//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::config::CollisionConfig;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with an explicit filter (e.g. `"collision_hash=debug"`).
///
/// Later calls are ignored. `RUST_LOG` still wins when it is set.
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Initialize the logging system with the filter from a collision config
pub fn init_from_config(config: &CollisionConfig) {
    init_with_filter(&config.log_filter);
}
