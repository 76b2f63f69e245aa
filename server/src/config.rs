use std::{env, sync::Arc};

use crate::store::ScoreStore;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";
pub(crate) const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<ScoreStore>,
    pub(crate) leaderboard_limit: usize,
}

pub(crate) fn read_env(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
