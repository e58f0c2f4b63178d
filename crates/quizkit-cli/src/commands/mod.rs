pub mod create;
pub mod init;
pub mod list;
pub mod result;
pub mod results;
pub mod show;
pub mod take;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use quizkit_core::state::StateProvider;
use quizkit_store::QuizkitConfig;

/// Load the configuration and open the state provider it points at.
pub fn open(config_path: Option<&Path>) -> Result<(QuizkitConfig, StateProvider)> {
    let config = quizkit_store::load_config_from(config_path)?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        "opening store"
    );
    let provider = quizkit_store::open_provider(&config)?;
    Ok((config, provider))
}

pub fn time_limit_label(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) => format!("{m} min"),
        None => "none".to_string(),
    }
}
