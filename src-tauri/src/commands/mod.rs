pub mod config;
pub mod generate;
pub mod spec;

use std::sync::Arc;

use tauri::{AppHandle, Runtime};
use tauri_plugin_store::{Store, StoreExt};
use tracing::warn;

use crate::config::{ClientConfig, PREFERENCES_STORE};
use crate::error::RtlForgeError;

pub(crate) fn open_store<R: Runtime>(
    app: &AppHandle<R>,
    name: &str,
) -> Result<Arc<Store<R>>, RtlForgeError> {
    app.store(name).map_err(|e| {
        warn!("Failed to open store {}: {}", name, e);
        RtlForgeError::Store(e.to_string())
    })
}

pub(crate) fn client_config<R: Runtime>(app: &AppHandle<R>) -> Result<ClientConfig, RtlForgeError> {
    let prefs = open_store(app, PREFERENCES_STORE)?;
    ClientConfig::from_store(&prefs)
}
