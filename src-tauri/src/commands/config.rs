use tauri::AppHandle;
use tracing::{info, warn};

use super::open_store;
use crate::config::{
    ClientConfig, BACKEND_URL_KEY, OPTIMIZATION_TARGET_KEY, PREFERENCES_STORE,
    REQUEST_TIMEOUT_KEY,
};
use crate::spec_store::KeyValueStore;

#[tauri::command]
pub fn get_preference(app: AppHandle, key: &str) -> Result<Option<String>, String> {
    info!("Getting preference: {}", key);
    let store = open_store(&app, PREFERENCES_STORE)?;
    let value = KeyValueStore::get(&store, key).and_then(|v| v.as_str().map(|s| s.to_string()));
    Ok(value)
}

/// Save a preference. Connection settings are validated before they are
/// written so a bad value never reaches the store.
#[tauri::command]
pub fn set_preference(app: AppHandle, key: &str, value: &str) -> Result<(), String> {
    info!("Setting preference: {} = {}", key, value);
    if matches!(
        key,
        BACKEND_URL_KEY | REQUEST_TIMEOUT_KEY | OPTIMIZATION_TARGET_KEY
    ) {
        ClientConfig::resolve(
            |k| (k == key).then(|| value.to_string()),
            None,
        )
        .map_err(|e| {
            warn!("Rejected preference {}: {}", key, e);
            e.to_string()
        })?;
    }

    let store = open_store(&app, PREFERENCES_STORE)?;
    KeyValueStore::set(&store, key, serde_json::json!(value));
    KeyValueStore::save(&store).map_err(|e| {
        warn!("Failed to save store: {}", e);
        e.to_string()
    })
}
