//! Tauri commands for uploading and managing the stored specification.

use base64::Engine;
use serde::Serialize;
use tauri::{AppHandle, State};
use tracing::{info, warn};

use super::{client_config, open_store};
use crate::api::{SpecToRtlClient, UploadResult};
use crate::error::{RtlForgeError, UPLOAD_FALLBACK};
use crate::spec_store::{SpecStore, SESSION_STORE};
use crate::upload::{clear_spec, upload_and_store, ALLOWED_EXTENSIONS, MAX_SPEC_FILE_BYTES};
use crate::workflow::GenerationWorkflow;

/// Limits the UI shows next to the drop zone.
#[derive(Debug, Clone, Serialize)]
pub struct UploadLimits {
    pub extensions: Vec<String>,
    pub max_bytes: usize,
}

/// Upload a specification file and store the parsed result.
///
/// `contents_base64` is the raw file, base64-encoded by the frontend.
/// Errors carry the server's detail text when it sent one. A successful
/// upload drops the result generated from the previous specification.
#[tauri::command]
pub async fn upload_spec(
    app: AppHandle,
    workflow: State<'_, GenerationWorkflow>,
    filename: String,
    contents_base64: String,
) -> Result<UploadResult, String> {
    info!("Uploading specification: {}", filename);
    let contents = base64::engine::general_purpose::STANDARD
        .decode(contents_base64.as_bytes())
        .map_err(|e| {
            RtlForgeError::InvalidFile(format!("could not decode file contents: {}", e))
        })?;

    let config = client_config(&app)?;
    let client = SpecToRtlClient::new(&config)?;
    let store = SpecStore::new(open_store(&app, SESSION_STORE)?);

    upload_and_store(&client, &store, workflow.inner(), &filename, contents)
        .await
        .map_err(|e| e.user_message(UPLOAD_FALLBACK))
}

#[tauri::command]
pub fn get_stored_spec(app: AppHandle) -> Result<Option<UploadResult>, String> {
    let store = SpecStore::new(open_store(&app, SESSION_STORE)?);
    let spec = store.read();
    info!(
        "Loaded stored specification: {}",
        spec.as_ref().map(|s| s.filename.as_str()).unwrap_or("<none>")
    );
    Ok(spec)
}

#[tauri::command]
pub fn clear_stored_spec(
    app: AppHandle,
    workflow: State<'_, GenerationWorkflow>,
) -> Result<bool, String> {
    let store = SpecStore::new(open_store(&app, SESSION_STORE)?);
    clear_spec(&store, workflow.inner()).map_err(|e| {
        warn!("Failed to clear stored specification: {}", e);
        e.to_string()
    })
}

#[tauri::command]
pub fn get_upload_limits() -> UploadLimits {
    UploadLimits {
        extensions: ALLOWED_EXTENSIONS.iter().map(|e| format!(".{}", e)).collect(),
        max_bytes: MAX_SPEC_FILE_BYTES,
    }
}
