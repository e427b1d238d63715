//! Tauri commands driving the generation workflow.

use tauri::{AppHandle, State};
use tracing::info;

use super::{client_config, open_store};
use crate::api::{Requirements, SpecToRtlClient};
use crate::error::{RtlForgeError, GENERATION_FALLBACK};
use crate::export::{default_export_dir, export_to_dir, ArtifactKind};
use crate::spec_store::{SpecStore, SESSION_STORE};
use crate::workflow::{GenerationOutcome, GenerationPhase, GenerationWorkflow};

/// Generate RTL and its testbench from the stored specification.
///
/// Rejected while another generation is running, and when no
/// specification has been uploaded.
#[tauri::command]
pub async fn generate_design(
    app: AppHandle,
    workflow: State<'_, GenerationWorkflow>,
    requirements: Requirements,
) -> Result<GenerationOutcome, String> {
    info!("Generate requested with requirements: {:?}", requirements);
    let session = SpecStore::new(open_store(&app, SESSION_STORE)?);
    let config = client_config(&app)?;
    let client = SpecToRtlClient::new(&config)?;

    workflow
        .run_stored(&client, &session, requirements, config.optimization_target)
        .await
        .map_err(|e| e.user_message(GENERATION_FALLBACK))
}

#[tauri::command]
pub fn get_generation_state(workflow: State<'_, GenerationWorkflow>) -> GenerationPhase {
    workflow.phase()
}

#[tauri::command]
pub fn reset_generation(workflow: State<'_, GenerationWorkflow>) -> Result<(), String> {
    info!("Resetting generation state");
    workflow.reset().map_err(String::from)
}

/// Write the current RTL or testbench to the download directory.
/// Returns the written path.
#[tauri::command]
pub fn export_artifact(
    workflow: State<'_, GenerationWorkflow>,
    kind: ArtifactKind,
) -> Result<String, String> {
    let phase = workflow.phase();
    let outcome = phase.outcome().ok_or_else(|| {
        RtlForgeError::NothingToExport("no finished generation".to_string())
    })?;
    let dir = default_export_dir()?;
    let path = export_to_dir(&dir, outcome, kind)?;
    Ok(path.to_string_lossy().to_string())
}
