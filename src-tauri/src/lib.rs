pub mod api;
mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod spec_store;
pub mod upload;
pub mod workflow;

pub use api::{RtlBackend, SpecToRtlClient};
pub use error::RtlForgeError;
pub use spec_store::{KeyValueStore, MemoryStore, SpecStore};
pub use workflow::{GenerationOutcome, GenerationPhase, GenerationWorkflow};

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(GenerationWorkflow::new())
        .invoke_handler(tauri::generate_handler![
            commands::config::get_preference,
            commands::config::set_preference,
            commands::spec::upload_spec,
            commands::spec::get_stored_spec,
            commands::spec::clear_stored_spec,
            commands::spec::get_upload_limits,
            commands::generate::generate_design,
            commands::generate::get_generation_state,
            commands::generate::reset_generation,
            commands::generate::export_artifact,
        ])
        .setup(|app| {
            if let Err(e) = commands::client_config(app.handle()) {
                tracing::warn!("Backend configuration is invalid: {}", e);
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
