//! Specification upload: local checks, submission, and storage.

use std::path::Path;

use tracing::{info, warn};

use crate::api::{RtlBackend, UploadResult};
use crate::error::RtlForgeError;
use crate::spec_store::{KeyValueStore, SpecStore};
use crate::workflow::GenerationWorkflow;

/// Extensions accepted for specification documents.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["txt", "md", "yaml", "yml", "json"];

/// Largest accepted specification file (50 MiB).
pub const MAX_SPEC_FILE_BYTES: usize = 50 * 1024 * 1024;

/// Reject files the service would refuse anyway.
pub fn validate_spec_file(filename: &str, size: usize) -> Result<(), RtlForgeError> {
    if filename.trim().is_empty() {
        return Err(RtlForgeError::InvalidFile("file has no name".to_string()));
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        Some(ext) => {
            return Err(RtlForgeError::InvalidFile(format!(
                "unsupported extension '.{}' (supported: {})",
                ext,
                supported_list()
            )))
        }
        None => {
            return Err(RtlForgeError::InvalidFile(format!(
                "'{}' has no extension (supported: {})",
                filename,
                supported_list()
            )))
        }
    }

    if size == 0 {
        return Err(RtlForgeError::InvalidFile(format!("'{}' is empty", filename)));
    }
    if size > MAX_SPEC_FILE_BYTES {
        return Err(RtlForgeError::InvalidFile(format!(
            "'{}' is {} bytes, limit is {} bytes",
            filename, size, MAX_SPEC_FILE_BYTES
        )));
    }
    Ok(())
}

/// Validate, submit and, on success, overwrite the stored specification.
///
/// The store and any generation result are left untouched on failure. On
/// success the previous spec's generation result is dropped.
pub async fn upload_and_store<B, K>(
    backend: &B,
    store: &SpecStore<K>,
    workflow: &GenerationWorkflow,
    filename: &str,
    contents: Vec<u8>,
) -> Result<UploadResult, RtlForgeError>
where
    B: RtlBackend,
    K: KeyValueStore,
{
    validate_spec_file(filename, contents.len())?;

    let result = backend.upload_spec(filename, contents).await.map_err(|e| {
        warn!("Upload of '{}' failed: {}", filename, e);
        e
    })?;

    store.write(&result)?;
    workflow.invalidate();
    info!(
        "Upload of '{}' parsed: {} interfaces, {} protocols, {} parameters",
        result.filename,
        result.parsed_data.interfaces.len(),
        result.parsed_data.protocols.len(),
        result.parsed_data.parameters.len()
    );
    Ok(result)
}

/// Remove the stored specification and any result generated from it.
/// Returns whether a specification was stored.
pub fn clear_spec<K: KeyValueStore>(
    store: &SpecStore<K>,
    workflow: &GenerationWorkflow,
) -> Result<bool, RtlForgeError> {
    let existed = store.clear()?;
    workflow.invalidate();
    Ok(existed)
}

fn supported_list() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|e| format!(".{}", e))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_extensions() {
        for name in ["spec.txt", "SPEC.MD", "cfg.yaml", "cfg.yml", "regs.json"] {
            assert!(validate_spec_file(name, 10).is_ok(), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = validate_spec_file("design.pdf", 10).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(".pdf"), "got: {}", msg);
        assert!(msg.contains(".yaml"), "should list supported types: {}", msg);

        assert!(validate_spec_file("Makefile", 10).is_err());
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert!(validate_spec_file("spec.txt", 0).is_err());
        assert!(validate_spec_file("spec.txt", MAX_SPEC_FILE_BYTES).is_ok());
        assert!(validate_spec_file("spec.txt", MAX_SPEC_FILE_BYTES + 1).is_err());
        assert!(validate_spec_file("  ", 10).is_err());
    }
}
