use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::RtlForgeError;
use crate::workflow::GenerationOutcome;

/// Which generated file to write out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Rtl,
    Testbench,
}

/// Keep `[A-Za-z0-9_]`, replace everything else, never return an empty name.
pub fn sanitize_module_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "design".to_string()
    } else {
        cleaned
    }
}

/// File name and contents for the requested artifact.
pub fn artifact_file(
    outcome: &GenerationOutcome,
    kind: ArtifactKind,
) -> Result<(String, String), RtlForgeError> {
    match kind {
        ArtifactKind::Rtl => {
            let rtl = &outcome.generation;
            if rtl.code.trim().is_empty() {
                return Err(RtlForgeError::NothingToExport(
                    "the RTL result has no code".to_string(),
                ));
            }
            Ok((
                format!("{}.v", sanitize_module_name(&rtl.module_name)),
                rtl.code.clone(),
            ))
        }
        ArtifactKind::Testbench => {
            let tb = outcome.testbench.as_ref().ok_or_else(|| {
                RtlForgeError::NothingToExport("no testbench was generated".to_string())
            })?;
            let stem = sanitize_module_name(&outcome.generation.module_name);
            Ok((format!("{}_tb.sv", stem), tb.testbench_code.clone()))
        }
    }
}

/// Write the artifact into `dir`, overwriting a previous export of the
/// same module.
pub fn export_to_dir(
    dir: &Path,
    outcome: &GenerationOutcome,
    kind: ArtifactKind,
) -> Result<PathBuf, RtlForgeError> {
    let (filename, contents) = artifact_file(outcome, kind)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, contents)?;
    info!("Exported {:?} to {:?}", kind, path);
    Ok(path)
}

/// The user's download directory, falling back to the home directory.
pub fn default_export_dir() -> Result<PathBuf, RtlForgeError> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| RtlForgeError::Config("No download or home directory found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GenerationResult, TestbenchResult, ValidationResult};
    use tempfile::TempDir;

    fn outcome(with_testbench: bool) -> GenerationOutcome {
        GenerationOutcome {
            generation: GenerationResult {
                code: "module uart_tx(input clk); endmodule".to_string(),
                module_name: "uart_tx".to_string(),
                explanation: String::new(),
                rag_context: vec![],
                validation_result: ValidationResult::default(),
            },
            testbench: with_testbench.then(|| TestbenchResult {
                testbench_code: "module uart_tx_tb; endmodule".to_string(),
                module_name: "uart_tx_tb".to_string(),
            }),
            testbench_error: None,
        }
    }

    #[test]
    fn test_sanitize_module_name() {
        assert_eq!(sanitize_module_name("axi_lite_ctrl"), "axi_lite_ctrl");
        assert_eq!(sanitize_module_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_module_name(" fifo-32 "), "fifo_32");
        assert_eq!(sanitize_module_name(""), "design");
        assert_eq!(sanitize_module_name("/.."), "design");
    }

    #[test]
    fn test_export_rtl_and_testbench() {
        let dir = TempDir::new().unwrap();
        let outcome = outcome(true);

        let rtl = export_to_dir(dir.path(), &outcome, ArtifactKind::Rtl).unwrap();
        assert_eq!(rtl.file_name().unwrap(), "uart_tx.v");
        assert_eq!(
            std::fs::read_to_string(&rtl).unwrap(),
            "module uart_tx(input clk); endmodule"
        );

        let tb = export_to_dir(dir.path(), &outcome, ArtifactKind::Testbench).unwrap();
        assert_eq!(tb.file_name().unwrap(), "uart_tx_tb.sv");
    }

    #[test]
    fn test_export_missing_testbench() {
        let dir = TempDir::new().unwrap();
        let err = export_to_dir(dir.path(), &outcome(false), ArtifactKind::Testbench).unwrap_err();
        assert!(matches!(err, RtlForgeError::NothingToExport(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
