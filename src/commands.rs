use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

/// Invoke a backend command and decode its result.
async fn call<A: Serialize, T: DeserializeOwned>(cmd: &str, args: &A) -> Result<T, String> {
    let args = serde_wasm_bindgen::to_value(args).map_err(|e| e.to_string())?;

    let result = invoke(cmd, args)
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| "Unknown error".to_string()))?;

    serde_wasm_bindgen::from_value(result)
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Invoke a backend command whose result carries no data.
async fn call_unit<A: Serialize>(cmd: &str, args: &A) -> Result<(), String> {
    let args = serde_wasm_bindgen::to_value(args).map_err(|e| e.to_string())?;

    invoke(cmd, args)
        .await
        .map(|_| ())
        .map_err(|e| e.as_string().unwrap_or_else(|| "Unknown error".to_string()))
}

#[derive(Serialize)]
struct NoArgs {}

// -- Specification types matching backend structs --

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ParsedSpec {
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub raw_text: String,
}

/// A parsed specification as returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadResult {
    pub filename: String,
    pub parsed_data: ParsedSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadLimits {
    pub extensions: Vec<String>,
    pub max_bytes: usize,
}

impl UploadLimits {
    /// Value for a file input's `accept` attribute.
    pub fn accept(&self) -> String {
        self.extensions.join(",")
    }

    /// Reject files the backend would refuse, before reading them over IPC.
    pub fn check(&self, filename: &str, size: usize) -> Result<(), String> {
        let lower = filename.to_lowercase();
        if !self.extensions.iter().any(|ext| lower.ends_with(ext.as_str())) {
            return Err(format!(
                "Unsupported file type. Allowed: {}",
                self.extensions.join(", ")
            ));
        }
        if size == 0 {
            return Err(format!("'{}' is empty", filename));
        }
        if size > self.max_bytes {
            return Err(format!(
                "'{}' is too large ({} MB max)",
                filename,
                self.max_bytes / (1024 * 1024)
            ));
        }
        Ok(())
    }
}

// -- Requirements --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKey {
    Interface,
    Protocol,
    Performance,
    Power,
    Additional,
}

/// Generation preferences entered on the Generate page.
/// Unset fields are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<String>,
}

impl Requirements {
    pub fn get(&self, key: RequirementKey) -> String {
        let value = match key {
            RequirementKey::Interface => &self.interface,
            RequirementKey::Protocol => &self.protocol,
            RequirementKey::Performance => &self.performance,
            RequirementKey::Power => &self.power,
            RequirementKey::Additional => &self.additional,
        };
        value.clone().unwrap_or_default()
    }

    /// Copy with one field replaced; an empty value unsets the field.
    pub fn with(&self, key: RequirementKey, value: String) -> Self {
        let value = if value.trim().is_empty() { None } else { Some(value) };
        let mut next = self.clone();
        match key {
            RequirementKey::Interface => next.interface = value,
            RequirementKey::Protocol => next.protocol = value,
            RequirementKey::Performance => next.performance = value,
            RequirementKey::Power => next.power = value,
            RequirementKey::Additional => next.additional = value,
        }
        next
    }
}

// -- Generation types matching backend structs --

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RagMetadata {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RagContextItem {
    pub text: String,
    #[serde(default)]
    pub metadata: RagMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub warning: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationResult {
    pub code: String,
    pub module_name: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub rag_context: Vec<RagContextItem>,
    #[serde(default)]
    pub validation_result: ValidationResult,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TestbenchResult {
    pub testbench_code: String,
    pub module_name: String,
}

/// RTL result plus the testbench, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationOutcome {
    pub generation: GenerationResult,
    pub testbench: Option<TestbenchResult>,
    pub testbench_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum GenerationPhase {
    #[default]
    Idle,
    Generating,
    Succeeded { outcome: GenerationOutcome },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Rtl,
    Testbench,
}

// -- Arg structs for serialization --

#[derive(Serialize)]
struct GetPreferenceArgs {
    key: String,
}

#[derive(Serialize)]
struct SetPreferenceArgs {
    key: String,
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadSpecArgs {
    filename: String,
    contents_base64: String,
}

#[derive(Serialize)]
struct GenerateDesignArgs {
    requirements: Requirements,
}

#[derive(Serialize)]
struct ExportArtifactArgs {
    kind: ArtifactKind,
}

// -- Preferences --

pub async fn get_preference(key: &str) -> Result<Option<String>, String> {
    call(
        "get_preference",
        &GetPreferenceArgs {
            key: key.to_string(),
        },
    )
    .await
}

pub async fn set_preference(key: &str, value: &str) -> Result<(), String> {
    call_unit(
        "set_preference",
        &SetPreferenceArgs {
            key: key.to_string(),
            value: value.to_string(),
        },
    )
    .await
}

// -- Specification --

/// Upload a specification file (base64-encoded) and store the parsed result.
/// Errors carry the server's detail text when available.
pub async fn upload_spec(filename: &str, contents_base64: String) -> Result<UploadResult, String> {
    call(
        "upload_spec",
        &UploadSpecArgs {
            filename: filename.to_string(),
            contents_base64,
        },
    )
    .await
}

pub async fn get_stored_spec() -> Result<Option<UploadResult>, String> {
    call("get_stored_spec", &NoArgs {}).await
}

/// Remove the stored specification. Returns whether one existed.
pub async fn clear_stored_spec() -> Result<bool, String> {
    call("clear_stored_spec", &NoArgs {}).await
}

pub async fn get_upload_limits() -> Result<UploadLimits, String> {
    call("get_upload_limits", &NoArgs {}).await
}

// -- Generation --

/// Generate RTL and then its testbench from the stored specification.
/// Resolves once both calls have finished.
pub async fn generate_design(requirements: Requirements) -> Result<GenerationOutcome, String> {
    call("generate_design", &GenerateDesignArgs { requirements }).await
}

pub async fn get_generation_state() -> Result<GenerationPhase, String> {
    call("get_generation_state", &NoArgs {}).await
}

pub async fn reset_generation() -> Result<(), String> {
    call_unit("reset_generation", &NoArgs {}).await
}

/// Write the current RTL or testbench to the downloads folder.
/// Returns the path written.
pub async fn export_artifact(kind: ArtifactKind) -> Result<String, String> {
    call("export_artifact", &ExportArtifactArgs { kind }).await
}
