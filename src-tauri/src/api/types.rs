use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Structured fields the backend extracted from an uploaded specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSpec {
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub protocols: Vec<String>,
    /// Parameter values are rendered to strings even when the server sends
    /// numbers or booleans (e.g. `{"WIDTH": 32}`).
    #[serde(default, deserialize_with = "stringly_map")]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub raw_text: String,
}

/// Response of `POST /api/v1/upload-spec`, persisted as `specData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    pub parsed_data: ParsedSpec,
}

/// The fixed set of designer preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKey {
    Interface,
    Protocol,
    Performance,
    Power,
    Additional,
}

impl RequirementKey {
    pub const ALL: [RequirementKey; 5] = [
        RequirementKey::Interface,
        RequirementKey::Protocol,
        RequirementKey::Performance,
        RequirementKey::Power,
        RequirementKey::Additional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementKey::Interface => "interface",
            RequirementKey::Protocol => "protocol",
            RequirementKey::Performance => "performance",
            RequirementKey::Power => "power",
            RequirementKey::Additional => "additional",
        }
    }
}

/// Designer-entered generation preferences.
///
/// Unset keys are absent on the wire rather than sent as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
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
    pub fn get(&self, key: RequirementKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Return a copy with `key` replaced. Blank values unset the key.
    pub fn with(&self, key: RequirementKey, value: &str) -> Self {
        let mut next = self.clone();
        *next.slot_mut(key) = if value.trim().is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        next
    }

    pub fn is_empty(&self) -> bool {
        RequirementKey::ALL.iter().all(|k| self.get(*k).is_none())
    }

    fn slot(&self, key: RequirementKey) -> &Option<String> {
        match key {
            RequirementKey::Interface => &self.interface,
            RequirementKey::Protocol => &self.protocol,
            RequirementKey::Performance => &self.performance,
            RequirementKey::Power => &self.power,
            RequirementKey::Additional => &self.additional,
        }
    }

    fn slot_mut(&mut self, key: RequirementKey) -> &mut Option<String> {
        match key {
            RequirementKey::Interface => &mut self.interface,
            RequirementKey::Protocol => &mut self.protocol,
            RequirementKey::Performance => &mut self.performance,
            RequirementKey::Power => &mut self.power,
            RequirementKey::Additional => &mut self.additional,
        }
    }
}

/// Primary PPA goal passed to the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationTarget {
    Power,
    Performance,
    Area,
    #[default]
    Balanced,
}

impl OptimizationTarget {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "power" => Some(OptimizationTarget::Power),
            "performance" => Some(OptimizationTarget::Performance),
            "area" => Some(OptimizationTarget::Area),
            "balanced" => Some(OptimizationTarget::Balanced),
            _ => None,
        }
    }
}

impl fmt::Display for OptimizationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptimizationTarget::Power => "power",
            OptimizationTarget::Performance => "performance",
            OptimizationTarget::Area => "area",
            OptimizationTarget::Balanced => "balanced",
        };
        f.write_str(s)
    }
}

/// Body of `POST /api/v1/generate-rtl`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRtlRequest {
    pub spec_text: String,
    pub requirements: Requirements,
    pub optimization_target: OptimizationTarget,
}

/// Provenance metadata for a retrieved snippet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagMetadata {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagContextItem {
    pub text: String,
    #[serde(default)]
    pub metadata: RagMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub warning: String,
}

/// Response of `POST /api/v1/generate-rtl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Body of `POST /api/v1/generate-testbench`.
#[derive(Debug, Clone, Serialize)]
pub struct TestbenchRequest {
    pub rtl_code: String,
    pub module_name: String,
}

impl TestbenchRequest {
    pub fn for_generation(result: &GenerationResult) -> Self {
        Self {
            rtl_code: result.code.clone(),
            module_name: result.module_name.clone(),
        }
    }
}

/// Response of `POST /api/v1/generate-testbench`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestbenchResult {
    pub testbench_code: String,
    pub module_name: String,
}

fn stringly_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| {
            let rendered = match v {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (k, rendered)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_result_parses_example_response() {
        let body = json!({
            "filename": "spec.txt",
            "parsed_data": {
                "interfaces": ["AXI4"],
                "protocols": [],
                "parameters": {"WIDTH": "32"},
                "raw_text": "A 32-bit AXI4 slave"
            }
        });
        let result: UploadResult = serde_json::from_value(body).unwrap();
        assert_eq!(result.filename, "spec.txt");
        assert_eq!(result.parsed_data.interfaces, vec!["AXI4"]);
        assert!(result.parsed_data.protocols.is_empty());
        assert_eq!(result.parsed_data.parameters.get("WIDTH").unwrap(), "32");
    }

    #[test]
    fn test_parameters_accept_non_string_values() {
        let body = json!({
            "filename": "fifo.yaml",
            "parsed_data": {
                "parameters": {"DEPTH": 16, "REGISTERED": true, "NAME": null}
            }
        });
        let result: UploadResult = serde_json::from_value(body).unwrap();
        let params = &result.parsed_data.parameters;
        assert_eq!(params["DEPTH"], "16");
        assert_eq!(params["REGISTERED"], "true");
        assert_eq!(params["NAME"], "");
        assert!(result.parsed_data.raw_text.is_empty());
    }

    #[test]
    fn test_requirements_omit_unset_keys() {
        let req = Requirements::default().with(RequirementKey::Interface, "AXI4");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"interface": "AXI4"}));
    }

    #[test]
    fn test_requirements_edits_commute() {
        let base = Requirements::default();
        let a = base
            .with(RequirementKey::Interface, "AXI4")
            .with(RequirementKey::Protocol, "AMBA AXI");
        let b = base
            .with(RequirementKey::Protocol, "AMBA AXI")
            .with(RequirementKey::Interface, "AXI4");
        assert_eq!(a, b);
    }

    #[test]
    fn test_requirements_edit_does_not_mutate_original() {
        let base = Requirements::default().with(RequirementKey::Power, "Low Power");
        let next = base.with(RequirementKey::Power, "Balanced");
        assert_eq!(base.get(RequirementKey::Power), Some("Low Power"));
        assert_eq!(next.get(RequirementKey::Power), Some("Balanced"));
    }

    #[test]
    fn test_blank_value_unsets_key() {
        let req = Requirements::default()
            .with(RequirementKey::Additional, "needs parity")
            .with(RequirementKey::Additional, "   ");
        assert_eq!(req.get(RequirementKey::Additional), None);
        assert!(req.is_empty());
    }

    #[test]
    fn test_optimization_target_wire_format() {
        let req = GenerateRtlRequest {
            spec_text: "spec".to_string(),
            requirements: Requirements::default(),
            optimization_target: OptimizationTarget::default(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["optimization_target"], "balanced");
        assert_eq!(value["requirements"], json!({}));
        assert_eq!(OptimizationTarget::parse(" Area "), Some(OptimizationTarget::Area));
        assert_eq!(OptimizationTarget::parse("speed"), None);
    }

    #[test]
    fn test_generation_result_tolerates_sparse_metadata() {
        let body = json!({
            "code": "module fifo; endmodule",
            "module_name": "fifo",
            "explanation": "A FIFO",
            "rag_context": [
                {"text": "FIFO pattern", "metadata": {"source": "patterns.md", "type": "pattern"}},
                {"text": "no metadata"}
            ],
            "validation_result": {"valid": false, "issues": ["Missing endmodule"]}
        });
        let result: GenerationResult = serde_json::from_value(body).unwrap();
        assert_eq!(result.rag_context.len(), 2);
        assert_eq!(result.rag_context[0].metadata.kind.as_deref(), Some("pattern"));
        assert_eq!(result.rag_context[1].metadata, RagMetadata::default());
        assert!(!result.validation_result.valid);
        assert!(result.validation_result.warning.is_empty());
    }
}
