use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{error, info};
use url::Url;

use super::types::{
    GenerateRtlRequest, GenerationResult, TestbenchRequest, TestbenchResult, UploadResult,
};
use super::RtlBackend;
use crate::config::ClientConfig;
use crate::error::RtlForgeError;

pub const UPLOAD_SPEC_PATH: &str = "api/v1/upload-spec";
pub const GENERATE_RTL_PATH: &str = "api/v1/generate-rtl";
pub const GENERATE_TESTBENCH_PATH: &str = "api/v1/generate-testbench";

/// Longest error body kept in logs.
const MAX_LOGGED_BODY: usize = 1024;

/// HTTP client for the spec-to-RTL service.
///
/// Requests are sent once; resubmission is always left to the user.
pub struct SpecToRtlClient {
    client: reqwest::Client,
    base_url: Url,
}

impl SpecToRtlClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RtlForgeError> {
        let mut builder = reqwest::Client::builder().user_agent("RTLForge/0.1");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RtlForgeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Absolute URL for an endpoint path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, RtlForgeError> {
        self.base_url.join(path).map_err(|e| {
            RtlForgeError::Config(format!(
                "Cannot join '{}' onto backend URL {}: {}",
                path, self.base_url, e
            ))
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RtlForgeError> {
        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            error!("Request to {} failed: {}", path, message);
            RtlForgeError::Transport {
                endpoint: path.to_string(),
                message,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "{} returned {}: {}",
                path,
                status,
                truncate(&body, MAX_LOGGED_BODY)
            );
            return Err(RtlForgeError::Server {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to decode {} response: {}", path, e);
            RtlForgeError::Decode {
                endpoint: path.to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl RtlBackend for SpecToRtlClient {
    async fn upload_spec(
        &self,
        filename: &str,
        contents: Vec<u8>,
    ) -> Result<UploadResult, RtlForgeError> {
        let url = self.endpoint(UPLOAD_SPEC_PATH)?;
        info!("Uploading '{}' ({} bytes) to {}", filename, contents.len(), url);
        let part = Part::bytes(contents).file_name(filename.to_string());
        let form = Form::new().part("file", part);
        self.send(UPLOAD_SPEC_PATH, self.client.post(url).multipart(form))
            .await
    }

    async fn generate_rtl(
        &self,
        request: &GenerateRtlRequest,
    ) -> Result<GenerationResult, RtlForgeError> {
        let url = self.endpoint(GENERATE_RTL_PATH)?;
        info!(
            "Requesting RTL generation ({} chars of spec, target {})",
            request.spec_text.len(),
            request.optimization_target
        );
        self.send(GENERATE_RTL_PATH, self.client.post(url).json(request))
            .await
    }

    async fn generate_testbench(
        &self,
        request: &TestbenchRequest,
    ) -> Result<TestbenchResult, RtlForgeError> {
        let url = self.endpoint(GENERATE_TESTBENCH_PATH)?;
        info!("Requesting testbench for module '{}'", request.module_name);
        self.send(GENERATE_TESTBENCH_PATH, self.client.post(url).json(request))
            .await
    }
}

/// Pull a human-readable message out of an error body.
///
/// Handles `{"detail": "..."}`, FastAPI validation arrays
/// (`{"detail": [{"msg": "..."}]}`) and `{"message": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;

    match &json["detail"] {
        serde_json::Value::String(s) if !s.trim().is_empty() => return Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item["msg"].as_str())
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }

    json["message"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> SpecToRtlClient {
        let config = ClientConfig {
            base_url: Url::parse(base).unwrap(),
            ..ClientConfig::default()
        };
        SpecToRtlClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base() {
        let client = client_for("http://localhost:8000/");
        assert_eq!(
            client.endpoint(UPLOAD_SPEC_PATH).unwrap().as_str(),
            "http://localhost:8000/api/v1/upload-spec"
        );

        let client = client_for("https://gw.example.com/rtl/");
        assert_eq!(
            client.endpoint(GENERATE_TESTBENCH_PATH).unwrap().as_str(),
            "https://gw.example.com/rtl/api/v1/generate-testbench"
        );
    }

    #[test]
    fn test_extract_detail_string() {
        let body = r#"{"detail": "Unsupported file type: .exe"}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Unsupported file type: .exe")
        );
    }

    #[test]
    fn test_extract_detail_validation_array() {
        let body = r#"{"detail": [
            {"loc": ["body", "spec_text"], "msg": "Specification text must be at least 10 characters long"},
            {"loc": ["body", "module_name"], "msg": "field required"}
        ]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Specification text must be at least 10 characters long; field required")
        );
    }

    #[test]
    fn test_extract_detail_message_and_missing() {
        assert_eq!(
            extract_detail(r#"{"error": "internal", "message": "LLM unavailable"}"#).as_deref(),
            Some("LLM unavailable")
        );
        assert_eq!(extract_detail(r#"{"detail": ""}"#), None);
        assert_eq!(extract_detail("<html>502 Bad Gateway</html>"), None);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "é".repeat(10);
        let out = truncate(&body, 5);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 5 + 3);
        assert_eq!(truncate("short", 10), "short");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = client_for("http://127.0.0.1:9/");
        let err = client
            .generate_testbench(&TestbenchRequest {
                rtl_code: "module m; endmodule".to_string(),
                module_name: "m".to_string(),
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, RtlForgeError::Transport { ref endpoint, .. } if endpoint == GENERATE_TESTBENCH_PATH),
            "got: {:?}",
            err
        );
    }
}
