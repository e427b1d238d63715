//! Wire types and HTTP access to the spec-to-RTL service.

pub mod client;
pub mod types;

use std::future::Future;

use crate::error::RtlForgeError;

pub use client::SpecToRtlClient;
pub use types::{
    GenerateRtlRequest, GenerationResult, OptimizationTarget, ParsedSpec, RagContextItem,
    RagMetadata, RequirementKey, Requirements, TestbenchRequest, TestbenchResult, UploadResult,
    ValidationResult,
};

/// The three calls the client makes against the generation service.
///
/// The workflow and upload logic are generic over this trait so they can run
/// against an in-process fake in tests.
pub trait RtlBackend: Send + Sync {
    /// `POST /api/v1/upload-spec` with a multipart `file` part.
    fn upload_spec(
        &self,
        filename: &str,
        contents: Vec<u8>,
    ) -> impl Future<Output = Result<UploadResult, RtlForgeError>> + Send;

    /// `POST /api/v1/generate-rtl`.
    fn generate_rtl(
        &self,
        request: &GenerateRtlRequest,
    ) -> impl Future<Output = Result<GenerationResult, RtlForgeError>> + Send;

    /// `POST /api/v1/generate-testbench`.
    fn generate_testbench(
        &self,
        request: &TestbenchRequest,
    ) -> impl Future<Output = Result<TestbenchResult, RtlForgeError>> + Send;
}
