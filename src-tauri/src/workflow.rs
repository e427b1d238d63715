//! RTL + testbench generation state machine.
//!
//! ```text
//! Idle ──run──> Generating ──rtl ok──> (testbench call) ──> Succeeded
//!                    │                                         │
//!                    └──rtl err──> Failed <────── run again ───┘
//! ```
//!
//! The phase held here is authoritative: a second `run` while generating is
//! rejected before any request is sent. A result always belongs to the spec
//! that was current when its run began; replacing or clearing the spec
//! drops it (see [`GenerationWorkflow::invalidate`]).

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::{
    GenerateRtlRequest, GenerationResult, OptimizationTarget, Requirements, RtlBackend,
    TestbenchRequest, TestbenchResult, UploadResult,
};
use crate::error::{RtlForgeError, GENERATION_FALLBACK};
use crate::spec_store::{KeyValueStore, SpecStore};

const TESTBENCH_FALLBACK: &str = "Testbench generation failed";
const INTERRUPTED: &str = "Generation was interrupted";

/// Everything a finished generation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub generation: GenerationResult,
    /// `None` when the testbench call failed or was skipped.
    pub testbench: Option<TestbenchResult>,
    pub testbench_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum GenerationPhase {
    #[default]
    Idle,
    Generating,
    Succeeded { outcome: GenerationOutcome },
    Failed { message: String },
}

impl GenerationPhase {
    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        match self {
            GenerationPhase::Succeeded { outcome } => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct WorkflowState {
    phase: GenerationPhase,
    /// Bumped whenever the stored spec is replaced or cleared.
    spec_epoch: u64,
}

/// Owner of the single current generation per session.
#[derive(Debug, Default)]
pub struct GenerationWorkflow {
    state: Mutex<WorkflowState>,
}

impl GenerationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GenerationPhase {
        self.lock().phase.clone()
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.lock().phase, GenerationPhase::Generating)
    }

    /// Drop any finished result and return to `Idle`.
    pub fn reset(&self) -> Result<(), RtlForgeError> {
        let mut state = self.lock();
        if matches!(state.phase, GenerationPhase::Generating) {
            return Err(RtlForgeError::GenerationInProgress);
        }
        state.phase = GenerationPhase::Idle;
        Ok(())
    }

    /// The stored spec was replaced or cleared.
    ///
    /// A finished result is dropped immediately. A run in flight keeps
    /// going, but its result is discarded when it completes.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.spec_epoch += 1;
        match state.phase {
            GenerationPhase::Generating => {
                info!("Specification changed during generation; its result will be discarded")
            }
            GenerationPhase::Idle => {}
            _ => {
                info!("Specification changed; dropping previous generation result");
                state.phase = GenerationPhase::Idle;
            }
        }
    }

    /// Generate from the spec currently in `store`.
    ///
    /// Fails without any request when a run is already in flight or no
    /// specification has been uploaded; the phase is left untouched.
    pub async fn run_stored<B, K>(
        &self,
        backend: &B,
        store: &SpecStore<K>,
        requirements: Requirements,
        optimization_target: OptimizationTarget,
    ) -> Result<GenerationOutcome, RtlForgeError>
    where
        B: RtlBackend,
        K: KeyValueStore,
    {
        if self.is_generating() {
            warn!("Rejected generation request: one is already running");
            return Err(RtlForgeError::GenerationInProgress);
        }
        let spec = store.read().ok_or_else(|| {
            warn!("Rejected generation request: no specification stored");
            RtlForgeError::MissingSpecification
        })?;
        self.run(backend, &spec, requirements, optimization_target)
            .await
    }

    /// Generate RTL for `spec`, then a testbench for the returned module.
    ///
    /// The testbench request is only sent after the RTL call has returned
    /// code and a module name. A testbench failure keeps the RTL result and
    /// is reported through [`GenerationOutcome::testbench_error`].
    pub async fn run<B: RtlBackend>(
        &self,
        backend: &B,
        spec: &UploadResult,
        requirements: Requirements,
        optimization_target: OptimizationTarget,
    ) -> Result<GenerationOutcome, RtlForgeError> {
        let flight = self.begin()?;
        info!(
            "Generating RTL for '{}' (target {})",
            spec.filename, optimization_target
        );

        let request = GenerateRtlRequest {
            spec_text: spec.parsed_data.raw_text.clone(),
            requirements,
            optimization_target,
        };
        let generation = match backend.generate_rtl(&request).await {
            Ok(generation) => generation,
            Err(e) => {
                error!("RTL generation failed: {}", e);
                let _ = flight.finish(GenerationPhase::Failed {
                    message: e.user_message(GENERATION_FALLBACK),
                });
                return Err(e);
            }
        };
        info!(
            "Generated module '{}' ({} bytes, valid: {})",
            generation.module_name,
            generation.code.len(),
            generation.validation_result.valid
        );

        let (testbench, testbench_error) =
            if generation.code.trim().is_empty() || generation.module_name.trim().is_empty() {
                warn!("Skipping testbench: RTL response had no code or module name");
                (
                    None,
                    Some("Skipped: the RTL response had no code or module name".to_string()),
                )
            } else {
                match backend
                    .generate_testbench(&TestbenchRequest::for_generation(&generation))
                    .await
                {
                    Ok(tb) => {
                        info!("Generated testbench '{}'", tb.module_name);
                        (Some(tb), None)
                    }
                    Err(e) => {
                        warn!("Testbench generation failed: {}", e);
                        (None, Some(e.user_message(TESTBENCH_FALLBACK)))
                    }
                }
            };

        let outcome = GenerationOutcome {
            generation,
            testbench,
            testbench_error,
        };
        if !flight.finish(GenerationPhase::Succeeded {
            outcome: outcome.clone(),
        }) {
            return Err(RtlForgeError::SpecificationChanged);
        }
        Ok(outcome)
    }

    fn begin(&self) -> Result<InFlight<'_>, RtlForgeError> {
        let mut state = self.lock();
        if matches!(state.phase, GenerationPhase::Generating) {
            warn!("Rejected generation request: one is already running");
            return Err(RtlForgeError::GenerationInProgress);
        }
        state.phase = GenerationPhase::Generating;
        Ok(InFlight {
            workflow: self,
            spec_epoch: state.spec_epoch,
            finished: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a run as `Generating` until finished; a run dropped mid-flight
/// ends as `Failed`.
struct InFlight<'a> {
    workflow: &'a GenerationWorkflow,
    spec_epoch: u64,
    finished: bool,
}

impl InFlight<'_> {
    /// Store `next`, unless the spec changed since the run began, in
    /// which case the phase returns to `Idle` and `false` is returned.
    fn finish(mut self, next: GenerationPhase) -> bool {
        self.finished = true;
        let mut state = self.workflow.lock();
        if state.spec_epoch != self.spec_epoch {
            warn!("Discarding generation result for a replaced specification");
            state.phase = GenerationPhase::Idle;
            return false;
        }
        state.phase = next;
        true
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("{}", INTERRUPTED);
            let mut state = self.workflow.lock();
            state.phase = if state.spec_epoch == self.spec_epoch {
                GenerationPhase::Failed {
                    message: INTERRUPTED.to_string(),
                }
            } else {
                GenerationPhase::Idle
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ParsedSpec, RequirementKey, ValidationResult};
    use crate::spec_store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<String>>,
        rtl_requests: Mutex<Vec<serde_json::Value>>,
        tb_requests: Mutex<Vec<(String, String)>>,
        fail_rtl: Option<u16>,
        fail_testbench: bool,
        module_name: String,
        gate: Option<Arc<Notify>>,
    }

    impl FakeBackend {
        fn ok() -> Self {
            Self {
                module_name: "axi_slave".to_string(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RtlBackend for FakeBackend {
        async fn upload_spec(
            &self,
            _filename: &str,
            _contents: Vec<u8>,
        ) -> Result<UploadResult, RtlForgeError> {
            unreachable!("workflow never uploads")
        }

        async fn generate_rtl(
            &self,
            request: &GenerateRtlRequest,
        ) -> Result<GenerationResult, RtlForgeError> {
            self.calls.lock().unwrap().push("rtl".to_string());
            self.rtl_requests
                .lock()
                .unwrap()
                .push(serde_json::to_value(request).unwrap());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(status) = self.fail_rtl {
                return Err(RtlForgeError::Server {
                    status,
                    detail: Some("LLM quota exceeded".to_string()),
                });
            }
            Ok(GenerationResult {
                code: format!("module {}; endmodule", self.module_name),
                module_name: self.module_name.clone(),
                explanation: "Generated".to_string(),
                rag_context: vec![],
                validation_result: ValidationResult {
                    valid: true,
                    ..ValidationResult::default()
                },
            })
        }

        async fn generate_testbench(
            &self,
            request: &TestbenchRequest,
        ) -> Result<TestbenchResult, RtlForgeError> {
            self.calls.lock().unwrap().push("testbench".to_string());
            self.tb_requests
                .lock()
                .unwrap()
                .push((request.rtl_code.clone(), request.module_name.clone()));
            if self.fail_testbench {
                return Err(RtlForgeError::Server {
                    status: 502,
                    detail: None,
                });
            }
            Ok(TestbenchResult {
                testbench_code: format!("module {}_tb; endmodule", request.module_name),
                module_name: format!("{}_tb", request.module_name),
            })
        }
    }

    fn spec() -> UploadResult {
        UploadResult {
            filename: "spec.txt".to_string(),
            parsed_data: ParsedSpec {
                raw_text: "A 32-bit AXI4 slave with 4 registers".to_string(),
                ..ParsedSpec::default()
            },
        }
    }

    #[tokio::test]
    async fn test_success_runs_rtl_then_testbench() {
        let backend = FakeBackend::ok();
        let workflow = GenerationWorkflow::new();
        let requirements = Requirements::default().with(RequirementKey::Interface, "AXI4");

        let outcome = workflow
            .run(&backend, &spec(), requirements, OptimizationTarget::Balanced)
            .await
            .unwrap();

        assert_eq!(backend.calls(), vec!["rtl", "testbench"]);
        let rtl_request = &backend.rtl_requests.lock().unwrap()[0];
        assert_eq!(rtl_request["spec_text"], "A 32-bit AXI4 slave with 4 registers");
        assert_eq!(rtl_request["requirements"], serde_json::json!({"interface": "AXI4"}));
        assert_eq!(rtl_request["optimization_target"], "balanced");

        let (code, name) = backend.tb_requests.lock().unwrap()[0].clone();
        assert_eq!(code, outcome.generation.code);
        assert_eq!(name, "axi_slave");

        assert_eq!(outcome.testbench.as_ref().unwrap().module_name, "axi_slave_tb");
        assert!(outcome.testbench_error.is_none());
        assert_eq!(workflow.phase().outcome(), Some(&outcome));
    }

    #[tokio::test]
    async fn test_rtl_failure_skips_testbench_and_fails() {
        let backend = FakeBackend {
            fail_rtl: Some(503),
            ..FakeBackend::ok()
        };
        let workflow = GenerationWorkflow::new();

        let err = workflow
            .run(&backend, &spec(), Requirements::default(), OptimizationTarget::Balanced)
            .await
            .unwrap_err();

        assert!(matches!(err, RtlForgeError::Server { status: 503, .. }));
        assert_eq!(backend.calls(), vec!["rtl"]);
        assert_eq!(
            workflow.phase(),
            GenerationPhase::Failed {
                message: "LLM quota exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_testbench_failure_keeps_rtl() {
        let backend = FakeBackend {
            fail_testbench: true,
            ..FakeBackend::ok()
        };
        let workflow = GenerationWorkflow::new();

        let outcome = workflow
            .run(&backend, &spec(), Requirements::default(), OptimizationTarget::Area)
            .await
            .unwrap();

        assert_eq!(outcome.generation.module_name, "axi_slave");
        assert!(outcome.testbench.is_none());
        assert_eq!(
            outcome.testbench_error.as_deref(),
            Some("Testbench generation failed")
        );
        assert!(matches!(workflow.phase(), GenerationPhase::Succeeded { .. }));
    }

    #[tokio::test]
    async fn test_missing_module_name_skips_testbench() {
        let backend = FakeBackend {
            module_name: String::new(),
            ..FakeBackend::default()
        };
        let workflow = GenerationWorkflow::new();

        let outcome = workflow
            .run(&backend, &spec(), Requirements::default(), OptimizationTarget::Balanced)
            .await
            .unwrap();

        assert_eq!(backend.calls(), vec!["rtl"]);
        assert!(outcome.testbench.is_none());
        assert!(outcome.testbench_error.unwrap().starts_with("Skipped"));
    }

    #[tokio::test]
    async fn test_duplicate_trigger_is_rejected() {
        let gate = Arc::new(Notify::new());
        let backend = FakeBackend {
            gate: Some(gate.clone()),
            ..FakeBackend::ok()
        };
        let workflow = GenerationWorkflow::new();
        let spec = spec();

        let first = workflow.run(&backend, &spec, Requirements::default(), OptimizationTarget::Balanced);
        let second = async {
            let result = workflow
                .run(&backend, &spec, Requirements::default(), OptimizationTarget::Balanced)
                .await;
            gate.notify_one();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(RtlForgeError::GenerationInProgress)));
        assert_eq!(backend.calls(), vec!["rtl", "testbench"]);
    }

    #[tokio::test]
    async fn test_dropped_run_ends_failed() {
        let backend = FakeBackend {
            gate: Some(Arc::new(Notify::new())),
            ..FakeBackend::ok()
        };
        let workflow = GenerationWorkflow::new();

        let timed_out = tokio::time::timeout(
            Duration::from_millis(20),
            workflow.run(&backend, &spec(), Requirements::default(), OptimizationTarget::Balanced),
        )
        .await;

        assert!(timed_out.is_err());
        assert_eq!(
            workflow.phase(),
            GenerationPhase::Failed {
                message: "Generation was interrupted".to_string()
            }
        );
        assert!(!workflow.is_generating());
    }

    #[tokio::test]
    async fn test_rerun_after_failure_clears_previous_result() {
        let workflow = GenerationWorkflow::new();
        let failing = FakeBackend {
            fail_rtl: Some(500),
            ..FakeBackend::ok()
        };
        let _ = workflow
            .run(&failing, &spec(), Requirements::default(), OptimizationTarget::Balanced)
            .await;
        assert!(matches!(workflow.phase(), GenerationPhase::Failed { .. }));

        let backend = FakeBackend::ok();
        workflow
            .run(&backend, &spec(), Requirements::default(), OptimizationTarget::Balanced)
            .await
            .unwrap();
        assert!(workflow.phase().outcome().is_some());

        workflow.reset().unwrap();
        assert_eq!(workflow.phase(), GenerationPhase::Idle);
    }

    #[tokio::test]
    async fn test_run_stored_without_spec_sends_nothing() {
        let backend = FakeBackend::ok();
        let workflow = GenerationWorkflow::new();
        let store = SpecStore::new(MemoryStore::new());

        let err = workflow
            .run_stored(&backend, &store, Requirements::default(), OptimizationTarget::Balanced)
            .await
            .unwrap_err();

        assert!(matches!(err, RtlForgeError::MissingSpecification));
        assert!(backend.calls().is_empty());
        assert_eq!(workflow.phase(), GenerationPhase::Idle);
    }

    #[tokio::test]
    async fn test_run_stored_uses_stored_spec() {
        let backend = FakeBackend::ok();
        let workflow = GenerationWorkflow::new();
        let store = SpecStore::new(MemoryStore::new());
        store.write(&spec()).unwrap();

        workflow
            .run_stored(&backend, &store, Requirements::default(), OptimizationTarget::Power)
            .await
            .unwrap();

        let rtl_request = &backend.rtl_requests.lock().unwrap()[0];
        assert_eq!(rtl_request["spec_text"], "A 32-bit AXI4 slave with 4 registers");
        assert_eq!(rtl_request["optimization_target"], "power");
    }

    #[tokio::test]
    async fn test_invalidate_drops_finished_result() {
        let backend = FakeBackend::ok();
        let workflow = GenerationWorkflow::new();
        workflow
            .run(&backend, &spec(), Requirements::default(), OptimizationTarget::Balanced)
            .await
            .unwrap();

        workflow.invalidate();
        assert_eq!(workflow.phase(), GenerationPhase::Idle);

        let failing = FakeBackend {
            fail_rtl: Some(500),
            ..FakeBackend::ok()
        };
        let _ = workflow
            .run(&failing, &spec(), Requirements::default(), OptimizationTarget::Balanced)
            .await;
        workflow.invalidate();
        assert_eq!(workflow.phase(), GenerationPhase::Idle);
    }

    #[tokio::test]
    async fn test_result_of_run_spanning_spec_change_is_discarded() {
        let gate = Arc::new(Notify::new());
        let backend = FakeBackend {
            gate: Some(gate.clone()),
            ..FakeBackend::ok()
        };
        let workflow = GenerationWorkflow::new();
        let spec = spec();

        let run = workflow.run(&backend, &spec, Requirements::default(), OptimizationTarget::Balanced);
        let replace_spec = async {
            workflow.invalidate();
            let still_generating = workflow.is_generating();
            gate.notify_one();
            still_generating
        };
        let (result, still_generating) = tokio::join!(run, replace_spec);

        assert!(still_generating);
        assert!(matches!(result, Err(RtlForgeError::SpecificationChanged)));
        assert_eq!(backend.calls(), vec!["rtl", "testbench"]);
        assert_eq!(workflow.phase(), GenerationPhase::Idle);

        // The next run is unaffected
        let backend = FakeBackend::ok();
        workflow
            .run(&backend, &spec, Requirements::default(), OptimizationTarget::Balanced)
            .await
            .unwrap();
        assert!(workflow.phase().outcome().is_some());
    }

    #[test]
    fn test_phase_wire_format() {
        let value = serde_json::to_value(GenerationPhase::Failed {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"phase": "failed", "message": "boom"}));
        assert_eq!(
            serde_json::to_value(GenerationPhase::Idle).unwrap(),
            serde_json::json!({"phase": "idle"})
        );
    }
}
