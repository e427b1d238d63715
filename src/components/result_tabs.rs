use leptos::prelude::*;

use crate::commands::{ArtifactKind, GenerationOutcome, RagContextItem, ValidationResult};
use crate::components::code_viewer::CodeViewer;
use crate::components::status_panel::{StatusKind, StatusPanel};

const VERIFICATION_DISCLAIMER: &str = "For full verification, please use professional EDA tools \
for synthesis, static timing analysis, and formal verification.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTab {
    #[default]
    Rtl,
    Testbench,
    Context,
    Validation,
}

impl ResultTab {
    pub const ALL: [ResultTab; 4] = [
        ResultTab::Rtl,
        ResultTab::Testbench,
        ResultTab::Context,
        ResultTab::Validation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResultTab::Rtl => "RTL Code",
            ResultTab::Testbench => "Testbench",
            ResultTab::Context => "RAG Context",
            ResultTab::Validation => "Validation",
        }
    }
}

/// Tabbed view over one generation outcome.
#[component]
pub fn ResultTabs(outcome: GenerationOutcome) -> impl IntoView {
    let (active, set_active) = signal(ResultTab::default());
    let outcome = StoredValue::new(outcome);

    let body = move || {
        let outcome = outcome.get_value();
        match active.get() {
            ResultTab::Rtl => {
                let generation = outcome.generation;
                view! {
                    <StatusPanel
                        kind=StatusKind::Success
                        status="RTL Generated"
                        message=generation.explanation.clone()
                    />
                    <CodeViewer
                        title=format!("Module: {}", generation.module_name)
                        language="verilog"
                        code=generation.code
                        kind=ArtifactKind::Rtl
                    />
                }
                .into_any()
            }
            ResultTab::Testbench => match (outcome.testbench, outcome.testbench_error) {
                (Some(tb), _) => view! {
                    <CodeViewer
                        title=format!("Testbench: {}", tb.module_name)
                        language="systemverilog"
                        code=tb.testbench_code
                        kind=ArtifactKind::Testbench
                    />
                }
                .into_any(),
                (None, error) => view! {
                    <StatusPanel
                        kind=StatusKind::Error
                        status="Testbench Not Available"
                        message=error.unwrap_or_else(|| "No testbench was generated".to_string())
                    />
                }
                .into_any(),
            },
            ResultTab::Context => {
                view! { <ContextList items=outcome.generation.rag_context /> }.into_any()
            }
            ResultTab::Validation => {
                view! { <ValidationReport result=outcome.generation.validation_result /> }
                    .into_any()
            }
        }
    };

    view! {
        <div class="result-tabs">
            <div class="tab-bar" role="tablist">
                {ResultTab::ALL
                    .into_iter()
                    .map(|tab| view! {
                        <button
                            class="tab"
                            class:active=move || active.get() == tab
                            role="tab"
                            on:click=move |_| set_active.set(tab)
                        >
                            {tab.label()}
                        </button>
                    })
                    .collect_view()}
            </div>
            <div class="tab-content">{body}</div>
        </div>
    }
}

#[component]
fn ContextList(items: Vec<RagContextItem>) -> impl IntoView {
    if items.is_empty() {
        return view! { <p class="empty-state">"No reference context was used."</p> }.into_any();
    }

    view! {
        <div class="context-list">
            {items
                .into_iter()
                .map(|item| {
                    let source = item.metadata.source.unwrap_or_else(|| "unknown".to_string());
                    let kind = item.metadata.kind.unwrap_or_else(|| "unknown".to_string());
                    view! {
                        <div class="context-item">
                            <div class="context-meta">
                                "Source: " {source} " | Type: " {kind}
                            </div>
                            <pre class="context-text">{item.text}</pre>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
    .into_any()
}

#[component]
fn ValidationReport(result: ValidationResult) -> impl IntoView {
    let (kind, status) = if result.valid {
        (StatusKind::Success, "All Checks Passed")
    } else {
        (StatusKind::Warning, "Validation Issues Found")
    };

    view! {
        <div class="validation-report">
            <StatusPanel kind=kind status=status />
            {(!result.issues.is_empty()).then(|| view! {
                <ul class="validation-issues">
                    {result.issues.into_iter().map(|issue| view! { <li>{issue}</li> }).collect_view()}
                </ul>
            })}
            <p class="validation-note">
                {(!result.warning.is_empty()).then(|| format!("{} ", result.warning))}
                {VERIFICATION_DISCLAIMER}
            </p>
        </div>
    }
}
