use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, GenerationPhase, Requirements};
use crate::components::requirements_form::RequirementsForm;
use crate::components::result_tabs::ResultTabs;
use crate::components::status_panel::{StatusKind, StatusPanel};
use crate::store::use_spec_context;

const PHASE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Fetch the backend phase, and keep polling while a generation started
/// elsewhere (e.g. before navigating away) is still running.
fn sync_phase(phase: RwSignal<GenerationPhase>) {
    spawn_local(async move {
        match commands::get_generation_state().await {
            Ok(current) => {
                let still_running = current == GenerationPhase::Generating;
                phase.set(current);
                if still_running {
                    set_timeout(move || sync_phase(phase), PHASE_POLL_INTERVAL);
                }
            }
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to read generation state: {}", e).into());
            }
        }
    });
}

/// What to show after `generate_design` failed, given the backend phase
/// read right afterwards. `Generating` means another run owns the phase
/// (e.g. a duplicate trigger) and the page should follow it instead.
fn phase_after_error(backend: Result<GenerationPhase, String>, message: String) -> GenerationPhase {
    match backend {
        Ok(GenerationPhase::Generating) => GenerationPhase::Generating,
        _ => GenerationPhase::Failed { message },
    }
}

#[component]
pub fn GeneratePage() -> impl IntoView {
    let spec_ctx = use_spec_context();
    let requirements = RwSignal::new(Requirements::default());
    let phase = RwSignal::new(GenerationPhase::Idle);
    let is_generating = Signal::derive(move || phase.with(|p| *p == GenerationPhase::Generating));

    // Restore the last result (or an in-flight run) on mount
    Effect::new(move |_| sync_phase(phase));

    let on_generate = move |_| {
        if is_generating.get_untracked() {
            return;
        }
        let req = requirements.get_untracked();
        phase.set(GenerationPhase::Generating);
        spawn_local(async move {
            match commands::generate_design(req).await {
                Ok(outcome) => phase.set(GenerationPhase::Succeeded { outcome }),
                Err(e) => {
                    web_sys::console::error_1(&format!("Generation failed: {}", e).into());
                    let current = commands::get_generation_state().await;
                    match phase_after_error(current, e) {
                        GenerationPhase::Generating => sync_phase(phase),
                        failed => phase.set(failed),
                    }
                }
            }
        });
    };

    let on_reset = move |_| {
        spawn_local(async move {
            match commands::reset_generation().await {
                Ok(()) => {
                    phase.set(GenerationPhase::Idle);
                    requirements.set(Requirements::default());
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Reset failed: {}", e).into());
                }
            }
        });
    };

    let form = move || {
        view! {
            <div class="spec-summary">
                "Specification: "
                <strong>{move || spec_ctx.spec().map(|s| s.filename).unwrap_or_default()}</strong>
                " "
                <a href="/upload" class="link">"Change"</a>
            </div>

            <RequirementsForm requirements=requirements disabled=is_generating />

            <div class="action-bar">
                <button
                    class="btn btn-primary"
                    on:click=on_generate
                    disabled=move || is_generating.get()
                >
                    {move || if is_generating.get() { "Generating..." } else { "Generate RTL & Testbench" }}
                </button>
                <Show when=move || phase.with(|p| matches!(p, GenerationPhase::Succeeded { .. } | GenerationPhase::Failed { .. }))>
                    <button class="btn btn-secondary" on:click=on_reset>"Start Over"</button>
                </Show>
            </div>

            {move || match phase.get() {
                GenerationPhase::Idle => ().into_any(),
                GenerationPhase::Generating => view! {
                    <StatusPanel
                        kind=StatusKind::Loading
                        status="Generating RTL and testbench..."
                        message="This can take a minute for larger designs."
                    />
                }.into_any(),
                GenerationPhase::Succeeded { outcome } => view! {
                    <ResultTabs outcome=outcome />
                }.into_any(),
                GenerationPhase::Failed { message } => view! {
                    <StatusPanel kind=StatusKind::Error status="Generation Failed" message=message />
                }.into_any(),
            }}
        }
    };

    view! {
        <div class="page generate-page">
            <h2>"Generate RTL"</h2>
            <p class="page-description">
                "Describe your design targets, then generate RTL and a matching testbench."
            </p>

            <Show
                when=move || spec_ctx.is_loaded()
                fallback=|| view! { <StatusPanel kind=StatusKind::Loading status="Loading specification..." /> }
            >
                <Show
                    when=move || spec_ctx.has_spec()
                    fallback=|| view! {
                        <div class="empty-state">
                            <h3>"No Specification Found"</h3>
                            <p>"Upload a specification before generating RTL."</p>
                            <a href="/upload" class="btn btn-primary">"Upload Specification"</a>
                        </div>
                    }
                >
                    {form}
                </Show>
            </Show>
        </div>
    }
}
