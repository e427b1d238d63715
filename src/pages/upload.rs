use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, UploadLimits, UploadResult};
use crate::components::file_drop_zone::{FileDropZone, SelectedFile};
use crate::components::spec_preview::SpecPreview;
use crate::components::status_panel::{StatusKind, StatusPanel};
use crate::store::use_spec_context;

/// Used until the backend reports its limits.
const DEFAULT_ACCEPT: &str = ".txt,.md,.yaml,.yml,.json";

#[derive(Debug, Clone, PartialEq)]
enum UploadState {
    Idle,
    Uploading(String),
    Uploaded(UploadResult),
    Failed(String),
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let spec_ctx = use_spec_context();
    let navigate = use_navigate();

    let (state, set_state) = signal(UploadState::Idle);
    let (limits, set_limits) = signal::<Option<UploadLimits>>(None);
    let busy = Signal::derive(move || matches!(state.get(), UploadState::Uploading(_)));

    Effect::new(move |_| {
        spawn_local(async move {
            match commands::get_upload_limits().await {
                Ok(l) => set_limits.set(Some(l)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to load upload limits: {}", e).into());
                }
            }
        });
    });

    let on_file = move |file: SelectedFile| {
        let rejected = limits.with_untracked(|l| {
            l.as_ref()
                .and_then(|l| l.check(&file.name, file.size).err())
        });
        if let Some(reason) = rejected {
            set_state.set(UploadState::Failed(reason));
            return;
        }

        set_state.set(UploadState::Uploading(file.name.clone()));
        spawn_local(async move {
            match commands::upload_spec(&file.name, file.base64).await {
                Ok(result) => {
                    spec_ctx.replace(result.clone());
                    set_state.set(UploadState::Uploaded(result));
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Upload failed: {}", e).into());
                    set_state.set(UploadState::Failed(e));
                }
            }
        });
    };

    let on_read_error = move |message: String| set_state.set(UploadState::Failed(message));

    let on_clear = move |_| {
        spec_ctx.clear(move |e| set_state.set(UploadState::Failed(e)));
        set_state.set(UploadState::Idle);
    };

    let go_generate = move |_| navigate("/generate", Default::default());

    view! {
        <div class="page upload-page">
            <h2>"Upload Specification"</h2>
            <p class="page-description">
                "Upload a hardware specification. The service extracts its interfaces, protocols and parameters."
            </p>

            {move || {
                let accept = limits
                    .get()
                    .map(|l| l.accept())
                    .unwrap_or_else(|| DEFAULT_ACCEPT.to_string());
                view! {
                    <FileDropZone
                        accept=accept
                        on_file=on_file
                        on_error=on_read_error
                        busy=busy
                    />
                }
            }}

            {move || match state.get() {
                UploadState::Idle => ().into_any(),
                UploadState::Uploading(name) => view! {
                    <StatusPanel
                        kind=StatusKind::Loading
                        status="Uploading and parsing..."
                        message=name
                    />
                }.into_any(),
                UploadState::Uploaded(result) => view! {
                    <StatusPanel
                        kind=StatusKind::Success
                        status="Upload Successful"
                        message=format!("Parsed {}", result.filename)
                    />
                }.into_any(),
                UploadState::Failed(message) => view! {
                    <StatusPanel kind=StatusKind::Error status="Upload Failed" message=message />
                }.into_any(),
            }}

            <Show when=move || spec_ctx.has_spec()>
                {move || spec_ctx.spec().map(|spec| view! { <SpecPreview spec=spec /> })}
                <div class="action-bar">
                    <button class="btn btn-primary" on:click=go_generate.clone()>
                        "Proceed to Generate RTL"
                    </button>
                    <button class="btn btn-secondary" on:click=on_clear>
                        "Clear Specification"
                    </button>
                </div>
            </Show>
        </div>
    }
}
