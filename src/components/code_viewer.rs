use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::commands::{self, ArtifactKind};

const COPIED_NOTICE_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
struct Notice {
    id: u32,
    text: String,
}

/// Clear `notice` if it is still the one with `id`; a newer notice stays.
fn expire(notice: Option<Notice>, id: u32) -> Option<Notice> {
    notice.filter(|n| n.id != id)
}

/// Generated source with Copy and Export actions.
#[component]
pub fn CodeViewer(
    #[prop(into)] title: String,
    /// CSS language hint, e.g. "verilog"
    language: &'static str,
    #[prop(into)] code: String,
    kind: ArtifactKind,
) -> impl IntoView {
    let notice = RwSignal::new(None::<Notice>);
    let last_id = StoredValue::new(0u32);
    let code = StoredValue::new(code);

    let show = move |text: String, transient: bool| {
        let id = last_id.get_value().wrapping_add(1);
        last_id.set_value(id);
        notice.set(Some(Notice { id, text }));
        if transient {
            set_timeout(
                move || notice.update(|n| *n = expire(n.take(), id)),
                COPIED_NOTICE_DURATION,
            );
        }
    };

    let on_copy = move |_| {
        let text = code.get_value();
        spawn_local(async move {
            match write_clipboard(&text).await {
                Ok(()) => show("Copied to clipboard".to_string(), true),
                Err(e) => {
                    web_sys::console::error_1(&format!("Clipboard write failed: {}", e).into());
                    show(format!("Copy failed: {}", e), false);
                }
            }
        });
    };

    let on_export = move |_| {
        spawn_local(async move {
            match commands::export_artifact(kind).await {
                Ok(path) => show(format!("Saved to {}", path), false),
                Err(e) => {
                    web_sys::console::error_1(&format!("Export failed: {}", e).into());
                    show(format!("Export failed: {}", e), false);
                }
            }
        });
    };

    view! {
        <div class="code-viewer">
            <div class="code-viewer-header">
                <h4>{title}</h4>
                <div class="code-viewer-actions">
                    <button class="btn btn-small" on:click=on_copy>"Copy"</button>
                    <button class="btn btn-small" on:click=on_export>"Export"</button>
                </div>
            </div>
            <Show when=move || notice.get().is_some()>
                <span class="status-text">
                    {move || notice.with(|n| n.as_ref().map(|n| n.text.clone()).unwrap_or_default())}
                </span>
            </Show>
            <pre class=format!("code-block language-{}", language)>
                <code>{code.get_value()}</code>
            </pre>
        </div>
    }
}

/// `navigator.clipboard.writeText(text)`, looked up dynamically.
async fn write_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window")?;
    let navigator: JsValue = window.navigator().into();
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map_err(|e| format!("{:?}", e))?;
    if clipboard.is_undefined() {
        return Err("Clipboard is not available".to_string());
    }
    let write_text: js_sys::Function = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|_| "writeText is not a function".to_string())?;
    let promise: js_sys::Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|_| "writeText did not return a promise".to_string())?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("{:?}", e))
}
