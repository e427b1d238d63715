//! Drag-and-drop / browse picker for a single specification file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

/// A file read in the browser, ready to send to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: usize,
    pub base64: String,
}

#[component]
pub fn FileDropZone(
    /// Value for the input's `accept` attribute, e.g. ".txt,.md"
    #[prop(into)]
    accept: String,
    /// Called with the first dropped or picked file
    #[prop(into)]
    on_file: Callback<SelectedFile>,
    /// Called when the browser could not read the file
    #[prop(into)]
    on_error: Callback<String>,
    /// Disables the zone while an upload is running
    #[prop(into)]
    busy: Signal<bool>,
) -> impl IntoView {
    let (is_over, set_is_over) = signal(false);
    let (is_reading, set_is_reading) = signal(false);
    let file_input_id = "spec-file-input";
    let accept_hint = accept.replace(',', ", ");

    let load = move |file: web_sys::File| {
        if busy.get_untracked() {
            return;
        }
        set_is_reading.set(true);
        spawn_local(async move {
            let name = file.name();
            match read_file_as_base64(&file).await {
                Ok((base64, size)) => on_file.run(SelectedFile { name, size, base64 }),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to read file: {}", e).into());
                    on_error.run(format!("Could not read '{}': {}", name, e));
                }
            }
            set_is_reading.set(false);
        });
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        set_is_over.set(false);

        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        {
            load(file);
        }
    };

    let on_input_change = move |ev: web_sys::Event| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| {
                let file = input.files().and_then(|files| files.get(0));
                // Allow picking the same file again after an error
                input.set_value("");
                file
            });
        if let Some(file) = file {
            load(file);
        }
    };

    view! {
        <div
            class="file-upload"
            class:dragover=move || is_over.get()
            class:file-upload-busy=move || busy.get() || is_reading.get()
            on:dragenter=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                set_is_over.set(true);
            }
            on:dragover=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                set_is_over.set(true);
            }
            on:dragleave=move |_| set_is_over.set(false)
            on:drop=on_drop
        >
            <Show
                when=move || is_reading.get()
                fallback=move || view! {
                    <div class="drop-zone-content">
                        <h3>"Upload Specification File"</h3>
                        <p class="drop-main">"Drag & drop a file here"</p>
                        <p class="drop-hint">"or"</p>
                        <label for=file_input_id class="btn btn-secondary">
                            "Browse Files"
                        </label>
                        <input
                            type="file"
                            id=file_input_id
                            accept=accept.clone()
                            style="display: none"
                            disabled=move || busy.get()
                            on:change=on_input_change
                        />
                        <p class="drop-formats">"Supported: " {accept_hint.clone()}</p>
                    </div>
                }
            >
                <div class="drop-zone-loading-content">
                    <div class="spinner"></div>
                    <p>"Reading file..."</p>
                </div>
            </Show>
        </div>
    }
}

/// Read a File and return its base64 encoding and byte length.
async fn read_file_as_base64(file: &web_sys::File) -> Result<(String, usize), String> {
    use js_sys::{ArrayBuffer, Uint8Array};
    use wasm_bindgen_futures::JsFuture;

    let array_buffer: ArrayBuffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|_| "Failed to convert to ArrayBuffer".to_string())?;

    let bytes = Uint8Array::new(&array_buffer).to_vec();
    Ok((encode_contents(&bytes), bytes.len()))
}

/// Padded standard base64, the encoding `upload_spec` decodes.
pub fn encode_contents(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_survive_encoding_with_padding() {
        let spec = "WIDTH: 32\nbus: AXI4-Lite µ\n".as_bytes();
        let encoded = encode_contents(spec);
        assert!(encoded.ends_with('='));
        assert_eq!(STANDARD.decode(encoded).unwrap(), spec);
        assert_eq!(encode_contents(b""), "");
    }
}
