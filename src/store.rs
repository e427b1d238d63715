//! Application-level store for the uploaded specification.
//!
//! Provided once by `App` and read by pages through context. All reads and
//! writes of the persisted spec go through the backend commands called here.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, UploadResult};

#[derive(Clone, Copy)]
pub struct SpecContext {
    spec: RwSignal<Option<UploadResult>>,
    loaded: RwSignal<bool>,
}

impl SpecContext {
    pub fn new() -> Self {
        Self {
            spec: RwSignal::new(None),
            loaded: RwSignal::new(false),
        }
    }

    /// The current specification, if one has been uploaded.
    pub fn spec(&self) -> Option<UploadResult> {
        self.spec.get()
    }

    pub fn has_spec(&self) -> bool {
        self.spec.with(|s| s.is_some())
    }

    /// Whether the initial read from durable storage has finished.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Read the persisted specification. Called once at mount.
    pub fn load(self) {
        spawn_local(async move {
            match commands::get_stored_spec().await {
                Ok(spec) => self.spec.set(spec),
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("Failed to load stored specification: {}", e).into(),
                    );
                }
            }
            self.loaded.set(true);
        });
    }

    /// Record a freshly uploaded specification. The backend has already
    /// persisted it.
    pub fn replace(&self, spec: UploadResult) {
        self.spec.set(Some(spec));
        self.loaded.set(true);
    }

    /// Forget the stored specification.
    pub fn clear(self, on_error: impl Fn(String) + 'static) {
        spawn_local(async move {
            match commands::clear_stored_spec().await {
                Ok(_) => self.spec.set(None),
                Err(e) => on_error(format!("Failed to clear specification: {}", e)),
            }
        });
    }
}

pub fn use_spec_context() -> SpecContext {
    expect_context::<SpecContext>()
}
