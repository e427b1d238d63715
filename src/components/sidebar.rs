use leptos::prelude::*;

use crate::store::use_spec_context;

#[component]
pub fn Sidebar() -> impl IntoView {
    let spec_ctx = use_spec_context();

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"RTL Forge"</h1>
                <p class="sidebar-subtitle">"Spec-to-RTL Generation"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/" class="nav-link">"Home"</a>
                </li>
                <li class="nav-item">
                    <a href="/upload" class="nav-link">"Upload"</a>
                </li>
                <li class="nav-item">
                    <a href="/generate" class="nav-link">"Generate"</a>
                </li>
                <li class="nav-item">
                    <a href="/settings" class="nav-link">"Settings"</a>
                </li>
            </ul>
            <div class="sidebar-footer">
                {move || match spec_ctx.spec() {
                    Some(spec) => view! {
                        <span class="sidebar-spec">"Spec: " {spec.filename}</span>
                    }.into_any(),
                    None => view! {
                        <span class="sidebar-spec sidebar-spec-empty">"No specification loaded"</span>
                    }.into_any(),
                }}
            </div>
        </nav>
    }
}
