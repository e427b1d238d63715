use leptos::prelude::*;

use crate::store::use_spec_context;

#[component]
pub fn HomePage() -> impl IntoView {
    let spec_ctx = use_spec_context();

    view! {
        <div class="page home-page">
            <h2>"Welcome to RTL Forge"</h2>
            <p class="page-description">
                "Turn a hardware specification into synthesizable RTL and a matching testbench."
            </p>

            <div class="card-grid">
                <div class="card">
                    <h3>"Upload Specification"</h3>
                    <p>"Submit a text, Markdown, YAML or JSON spec for parsing"</p>
                    <a href="/upload" class="btn btn-primary">"Upload Now"</a>
                </div>
                <div class="card">
                    <h3>"Generate RTL"</h3>
                    <p>"Set interface, performance and power targets, then generate"</p>
                    <a href="/generate" class="btn btn-primary">
                        {move || if spec_ctx.has_spec() { "Continue" } else { "Generate" }}
                    </a>
                </div>
                <div class="card">
                    <h3>"Settings"</h3>
                    <p>"Point the app at your generation service and pick a theme"</p>
                    <a href="/settings" class="btn btn-primary">"Configure"</a>
                </div>
            </div>

            <div class="how-it-works">
                <h3>"How It Works"</h3>
                <div class="steps">
                    <div class="step">
                        <span class="step-number">"1"</span>
                        <div class="step-content">
                            <strong>"Upload"</strong>
                            <p>"The service extracts interfaces, protocols and parameters from your spec"</p>
                        </div>
                    </div>
                    <div class="step">
                        <span class="step-number">"2"</span>
                        <div class="step-content">
                            <strong>"Generate"</strong>
                            <p>"RTL is generated with reference context, then a testbench for it"</p>
                        </div>
                    </div>
                    <div class="step">
                        <span class="step-number">"3"</span>
                        <div class="step-content">
                            <strong>"Review"</strong>
                            <p>"Inspect code, context and validation findings, then copy or export"</p>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
