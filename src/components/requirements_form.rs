use leptos::prelude::*;

use crate::commands::{RequirementKey, Requirements};

pub const INTERFACE_OPTIONS: &[&str] = &[
    "AXI4", "AXI4-Lite", "AHB", "APB", "UART", "SPI", "I2C", "Custom",
];

pub const PERFORMANCE_OPTIONS: &[&str] = &[
    "Low Frequency (< 100MHz)",
    "Medium Frequency (100-500MHz)",
    "High Frequency (> 500MHz)",
];

pub const POWER_OPTIONS: &[&str] = &[
    "Ultra Low Power",
    "Low Power",
    "Balanced",
    "Performance Oriented",
];

/// Design requirements entered before generation. Every field is optional.
#[component]
pub fn RequirementsForm(
    requirements: RwSignal<Requirements>,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let update = move |key: RequirementKey, value: String| {
        requirements.update(|r| *r = r.with(key, value));
    };

    view! {
        <div class="requirements-form">
            <h3>"Design Requirements"</h3>

            <RequirementSelect
                id="req-interface"
                label="Interface Type"
                options=INTERFACE_OPTIONS
                value=Signal::derive(move || requirements.with(|r| r.get(RequirementKey::Interface)))
                on_change=move |v: String| update(RequirementKey::Interface, v)
                disabled=disabled
            />

            <div class="form-group">
                <label for="req-protocol">"Protocol"</label>
                <input
                    id="req-protocol"
                    type="text"
                    class="input"
                    placeholder="e.g. AMBA AXI4, Wishbone"
                    prop:value=move || requirements.with(|r| r.get(RequirementKey::Protocol))
                    on:input=move |ev| update(RequirementKey::Protocol, event_target_value(&ev))
                    disabled=move || disabled.get()
                />
            </div>

            <RequirementSelect
                id="req-performance"
                label="Performance Target"
                options=PERFORMANCE_OPTIONS
                value=Signal::derive(move || requirements.with(|r| r.get(RequirementKey::Performance)))
                on_change=move |v: String| update(RequirementKey::Performance, v)
                disabled=disabled
            />

            <RequirementSelect
                id="req-power"
                label="Power Constraints"
                options=POWER_OPTIONS
                value=Signal::derive(move || requirements.with(|r| r.get(RequirementKey::Power)))
                on_change=move |v: String| update(RequirementKey::Power, v)
                disabled=disabled
            />

            <div class="form-group">
                <label for="req-additional">"Additional Requirements"</label>
                <textarea
                    id="req-additional"
                    class="input"
                    rows="4"
                    placeholder="Any other constraints, e.g. reset polarity or FIFO depth"
                    prop:value=move || requirements.with(|r| r.get(RequirementKey::Additional))
                    on:input=move |ev| update(RequirementKey::Additional, event_target_value(&ev))
                    disabled=move || disabled.get()
                ></textarea>
            </div>
        </div>
    }
}

#[component]
fn RequirementSelect(
    id: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="form-group">
            <label for=id>{label}</label>
            <select
                id=id
                class="input"
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
                disabled=move || disabled.get()
            >
                <option value="">"Select..."</option>
                {options
                    .iter()
                    .map(|opt| view! { <option value=*opt>{*opt}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}
