use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::theme::{Theme, ThemeContext, THEME_PREFERENCE};

const OPTIMIZATION_TARGETS: &[(&str, &str)] = &[
    ("balanced", "Balanced"),
    ("performance", "Performance"),
    ("power", "Power"),
    ("area", "Area"),
];

#[component]
pub fn SettingsPage() -> impl IntoView {
    let theme_ctx = expect_context::<ThemeContext>();
    let (theme_status, set_theme_status) = signal::<Option<String>>(None);

    let on_theme_change = move |ev: web_sys::Event| {
        let theme = Theme::parse(&event_target_value(&ev));
        theme_ctx.set_theme.set(theme);
        spawn_local(async move {
            if let Err(e) = commands::set_preference(THEME_PREFERENCE, theme.as_str()).await {
                set_theme_status.set(Some(format!("Failed to save: {}", e)));
            }
        });
    };

    view! {
        <div class="page settings-page">
            <h2>"Settings"</h2>

            <section class="settings-section">
                <h3>"Generation Service"</h3>
                <p class="section-description">
                    "Where specifications are parsed and RTL is generated. Changes apply to the next request."
                </p>

                <PreferenceInput
                    pref_key="backend_url"
                    label="Backend URL"
                    placeholder="http://localhost:8000"
                />
                <PreferenceInput
                    pref_key="request_timeout_secs"
                    label="Request Timeout (seconds)"
                    placeholder="No timeout"
                />
                <PreferenceSelect
                    pref_key="optimization_target"
                    label="Optimization Target"
                    options=OPTIMIZATION_TARGETS
                    default_value="balanced"
                />
            </section>

            <section class="settings-section">
                <h3>"Appearance"</h3>
                <div class="form-group">
                    <label for="theme">"Theme"</label>
                    <select
                        id="theme"
                        class="input"
                        prop:value=move || theme_ctx.theme.get().as_str()
                        on:change=on_theme_change
                    >
                        {Theme::ALL
                            .into_iter()
                            .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                            .collect_view()}
                    </select>
                    <Show when=move || theme_status.get().is_some()>
                        <span class="status-text">{move || theme_status.get().unwrap_or_default()}</span>
                    </Show>
                </div>
            </section>
        </div>
    }
}

/// Save a preference and report the outcome next to its field.
fn save_preference(key: &'static str, value: String, set_status: WriteSignal<Option<String>>) {
    spawn_local(async move {
        match commands::set_preference(key, &value).await {
            Ok(()) => set_status.set(Some("Saved".to_string())),
            Err(e) => set_status.set(Some(format!("Failed to save: {}", e))),
        }
    });
}

fn load_preference(
    key: &'static str,
    set_value: WriteSignal<String>,
    set_status: WriteSignal<Option<String>>,
) {
    spawn_local(async move {
        match commands::get_preference(key).await {
            Ok(Some(v)) => set_value.set(v),
            Ok(None) => {}
            Err(e) => set_status.set(Some(format!("Failed to load preference: {}", e))),
        }
    });
}

#[component]
fn PreferenceInput(
    pref_key: &'static str,
    label: &'static str,
    placeholder: &'static str,
) -> impl IntoView {
    let (value, set_value) = signal(String::new());
    let (status, set_status) = signal::<Option<String>>(None);

    Effect::new(move |_| load_preference(pref_key, set_value, set_status));

    view! {
        <div class="form-group">
            <label for=pref_key>{label}</label>
            <div class="input-row">
                <input
                    id=pref_key
                    type="text"
                    class="input"
                    placeholder=placeholder
                    prop:value=move || value.get()
                    on:input=move |ev| set_value.set(event_target_value(&ev))
                />
                <button
                    class="btn btn-save"
                    on:click=move |_| save_preference(pref_key, value.get_untracked(), set_status)
                >
                    "Save"
                </button>
            </div>
            <Show when=move || status.get().is_some()>
                <span class="status-text">{move || status.get().unwrap_or_default()}</span>
            </Show>
        </div>
    }
}

#[component]
fn PreferenceSelect(
    pref_key: &'static str,
    label: &'static str,
    options: &'static [(&'static str, &'static str)],
    default_value: &'static str,
) -> impl IntoView {
    let (value, set_value) = signal(default_value.to_string());
    let (status, set_status) = signal::<Option<String>>(None);

    Effect::new(move |_| load_preference(pref_key, set_value, set_status));

    view! {
        <div class="form-group">
            <label for=pref_key>{label}</label>
            <select
                id=pref_key
                class="input"
                prop:value=move || value.get()
                on:change=move |ev| {
                    let selected = event_target_value(&ev);
                    set_value.set(selected.clone());
                    save_preference(pref_key, selected, set_status);
                }
            >
                {options
                    .iter()
                    .map(|(v, text)| view! { <option value=*v>{*text}</option> })
                    .collect_view()}
            </select>
            <Show when=move || status.get().is_some()>
                <span class="status-text">{move || status.get().unwrap_or_default()}</span>
            </Show>
        </div>
    }
}
