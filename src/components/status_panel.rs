use leptos::prelude::*;

/// Visual kind of a status panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    pub fn class(&self) -> &'static str {
        match self {
            StatusKind::Loading => "status-panel status-loading",
            StatusKind::Success => "status-panel status-success",
            StatusKind::Warning => "status-panel status-warning",
            StatusKind::Error => "status-panel status-error",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            StatusKind::Loading => "",
            StatusKind::Success => "\u{2713}",
            StatusKind::Warning => "!",
            StatusKind::Error => "\u{2717}",
        }
    }
}

#[component]
pub fn StatusPanel(
    kind: StatusKind,
    /// Headline, e.g. "Upload Successful"
    #[prop(into)]
    status: String,
    /// Optional detail text below the headline
    #[prop(optional, into)]
    message: Option<String>,
) -> impl IntoView {
    view! {
        <div class=kind.class() role="status">
            {if kind == StatusKind::Loading {
                view! { <div class="spinner"></div> }.into_any()
            } else {
                view! { <span class="status-icon">{kind.icon()}</span> }.into_any()
            }}
            <div class="status-body">
                <strong class="status-title">{status}</strong>
                {message.map(|m| view! { <p class="status-message">{m}</p> })}
            </div>
        </div>
    }
}
