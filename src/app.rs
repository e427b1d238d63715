use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::sidebar::Sidebar;
use crate::pages::generate::GeneratePage;
use crate::pages::home::HomePage;
use crate::pages::settings::SettingsPage;
use crate::pages::upload::UploadPage;
use crate::store::SpecContext;
use crate::theme::{apply_theme, Theme, ThemeContext, THEME_PREFERENCE};

#[component]
pub fn App() -> impl IntoView {
    let (theme, set_theme) = signal(Theme::System);
    provide_context(ThemeContext { theme, set_theme });

    let spec_ctx = SpecContext::new();
    provide_context(spec_ctx);
    spec_ctx.load();

    // Load saved theme preference on mount
    Effect::new(move |_| {
        spawn_local(async move {
            if let Ok(Some(saved)) = commands::get_preference(THEME_PREFERENCE).await {
                set_theme.set(Theme::parse(&saved));
            }
        });
    });

    Effect::new(move |_| {
        apply_theme(theme.get());
    });

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <h2>"404 - Page Not Found"</h2> }>
                        <Route path=path!("/") view=HomePage />
                        <Route path=path!("/upload") view=UploadPage />
                        <Route path=path!("/generate") view=GeneratePage />
                        <Route path=path!("/settings") view=SettingsPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
