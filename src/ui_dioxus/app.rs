use dioxus::prelude::*;
use std::time::Duration;

use crate::config::ConsoleConfig;
use crate::ui_dioxus::components::Toaster;
use crate::ui_dioxus::router::Route;
use crate::ui_dioxus::state::{AppContext, LiveState};

const SYNC_INTERVAL: Duration = Duration::from_millis(250);

#[component]
pub fn App() -> Element {
    let setup = use_hook(|| {
        ConsoleConfig::from_env()
            .and_then(AppContext::from_config)
            .map_err(|e| format!("{:#}", e))
    });

    match setup {
        Ok(ctx) => rsx! { ConsoleRoot { ctx: ctx } },
        Err(message) => {
            tracing::error!(error = %message, "Console failed to start");
            rsx! { ConfigurationError { message: message } }
        }
    }
}

#[component]
fn ConsoleRoot(ctx: AppContext) -> Element {
    let ctx = use_context_provider(|| ctx);
    let mut live = use_context_provider(|| LiveState {
        session_revision: Signal::new(ctx.session.revision()),
        toasts: Signal::new(Vec::new()),
    });

    // Services update shared state off the render path; mirror it into signals
    use_future(move || {
        let ctx = ctx.clone();
        async move {
            loop {
                live.sync(&ctx);
                tokio::time::sleep(SYNC_INTERVAL).await;
            }
        }
    });

    rsx! {
        div {
            style: "min-height: 100vh; background: #f9fafb; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;",
            Router::<Route> {}
            Toaster {}
        }
    }
}

#[component]
fn ConfigurationError(message: String) -> Element {
    rsx! {
        div {
            style: "padding: 40px; max-width: 640px; margin: 0 auto; font-family: sans-serif;",
            h2 { style: "color: #dc2626;", "Configuration Error" }
            p { "The console could not start with the current settings." }
            pre {
                style: "background: #fef2f2; border: 1px solid #fecaca; border-radius: 6px; padding: 12px; white-space: pre-wrap;",
                "{message}"
            }
        }
    }
}
