use tracing_subscriber::EnvFilter;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dioxus_desktop::Config;
    use parish_console::ui_dioxus::App;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parish_console=info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting parish console");

    // Launch the Dioxus desktop app
    dioxus_desktop::launch::launch(App, vec![], Config::default());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use parish_console::ui_dioxus::App;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("parish_console=info"))
        .without_time()
        .init();

    dioxus::launch(App);
}
