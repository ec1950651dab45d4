// Dioxus UI - routed pages over the shared AppContext
pub mod app;
pub mod components;
pub mod router;
pub mod state;
pub mod views;

pub use app::App;
