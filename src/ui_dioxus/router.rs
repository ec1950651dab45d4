use dioxus::prelude::*;

use crate::domain::session::{Access, AccessDecision};
use crate::ui_dioxus::state::{AppContext, LiveState};
use crate::ui_dioxus::views::*;

#[derive(Clone, Routable, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        #[route("/")]
        Events {},

        #[route("/transactions")]
        Transactions {},

        #[route("/sacraments")]
        Sacraments {},
    #[end_layout]

    #[route("/login")]
    Login {},
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Login {} => Access::Public,
            Route::Transactions {} => Access::AdminOnly,
            Route::Events {} | Route::Sacraments {} => Access::Authenticated,
        }
    }
}

#[component]
fn Events() -> Element {
    rsx! { EventsView {} }
}

#[component]
fn Transactions() -> Element {
    rsx! { TransactionsView {} }
}

#[component]
fn Sacraments() -> Element {
    rsx! { SacramentsView {} }
}

#[component]
fn Login() -> Element {
    rsx! {
        LoginView {
            on_signed_in: move |_| {
                navigator().replace(Route::Events {});
            },
        }
    }
}

/// Gates every page behind its access rule. An expired session lands here
/// too, so the login form replaces the page in place.
#[component]
fn Shell() -> Element {
    let ctx = use_context::<AppContext>();
    let live = use_context::<LiveState>();
    let route = use_route::<Route>();

    // Subscribe to sign-in, sign-out and expiry
    let _revision = live.session_revision.read();
    let user = ctx.session.current_user();

    match route.access().decide(user.as_ref()) {
        AccessDecision::RequireLogin => rsx! {
            LoginView { on_signed_in: |_| {} }
        },
        AccessDecision::Forbidden => rsx! {
            NavBar {}
            AccessDenied {}
        },
        AccessDecision::Allow => rsx! {
            NavBar {}
            Outlet::<Route> {}
        },
    }
}

#[component]
fn NavBar() -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();
    let route = use_route::<Route>();
    let user = ctx.session.current_user();
    let is_admin = user.as_ref().is_some_and(|u| u.is_admin());
    let user_name = user.map(|u| u.name).unwrap_or_default();

    let logout = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            spawn(async move {
                ctx.auth.logout().await;
                live.sync(&ctx);
            });
        }
    };

    rsx! {
        nav {
            style: "display: flex; align-items: center; gap: 8px; padding: 12px 24px;
                   background: #1f2937; color: white;",

            div { style: "font-weight: 600; margin-right: 16px;", "⛪ {ctx.config.parish.name}" }

            NavItem { to: Route::Events {}, label: "📅 Events", active: route == Route::Events {} }
            if is_admin {
                NavItem {
                    to: Route::Transactions {},
                    label: "💰 Transactions",
                    active: route == Route::Transactions {},
                }
            }
            NavItem { to: Route::Sacraments {}, label: "📜 Sacraments", active: route == Route::Sacraments {} }

            div { style: "margin-left: auto; font-size: 13px; color: #d1d5db;", "{user_name}" }
            button {
                style: "padding: 6px 12px; background: transparent; color: white; border: 1px solid #4b5563;
                       border-radius: 6px; cursor: pointer; font-size: 13px;",
                onclick: logout,
                "Logout"
            }
        }
    }
}

#[component]
fn NavItem(to: Route, label: &'static str, active: bool) -> Element {
    let background = if active { "#374151" } else { "transparent" };
    rsx! {
        Link {
            to: to,
            style: "padding: 6px 12px; border-radius: 6px; color: white; text-decoration: none;
                   font-size: 14px; background: {background};",
            "{label}"
        }
    }
}
