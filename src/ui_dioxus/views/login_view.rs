use dioxus::prelude::*;

use crate::services::auth_service::LoginOutcome;
use crate::ui_dioxus::state::{AppContext, LiveState};

const INPUT_STYLE: &str = "width: 100%; padding: 10px 12px; border: 1px solid #d1d5db; border-radius: 6px;
                           font-size: 14px; box-sizing: border-box;";

#[component]
pub fn LoginView(on_signed_in: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let mut live = use_context::<LiveState>();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let expired = ctx.session.is_expired();

    let mut submit = {
        let ctx = ctx.clone();
        move || {
            if *submitting.read() {
                return;
            }
            let ctx = ctx.clone();
            let address = email.read().clone();
            let secret = password.read().clone();
            submitting.set(true);
            spawn(async move {
                let outcome = ctx.auth.login(&address, &secret).await;
                submitting.set(false);
                live.sync(&ctx);
                match outcome {
                    LoginOutcome::SignedIn(_) => {
                        password.set(String::new());
                        error.set(None);
                        on_signed_in.call(());
                    }
                    LoginOutcome::Rejected(message) => error.set(Some(message)),
                }
            });
        }
    };

    rsx! {
        div {
            style: "min-height: 100vh; display: flex; align-items: center; justify-content: center; background: #f3f4f6;",

            div {
                style: "background: white; border-radius: 12px; padding: 32px; width: 100%; max-width: 380px;
                       box-shadow: 0 10px 40px rgba(0, 0, 0, 0.08); display: flex; flex-direction: column; gap: 14px;",

                h2 { style: "margin: 0; text-align: center;", "⛪ {ctx.config.parish.name}" }
                p { style: "margin: 0; text-align: center; color: #6b7280; font-size: 14px;", "Sign in to the parish console" }

                if expired {
                    div {
                        style: "background: #fefce8; border: 1px solid #fef08a; border-radius: 6px; padding: 8px 12px; font-size: 13px;",
                        "Your session has expired. Please log in again."
                    }
                }
                if let Some(message) = error.read().clone() {
                    div {
                        style: "background: #fef2f2; border: 1px solid #fecaca; border-radius: 6px; padding: 8px 12px;
                               font-size: 13px; color: #b91c1c;",
                        "{message}"
                    }
                }

                input {
                    r#type: "email",
                    placeholder: "Email",
                    style: INPUT_STYLE,
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    style: INPUT_STYLE,
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                    onkeydown: {
                        let mut submit = submit.clone();
                        move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter {
                                submit();
                            }
                        }
                    },
                }
                button {
                    r#type: "button",
                    style: "padding: 10px; border: none; border-radius: 6px; background: #4f46e5; color: white;
                           font-size: 15px; cursor: pointer;",
                    disabled: *submitting.read(),
                    onclick: move |_| submit(),
                    if *submitting.read() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
