use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    Escape,
    Backdrop,
    CloseButton,
}

/// Nothing dismisses a dialog while its request is in flight.
pub fn should_dismiss(trigger: DismissTrigger, busy: bool, backdrop_closes: bool) -> bool {
    if busy {
        return false;
    }
    match trigger {
        DismissTrigger::Backdrop => backdrop_closes,
        DismissTrigger::Escape | DismissTrigger::CloseButton => true,
    }
}

/// Modal frame shared by every dialog. Its Escape and backdrop listeners are
/// attached to its own elements, so they exist only while it is mounted.
#[component]
pub fn ScopedDialog(
    title: String,
    busy: bool,
    on_dismiss: EventHandler<()>,
    #[props(default = true)] backdrop_closes: bool,
    #[props(default = "560px".to_string())] max_width: String,
    children: Element,
) -> Element {
    rsx! {
        // Modal backdrop
        div {
            style: "position: fixed; top: 0; left: 0; right: 0; bottom: 0;
                   background: rgba(0, 0, 0, 0.5); z-index: 1000; outline: none;
                   display: flex; align-items: center; justify-content: center;",
            tabindex: "-1",
            onmounted: move |evt: MountedEvent| {
                spawn(async move {
                    let _ = evt.set_focus(true).await;
                });
            },
            onkeydown: move |evt: KeyboardEvent| {
                if evt.key() == Key::Escape
                    && should_dismiss(DismissTrigger::Escape, busy, backdrop_closes)
                {
                    on_dismiss.call(());
                }
            },
            onclick: move |_| {
                if should_dismiss(DismissTrigger::Backdrop, busy, backdrop_closes) {
                    on_dismiss.call(());
                }
            },

            // Modal content
            div {
                style: "background: white; border-radius: 12px; padding: 24px;
                       width: 90%; max-width: {max_width}; max-height: 85vh; overflow-y: auto;
                       box-shadow: 0 10px 40px rgba(0, 0, 0, 0.2);",
                onclick: move |e| e.stop_propagation(),

                div {
                    style: "display: flex; justify-content: space-between; align-items: center;
                           margin-bottom: 16px;",
                    h3 {
                        style: "margin: 0; font-size: 20px; font-weight: 600;",
                        "{title}"
                    }
                    button {
                        style: "border: none; background: none; font-size: 20px; cursor: pointer; color: #666;",
                        disabled: busy,
                        onclick: move |_| {
                            if should_dismiss(DismissTrigger::CloseButton, busy, backdrop_closes) {
                                on_dismiss.call(());
                            }
                        },
                        "×"
                    }
                }

                {children}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_blocks_every_trigger() {
        for trigger in [
            DismissTrigger::Escape,
            DismissTrigger::Backdrop,
            DismissTrigger::CloseButton,
        ] {
            assert!(!should_dismiss(trigger, true, true));
            assert!(should_dismiss(trigger, false, true));
        }
    }

    #[test]
    fn test_backdrop_can_be_disabled() {
        assert!(!should_dismiss(DismissTrigger::Backdrop, false, false));
        assert!(should_dismiss(DismissTrigger::Escape, false, false));
    }
}
