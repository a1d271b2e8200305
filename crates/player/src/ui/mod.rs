//! Dioxus host surface
//!
//! The UI holds no state machine of its own: it renders whatever the
//! [`SessionController`] derives (visibility, header, chat log) and forwards
//! clicks, keys and submits back into it.

use dioxus::prelude::*;

use crate::application::{ReplyResolver, SessionController};
use crate::config::{AppConfig, ShellKind};
use crate::state::Platform;

mod chat_panel;
mod views;

use chat_panel::ChatPanel;
use views::{ActivityArea, AppHeader, CharacterSelect, MainMenu, SceneSwitcher};

/// Hook to access the Platform from Dioxus context
pub fn use_platform() -> Platform {
    use_context::<Platform>()
}

/// Hook to access the session controller
pub fn use_session() -> Signal<SessionController> {
    use_context::<Signal<SessionController>>()
}

/// Hook to access the reply resolver
pub fn use_resolver() -> Signal<ReplyResolver> {
    use_context::<Signal<ReplyResolver>>()
}

pub fn app() -> Element {
    rsx! {
        AppRoot {}
    }
}

#[component]
fn AppRoot() -> Element {
    // Provided by the composition root (see `crates/player/src/main.rs`).
    let platform = use_platform();
    let config = use_context::<AppConfig>();
    let shell = config.shell;

    let platform_for_session = platform.clone();
    let config_for_session = config.clone();
    let mut session = use_context_provider(move || {
        Signal::new(SessionController::bootstrap(
            platform_for_session,
            &config_for_session,
        ))
    });
    use_context_provider(move || {
        Signal::new(ReplyResolver::from_config(platform, config.reply.clone()))
    });

    let shell_class = match shell {
        ShellKind::Desktop => "explorers-shell desktop",
        ShellKind::Mobile => "explorers-shell mobile",
    };
    let visibility = session.read().visibility();

    rsx! {
        document::Stylesheet {
            href: asset!("assets/css/explorers.css"),
        }

        div {
            class: "{shell_class}",
            tabindex: 0,
            style: "width: 100vw; height: 100vh; overflow: hidden; outline: none;",
            onkeydown: move |e: KeyboardEvent| {
                if session.write().handle_key(&e.key().to_string()) {
                    e.prevent_default();
                }
            },

            if visibility.main_menu {
                MainMenu {}
            }

            if visibility.game_container {
                div {
                    class: "game-container",

                    if visibility.header {
                        AppHeader {}
                    }
                    if visibility.character_select {
                        CharacterSelect {}
                    }
                    if visibility.activity_area {
                        SceneSwitcher {}
                        ActivityArea {}
                    }
                }
            }

            if visibility.chat_panel {
                ChatPanel {}
            } else if visibility.game_container {
                button {
                    class: "btn chat-toggle",
                    onclick: move |_| session.write().open_chat(true),
                    "💬 Chat"
                }
            }
        }
    }
}
