//! Companion chat panel

use std::rc::Rc;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;

use crate::application::{PendingReply, ReplyOutcome, SessionController};

use super::{use_resolver, use_session};

/// Owns a submitted reply until it is delivered. If the resolve task is
/// dropped first, the ticket is settled locally so it cannot stall the queue.
struct ReplyGuard {
    session: Signal<SessionController>,
    pending: Option<PendingReply>,
}

impl ReplyGuard {
    fn new(session: Signal<SessionController>, pending: PendingReply) -> Self {
        Self {
            session,
            pending: Some(pending),
        }
    }

    fn deliver(mut self, outcome: ReplyOutcome) {
        if let Some(pending) = self.pending.take() {
            self.session.write().deliver(pending.ticket, outcome);
        }
    }
}

impl Drop for ReplyGuard {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match self.session.try_write() {
            Ok(mut session) => {
                session.abandon(&pending);
            }
            Err(e) => {
                tracing::warn!(ticket = %pending.ticket, error = ?e, "Session gone, dropping reply");
            }
        }
    }
}

#[component]
pub fn ChatPanel() -> Element {
    let mut session = use_session();
    let resolver = use_resolver();
    let mut draft = use_signal(String::new);
    let mut input_ref = use_signal(|| None::<Rc<MountedData>>);

    // Focus the input whenever the controller asks for it
    use_effect(move || {
        let Some(input) = input_ref.read().clone() else {
            return;
        };
        if session.write().take_focus_request() {
            spawn(async move {
                if let Err(e) = input.set_focus(true).await {
                    tracing::debug!(error = ?e, "Could not focus chat input");
                }
            });
        }
    });

    let mut send = move || {
        let text = draft.read().clone();
        let Some(pending) = session.write().submit(&text) else {
            return;
        };
        draft.set(String::new());

        // Not tied to this panel: closing the chat must not cancel the reply
        let resolver = resolver.read().clone();
        let request = pending.request.clone();
        let guard = ReplyGuard::new(session, pending);
        spawn_forever(async move {
            let outcome = resolver.resolve(request).await;
            guard.deliver(outcome);
        });
    };

    let messages: Vec<_> = session
        .read()
        .history()
        .positioned()
        .map(|(pos, message)| (pos, message.clone()))
        .collect();
    let thinking = session.read().thinking_label();
    let speaker = session.read().header().title;

    rsx! {
        aside {
            class: "chat-panel",

            div {
                class: "chat-header",
                strong { "Chat with {speaker}" }
                button {
                    class: "btn secondary",
                    onclick: move |_| session.write().open_chat(false),
                    "✕"
                }
            }

            div {
                class: "chat-log",
                for (pos, message) in messages.iter() {
                    div {
                        key: "{message.timestamp().timestamp_millis()}-{pos}",
                        class: "chat-message {message.role()}",
                        "{message.text()}"
                    }
                }
                if let Some(label) = thinking {
                    div {
                        class: "chat-message assistant thinking",
                        "{label}"
                    }
                }
            }

            div {
                class: "chat-input",
                input {
                    id: "chat-input",
                    r#type: "text",
                    placeholder: "Ask me anything...",
                    value: "{draft}",
                    onmounted: move |e: MountedEvent| input_ref.set(Some(e.data())),
                    oninput: move |e| draft.set(e.value()),
                    onkeypress: move |e: KeyboardEvent| {
                        if e.key() == Key::Enter {
                            send();
                        }
                    },
                }
                button {
                    class: "btn",
                    onclick: move |_| send(),
                    "Send"
                }
            }

            ApiKeyBox {}
        }
    }
}

/// Lets a grown-up paste a key for the remote endpoint at runtime
#[component]
fn ApiKeyBox() -> Element {
    let mut resolver = use_resolver();
    let mut key = use_signal(String::new);
    let remote_enabled = resolver.read().is_remote_enabled();

    rsx! {
        details {
            class: "api-key-box",
            summary {
                if remote_enabled { "Smart replies: on" } else { "Smart replies: off" }
            }
            input {
                r#type: "password",
                placeholder: "API key",
                value: "{key}",
                oninput: move |e| key.set(e.value()),
            }
            button {
                class: "btn secondary",
                onclick: move |_| {
                    let value = key.read().clone();
                    resolver.write().set_api_key(Some(&value));
                    key.set(String::new());
                },
                "Save"
            }
        }
    }
}
