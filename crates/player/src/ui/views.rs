//! Menu, header, character chooser and activity area

use dioxus::prelude::*;

use explorers_domain::SceneId;

use super::use_session;

#[component]
pub fn MainMenu() -> Element {
    let mut session = use_session();

    rsx! {
        div {
            class: "main-menu",
            h1 { "Little Explorers" }
            p { "Pick a friend and start exploring!" }

            button {
                class: "btn",
                onclick: move |_| {
                    session.write().set_view("game");
                },
                "Start Exploring"
            }
            button {
                class: "btn secondary",
                onclick: move |_| {
                    session.write().set_view("character-select");
                },
                "Choose a Character"
            }
        }
    }
}

#[component]
pub fn AppHeader() -> Element {
    let mut session = use_session();
    let header = session.read().header();

    rsx! {
        header {
            class: "app-header",

            button {
                class: "btn secondary",
                onclick: move |_| session.write().back(),
                "← Menu"
            }

            if let Some(portrait) = header.portrait_ref {
                img { src: "{portrait}", alt: "{header.title}" }
            }
            span { class: "selected-name", "{header.title}" }
            if let Some(role) = header.role {
                span { class: "selected-role", "{role}" }
            }
            span { class: "scene-name", "{header.scene_name}" }
        }
    }
}

#[component]
pub fn CharacterSelect() -> Element {
    let mut session = use_session();
    let characters = session.read().registry().all();

    rsx! {
        div {
            class: "character-grid",
            id: "character-select",

            for character in characters.iter() {
                div {
                    key: "{character.id}",
                    class: "character-option",
                    role: "button",
                    tabindex: 0,
                    onclick: move |_| {
                        session.write().select_character(character.id);
                    },
                    onkeydown: move |e: KeyboardEvent| {
                        if e.key() == Key::Enter || e.key() == Key::Character(" ".to_string()) {
                            e.prevent_default();
                            e.stop_propagation();
                            session.write().select_character(character.id);
                        }
                    },

                    img { src: "{character.portrait_ref}", alt: "{character.display_name}" }
                    h3 { "{character.emoji} {character.display_name}" }
                    p { "{character.role}" }
                }
            }
        }
    }
}

#[component]
pub fn SceneSwitcher() -> Element {
    let mut session = use_session();
    let active = session.read().state().active_scene;

    rsx! {
        nav {
            class: "scene-switcher",

            for scene in SceneId::ALL {
                button {
                    key: "{scene}",
                    class: if scene == active { "btn secondary active" } else { "btn secondary" },
                    onclick: move |_| session.write().select_scene(scene),
                    "{scene.display_name()}"
                }
            }
        }
    }
}

#[component]
pub fn ActivityArea() -> Element {
    let session = use_session();
    let scene = session.read().state().active_scene;

    rsx! {
        section {
            class: "activity-area active",
            id: "{scene}",
            style: "background-image: url('{scene.background_ref()}');",
            h2 { "{scene.display_name()}" }
        }
    }
}
