//! Session controller
//!
//! Owns the view/scene/character state machine and the chat session. Every
//! mutation goes through here; the store and the URL fragment are only
//! mirrors that get rewritten after each change and read back once, at
//! bootstrap.
//!
//! Reply flow:
//! 1. `submit` appends the user message and returns a [`PendingReply`]
//! 2. the host resolves `pending.request` with a `ReplyResolver`
//! 3. `deliver` appends the reply once every earlier ticket has landed
//!
//! A host whose resolve task dies before step 3 calls `abandon`, which
//! answers the ticket locally so later replies are not held back.

use explorers_domain::{
    greeting, Character, CharacterId, CharacterRegistry, Message, ReplyContext, SceneId, View,
};

use crate::application::chat::{ChatLog, ReplyQueue, ReplyTicket};
use crate::application::reply_resolver::{
    local_outcome, FallbackReason, ReplyOutcome, ReplyResolver,
};
use crate::application::store::PersistentStore;
use crate::config::AppConfig;
use crate::infrastructure::fragment::{get_param, with_param, SCENE_PARAM};
use crate::ports::outbound::{storage_keys, ReplyRequest};
use crate::state::Platform;

/// Navigational state of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub view: View,
    /// Set only by an explicit user selection
    pub character: Option<CharacterId>,
    pub active_scene: SceneId,
    pub chat_open: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            view: View::Menu,
            character: None,
            active_scene: SceneId::default(),
            chat_open: false,
        }
    }
}

/// A submitted message waiting for its reply
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReply {
    pub ticket: ReplyTicket,
    pub request: ReplyRequest,
}

/// Header bar contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    /// Selected character's name, or "No character"
    pub title: String,
    /// Portrait to show; hidden when no character is selected
    pub portrait_ref: Option<&'static str>,
    pub role: Option<&'static str>,
    pub scene_name: &'static str,
}

pub const NO_CHARACTER_TITLE: &str = "No character";

/// Who is "thinking" when no character is selected
pub const DEFAULT_SPEAKER: &str = "Your friend";

/// Which surfaces a host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub main_menu: bool,
    pub game_container: bool,
    pub header: bool,
    pub character_select: bool,
    pub activity_area: bool,
    pub chat_panel: bool,
}

pub struct SessionController {
    state: SessionState,
    history: ChatLog,
    replies: ReplyQueue<ReplyOutcome>,
    store: PersistentStore,
    platform: Platform,
    registry: CharacterRegistry,
    history_window: usize,
    focus_requested: bool,
}

impl SessionController {
    /// Hydrate a session from the fragment and the store.
    ///
    /// The initial scene comes from the fragment if valid, else from the
    /// store if valid, else the default, and is applied with full side
    /// effects. The view always starts at the menu.
    pub fn bootstrap(platform: Platform, config: &AppConfig) -> Self {
        let store = PersistentStore::new(platform.clone());
        let registry = CharacterRegistry::builtin();

        let from_fragment = get_param(&platform.fragment(), SCENE_PARAM)
            .and_then(|id| id.parse::<SceneId>().ok());
        let from_store = store
            .get::<Option<String>>(storage_keys::ACTIVE_SCENE, None)
            .and_then(|id| id.parse::<SceneId>().ok());
        let scene = from_fragment.or(from_store).unwrap_or_default();

        let character = store
            .get::<Option<String>>(storage_keys::CHARACTER, None)
            .and_then(|id| {
                if registry.contains(&id) {
                    Some(CharacterId::new(id))
                } else {
                    tracing::warn!(character = %id, "Dropping unknown persisted character");
                    store.remove(storage_keys::CHARACTER);
                    None
                }
            });

        let mut controller = Self {
            state: SessionState {
                view: View::Menu,
                character,
                active_scene: scene,
                chat_open: store.get(storage_keys::CHAT_OPEN, false),
            },
            history: ChatLog::new(config.history_cap),
            replies: ReplyQueue::new(),
            store,
            platform,
            registry,
            history_window: config.reply.history_window,
            focus_requested: false,
        };

        controller.apply_scene(scene);
        controller.restore();

        tracing::info!(
            scene = %controller.state.active_scene,
            character = ?controller.state.character,
            messages = controller.history.len(),
            "Session bootstrapped"
        );
        controller
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &ChatLog {
        &self.history
    }

    pub fn registry(&self) -> &CharacterRegistry {
        &self.registry
    }

    // -------------------------------------------------------------------------
    // View / scene state machine
    // -------------------------------------------------------------------------

    /// Switch to a view by wire name. Unknown names are logged and ignored.
    pub fn set_view(&mut self, target: &str) -> bool {
        match target.parse::<View>() {
            Ok(view) => {
                self.transition(view);
                true
            }
            Err(e) => {
                tracing::error!(view = target, error = %e, "Ignoring unknown view");
                false
            }
        }
    }

    /// Enter `view`. Entering the game re-applies the current scene.
    pub fn transition(&mut self, view: View) {
        tracing::debug!(from = %self.state.view, to = %view, "View transition");
        self.state.view = view;
        if view == View::Game {
            self.apply_scene(self.state.active_scene);
        }
    }

    /// Select a scene by id. Unknown ids become the default scene.
    pub fn set_scene(&mut self, id: &str) {
        self.apply_scene(SceneId::resolve_or_default(id));
    }

    pub fn select_scene(&mut self, scene: SceneId) {
        self.apply_scene(scene);
    }

    fn apply_scene(&mut self, scene: SceneId) {
        self.state.active_scene = scene;
        self.store.set(storage_keys::ACTIVE_SCENE, scene.as_str());

        let fragment = with_param(&self.platform.fragment(), SCENE_PARAM, scene.as_str());
        if let Err(e) = self.platform.replace_fragment(&fragment) {
            tracing::warn!(scene = %scene, error = %e, "Failed to update URL fragment");
        }
        tracing::debug!(scene = %scene, "Scene applied");
    }

    /// Record a character chosen by the user and enter the game.
    pub fn select_character(&mut self, id: &str) -> bool {
        let character = match self.registry.require(id) {
            Ok(character) => character,
            Err(e) => {
                tracing::error!(character = id, error = %e, "Ignoring unknown character");
                return false;
            }
        };

        self.state.character = Some(character.character_id());
        self.store.set(storage_keys::CHARACTER, character.id);
        tracing::info!(character = character.id, "Character selected");
        self.transition(View::Game);
        true
    }

    /// Keyboard shortcut handling. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" {
            self.transition(View::Menu);
            return true;
        }
        false
    }

    pub fn back(&mut self) {
        self.transition(View::Menu);
    }

    fn current_character(&self) -> Option<&'static Character> {
        self.state
            .character
            .as_ref()
            .and_then(|id| self.registry.get(id.as_str()))
    }

    pub fn header(&self) -> HeaderView {
        let character = self.current_character();
        HeaderView {
            title: character
                .map(|c| c.display_name.to_string())
                .unwrap_or_else(|| NO_CHARACTER_TITLE.to_string()),
            portrait_ref: character.map(|c| c.portrait_ref),
            role: character.map(|c| c.role),
            scene_name: self.state.active_scene.display_name(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self.state.view {
            View::Menu => Visibility {
                main_menu: true,
                ..Visibility::default()
            },
            View::CharacterSelect => Visibility {
                game_container: true,
                header: true,
                character_select: true,
                chat_panel: self.state.chat_open,
                ..Visibility::default()
            },
            View::Game => Visibility {
                game_container: true,
                header: true,
                activity_area: true,
                chat_panel: self.state.chat_open,
                ..Visibility::default()
            },
        }
    }

    // -------------------------------------------------------------------------
    // Chat session
    // -------------------------------------------------------------------------

    /// Open or close the chat panel. Opening on an empty log posts a greeting.
    pub fn open_chat(&mut self, open: bool) {
        self.state.chat_open = open;
        self.store.set(storage_keys::CHAT_OPEN, &open);

        if !open {
            return;
        }
        self.focus_requested = true;

        if self.history.is_empty() {
            let ctx = ReplyContext::new(self.current_character(), self.state.active_scene);
            let message = Message::assistant(greeting(&ctx), self.platform.now());
            self.append(message);
        }
    }

    pub fn toggle_chat(&mut self) {
        self.open_chat(!self.state.chat_open);
    }

    /// Returns true once after the chat panel was opened
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Replace the visible log with the persisted one. Does not request replies.
    pub fn restore(&mut self) {
        let persisted: Vec<Message> = self.store.get(storage_keys::CHAT_HISTORY, Vec::new());
        let total = persisted.len();
        self.history = ChatLog::restore(persisted, self.history.cap());

        if total > self.history.len() {
            tracing::debug!(
                dropped = total - self.history.len(),
                "Persisted history exceeded cap, dropped oldest"
            );
        }
    }

    /// Append the user's message and build its reply request.
    /// Blank input is ignored.
    pub fn submit(&mut self, text: &str) -> Option<PendingReply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        // Context is captured before the new message goes in
        let recent_history = self.history.recent(self.history_window);
        let character = self.current_character();

        self.append(Message::user(text, self.platform.now()));

        let ticket = self.replies.issue();
        tracing::debug!(ticket = %ticket, "Message submitted");

        Some(PendingReply {
            ticket,
            request: ReplyRequest {
                persona: character.map(|c| c.persona_prompt.to_string()),
                recent_history,
                scene: self.state.active_scene,
                character: self.state.character.clone(),
                user_text: text.to_string(),
            },
        })
    }

    /// Hand back a resolved reply. Returns the assistant messages appended,
    /// which may be none (an earlier reply is still outstanding) or several
    /// (this one unblocked later ones).
    pub fn deliver(&mut self, ticket: ReplyTicket, outcome: ReplyOutcome) -> Vec<Message> {
        let released = self.replies.complete(ticket, outcome);
        if released.is_empty() {
            tracing::debug!(ticket = %ticket, "Reply parked until earlier replies arrive");
            return Vec::new();
        }

        let mut appended = Vec::with_capacity(released.len());
        for outcome in released {
            let message = Message::assistant(outcome.text, self.platform.now());
            self.history.push(message.clone());
            appended.push(message);
        }
        self.persist_history();
        appended
    }

    /// Settle a pending reply whose resolve task ended without delivering,
    /// using the local fallback so the ticket does not block later replies.
    pub fn abandon(&mut self, pending: &PendingReply) -> Vec<Message> {
        tracing::warn!(ticket = %pending.ticket, "Reply task ended early, answering locally");
        let outcome = local_outcome(&pending.request, &self.registry, FallbackReason::Abandoned);
        self.deliver(pending.ticket, outcome)
    }

    /// Submit, resolve and deliver in one step
    pub async fn submit_and_resolve(
        &mut self,
        text: &str,
        resolver: &ReplyResolver,
    ) -> Vec<Message> {
        let Some(pending) = self.submit(text) else {
            return Vec::new();
        };
        let outcome = resolver.resolve(pending.request).await;
        self.deliver(pending.ticket, outcome)
    }

    /// Number of replies not yet appended
    pub fn pending_replies(&self) -> usize {
        self.replies.outstanding()
    }

    /// Status line shown while a reply is outstanding
    pub fn thinking_label(&self) -> Option<String> {
        if self.pending_replies() == 0 {
            return None;
        }
        let name = self
            .current_character()
            .map(|c| c.display_name)
            .unwrap_or(DEFAULT_SPEAKER);
        Some(format!("{name} is thinking... 💭"))
    }

    fn append(&mut self, message: Message) {
        self.history.push(message);
        self.persist_history();
    }

    fn persist_history(&self) {
        self.store
            .set(storage_keys::CHAT_HISTORY, &self.history.messages());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reply_resolver::{FallbackReason, ReplySource};
    use crate::config::ReplyConfig;
    use crate::infrastructure::platform::mock::{
        create_mock_platform, MockLocationProvider, MockPlatform, MockStorageProvider, SleepMode,
    };
    use explorers_domain::fallback::SCIENCE_CORNER_IDEA;
    use explorers_domain::MessageRole;
    use futures_util::FutureExt;

    fn controller(mock: &MockPlatform) -> SessionController {
        SessionController::bootstrap(mock.platform.clone(), &AppConfig::default())
    }

    fn local_resolver(mock: &MockPlatform) -> ReplyResolver {
        ReplyResolver::local(mock.platform.clone(), ReplyConfig::default())
    }

    fn reply(text: &str) -> ReplyOutcome {
        ReplyOutcome {
            text: text.to_string(),
            source: ReplySource::Fallback(FallbackReason::NotConfigured),
        }
    }

    fn texts(controller: &SessionController) -> Vec<String> {
        controller
            .history()
            .iter()
            .map(|m| m.text().to_string())
            .collect()
    }

    #[test]
    fn fresh_session_starts_at_menu_with_defaults() {
        let mock = create_mock_platform();
        let session = controller(&mock);

        assert_eq!(session.state(), &SessionState::default());
        assert!(session.history().is_empty());
        assert!(session.visibility().main_menu);
        assert!(!session.visibility().header);
        assert_eq!(mock.platform.fragment(), "scene=discovery-zone");
        assert_eq!(
            mock.storage.raw(storage_keys::ACTIVE_SCENE).as_deref(),
            Some("\"discovery-zone\"")
        );
    }

    #[test]
    fn fragment_scene_wins_over_stored_scene() {
        let storage = MockStorageProvider::default();
        storage.insert_raw(storage_keys::ACTIVE_SCENE, "\"math-garden\"");
        let location = MockLocationProvider::with_fragment("#lang=en&scene=nature-path");
        let mock = MockPlatform::with_parts(storage, location, SleepMode::Instant);

        let session = controller(&mock);
        assert_eq!(session.state().active_scene, SceneId::NaturePath);
        assert_eq!(
            mock.storage.raw(storage_keys::ACTIVE_SCENE).as_deref(),
            Some("\"nature-path\"")
        );
        assert_eq!(mock.platform.fragment(), "lang=en&scene=nature-path");
    }

    #[test]
    fn invalid_fragment_falls_back_to_store_then_default() {
        let storage = MockStorageProvider::default();
        storage.insert_raw(storage_keys::ACTIVE_SCENE, "\"math-garden\"");
        let location = MockLocationProvider::with_fragment("scene=moon-base");
        let mock = MockPlatform::with_parts(storage, location, SleepMode::Instant);
        assert_eq!(controller(&mock).state().active_scene, SceneId::MathGarden);

        let storage = MockStorageProvider::default();
        storage.insert_raw(storage_keys::ACTIVE_SCENE, "\"volcano\"");
        let mock = MockPlatform::with_parts(
            storage,
            MockLocationProvider::with_fragment("scene=moon-base"),
            SleepMode::Instant,
        );
        assert_eq!(controller(&mock).state().active_scene, SceneId::DiscoveryZone);
    }

    #[test]
    fn unknown_scene_selects_default() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);

        session.set_scene("math-garden");
        assert_eq!(session.state().active_scene, SceneId::MathGarden);

        session.set_scene("lava-lake");
        assert_eq!(session.state().active_scene, SceneId::DiscoveryZone);
        assert_eq!(mock.platform.fragment(), "scene=discovery-zone");
    }

    #[test]
    fn scene_change_preserves_other_fragment_params() {
        let mock = MockPlatform::with_parts(
            MockStorageProvider::default(),
            MockLocationProvider::with_fragment("scene=math-garden&lang=en"),
            SleepMode::Instant,
        );
        let mut session = controller(&mock);

        session.select_scene(SceneId::ScienceCorner);
        assert_eq!(mock.platform.fragment(), "scene=science-corner&lang=en");
    }

    #[test]
    fn unknown_view_is_a_no_op() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        session.set_view("game");

        assert!(!session.set_view("settings"));
        assert_eq!(session.state().view, View::Game);
    }

    #[test]
    fn entering_game_reapplies_the_scene() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        let before = mock.location.replacements();

        assert!(session.set_view("game"));
        assert_eq!(session.state().active_scene, SceneId::DiscoveryZone);
        assert!(session.visibility().activity_area);
        assert_eq!(mock.location.replacements(), before + 1);

        session.set_view("game");
        assert_eq!(mock.location.replacements(), before + 2);
    }

    #[test]
    fn visibility_follows_view() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        session.open_chat(true);

        assert!(session.set_view("character"));
        let vis = session.visibility();
        assert!(vis.game_container && vis.header && vis.character_select);
        assert!(!vis.activity_area && !vis.main_menu);
        assert!(vis.chat_panel);

        session.back();
        let vis = session.visibility();
        assert!(vis.main_menu);
        assert!(!vis.chat_panel && !vis.header && !vis.game_container);
        // Hidden but not forgotten
        assert!(session.state().chat_open);
    }

    #[test]
    fn escape_returns_to_menu() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        session.set_view("game");

        assert!(!session.handle_key("Enter"));
        assert_eq!(session.state().view, View::Game);
        assert!(session.handle_key("Escape"));
        assert_eq!(session.state().view, View::Menu);
    }

    #[test]
    fn selecting_character_persists_and_enters_game() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        session.set_view("character-select");

        assert!(!session.select_character("dragon"));
        assert_eq!(session.state().character, None);
        assert_eq!(session.state().view, View::CharacterSelect);

        assert!(session.select_character("ella"));
        assert_eq!(session.state().character, Some(CharacterId::from("ella")));
        assert_eq!(session.state().view, View::Game);
        assert_eq!(mock.storage.raw(storage_keys::CHARACTER).as_deref(), Some("\"ella\""));

        let header = session.header();
        assert_eq!(header.title, "Ella");
        assert_eq!(header.portrait_ref, Some("assets/images/characters/ella.png"));
    }

    #[test]
    fn header_without_character() {
        let mock = create_mock_platform();
        let header = controller(&mock).header();
        assert_eq!(header.title, NO_CHARACTER_TITLE);
        assert_eq!(header.portrait_ref, None);
        assert_eq!(header.scene_name, "Discovery Zone");
    }

    #[test]
    fn unknown_persisted_character_is_dropped() {
        let storage = MockStorageProvider::default();
        storage.insert_raw(storage_keys::CHARACTER, "\"dragon\"");
        let mock =
            MockPlatform::with_parts(storage, MockLocationProvider::default(), SleepMode::Instant);
        assert_eq!(controller(&mock).state().character, None);
        assert_eq!(mock.storage.raw(storage_keys::CHARACTER), None);
    }

    #[test]
    fn first_open_greets_exactly_once() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);

        session.open_chat(true);
        assert!(session.take_focus_request());
        assert!(!session.take_focus_request());
        assert_eq!(session.history().len(), 1);

        let greeting = &session.history().messages()[0];
        assert_eq!(greeting.role(), MessageRole::Assistant);
        assert!(greeting.text().contains("your Explorer buddy"));

        session.toggle_chat();
        assert!(!session.state().chat_open);
        session.toggle_chat();
        assert_eq!(session.history().len(), 1);
        assert_eq!(mock.storage.raw(storage_keys::CHAT_OPEN).as_deref(), Some("true"));
    }

    #[test]
    fn greeting_uses_selected_character() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        session.select_character("gina");
        session.open_chat(true);
        assert!(session.history().messages()[0].text().contains("Gina"));
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        assert!(session.submit("").is_none());
        assert!(session.submit("   \n").is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn submit_captures_context_before_the_new_message() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        session.select_character("pip");
        session.select_scene(SceneId::NaturePath);
        session.open_chat(true);

        let pending = session.submit("  where do birds sleep?  ").unwrap();
        let request = &pending.request;

        assert_eq!(request.user_text, "where do birds sleep?");
        assert_eq!(request.recent_history.len(), 1);
        assert_eq!(request.recent_history[0].role(), MessageRole::Assistant);
        assert_eq!(request.scene, SceneId::NaturePath);
        assert_eq!(request.character, Some(CharacterId::from("pip")));
        assert!(request.persona.as_deref().unwrap().contains("Pip"));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn history_window_limits_request_context() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        for i in 0..12 {
            let pending = session.submit(&format!("message {i}")).unwrap();
            session.deliver(pending.ticket, reply("ok"));
        }

        let pending = session.submit("last").unwrap();
        assert_eq!(pending.request.recent_history.len(), 8);
    }

    #[test]
    fn user_message_count_matches_submits() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        for text in ["one", "two", " ", "three"] {
            session.submit(text);
        }
        let users = session.history().iter().filter(|m| m.is_user()).count();
        assert_eq!(users, 3);
        assert_eq!(session.pending_replies(), 3);
    }

    #[test]
    fn history_never_exceeds_cap() {
        let mock = create_mock_platform();
        let config = AppConfig {
            history_cap: 5,
            ..AppConfig::default()
        };
        let mut session = SessionController::bootstrap(mock.platform.clone(), &config);

        for i in 0..4 {
            let pending = session.submit(&format!("q{i}")).unwrap();
            session.deliver(pending.ticket, reply(&format!("a{i}")));
            assert!(session.history().len() <= 5);
        }
        assert_eq!(texts(&session), vec!["a1", "q2", "a2", "q3", "a3"]);

        let persisted: Vec<Message> = serde_json::from_str(
            &mock.storage.raw(storage_keys::CHAT_HISTORY).unwrap(),
        )
        .unwrap();
        assert_eq!(persisted.len(), 5);
    }

    #[test]
    fn abandoned_ticket_does_not_block_later_replies() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);

        let lost = session.submit("purple dinosaurs").unwrap();
        let mut later = Vec::new();
        for i in 1..=5 {
            let pending = session.submit(&format!("q{i}")).unwrap();
            assert!(session.deliver(pending.ticket, reply(&format!("a{i}"))).is_empty());
            later.push(pending);
        }
        assert_eq!(session.pending_replies(), 6);

        let landed = session.abandon(&lost);
        assert_eq!(landed.len(), 6);
        assert!(landed[0].text().contains("\"purple dinosaurs\""));
        let rest: Vec<_> = landed[1..].iter().map(|m| m.text().to_string()).collect();
        assert_eq!(rest, vec!["a1", "a2", "a3", "a4", "a5"]);
        assert_eq!(session.pending_replies(), 0);

        // Later tickets land immediately again
        let next = session.submit("q6").unwrap();
        assert_eq!(session.deliver(next.ticket, reply("a6")).len(), 1);
    }

    #[test]
    fn abandoning_a_delivered_ticket_is_ignored() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);

        let pending = session.submit("hello there").unwrap();
        session.deliver(pending.ticket, reply("hi"));
        let before = session.history().len();

        assert!(session.abandon(&pending).is_empty());
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn thinking_label_tracks_pending_replies() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        assert_eq!(session.thinking_label(), None);

        let pending = session.submit("hello").unwrap();
        assert_eq!(
            session.thinking_label().as_deref(),
            Some("Your friend is thinking... 💭")
        );

        session.select_character("ella");
        assert_eq!(
            session.thinking_label().as_deref(),
            Some("Ella is thinking... 💭")
        );

        session.deliver(pending.ticket, reply("hi"));
        assert_eq!(session.thinking_label(), None);
    }

    #[test]
    fn out_of_order_replies_land_in_submission_order() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);

        let first = session.submit("first").unwrap();
        let second = session.submit("second").unwrap();
        let third = session.submit("third").unwrap();

        assert!(session.deliver(second.ticket, reply("re: second")).is_empty());
        assert!(session.deliver(third.ticket, reply("re: third")).is_empty());

        let landed = session.deliver(first.ticket, reply("re: first"));
        assert_eq!(landed.len(), 3);
        assert_eq!(
            texts(&session),
            vec!["first", "second", "third", "re: first", "re: second", "re: third"]
        );
        assert_eq!(session.pending_replies(), 0);
    }

    #[test]
    fn history_survives_reload() {
        let storage = MockStorageProvider::default();
        let mock =
            MockPlatform::with_parts(storage.clone(), MockLocationProvider::default(), SleepMode::Instant);
        let mut session = controller(&mock);
        session.open_chat(true);
        let pending = session.submit("hello").unwrap();
        session.deliver(pending.ticket, reply("hi!"));
        let before = session.history().messages();

        let reloaded_platform =
            MockPlatform::with_parts(storage, MockLocationProvider::default(), SleepMode::Instant);
        let mut reloaded = controller(&reloaded_platform);
        assert_eq!(reloaded.history().messages(), before);
        assert!(reloaded.state().chat_open);
        assert_eq!(reloaded.state().view, View::Menu);

        // Replaying again is idempotent and never asks for replies
        reloaded.restore();
        assert_eq!(reloaded.history().messages(), before);
        assert_eq!(reloaded.pending_replies(), 0);
    }

    #[test]
    fn oversized_persisted_history_is_truncated_on_load() {
        let mock = create_mock_platform();
        let mut session = controller(&mock);
        for i in 0..6 {
            session.submit(&format!("m{i}"));
        }

        let config = AppConfig {
            history_cap: 4,
            ..AppConfig::default()
        };
        let reloaded = SessionController::bootstrap(mock.platform.clone(), &config);
        assert_eq!(texts(&reloaded), vec!["m2", "m3", "m4", "m5"]);
    }

    #[test]
    fn storage_failures_do_not_change_in_memory_state() {
        let mock = create_mock_platform();
        mock.storage.set_fail_reads(true);
        mock.storage.set_fail_writes(true);
        mock.location.set_fail(true);

        let mut session = controller(&mock);
        session.select_character("leo");
        session.select_scene(SceneId::MathGarden);
        session.open_chat(true);
        let pending = session.submit("count with me").unwrap();
        session.deliver(pending.ticket, reply("1, 2, 3!"));

        assert_eq!(session.state().character, Some(CharacterId::from("leo")));
        assert_eq!(session.state().active_scene, SceneId::MathGarden);
        assert!(session.state().chat_open);
        assert_eq!(session.history().len(), 3);
        assert_eq!(mock.storage.raw(storage_keys::CHAT_HISTORY), None);
    }

    #[test]
    fn fresh_session_scenario_with_local_replies() {
        let mock = create_mock_platform();
        let resolver = local_resolver(&mock);
        let mut session = controller(&mock);

        session.set_view("game");
        assert_eq!(session.state().active_scene, SceneId::DiscoveryZone);
        assert!(session.visibility().activity_area);

        session.open_chat(true);
        assert_eq!(session.history().len(), 1);

        // Outside the science corner the topic rule does not fire
        let landed = session
            .submit_and_resolve("science", &resolver)
            .now_or_never()
            .unwrap();
        assert_eq!(landed.len(), 1);
        assert!(!landed[0].text().contains(SCIENCE_CORNER_IDEA));
        assert!(landed[0].text().contains("science"));

        session.select_scene(SceneId::ScienceCorner);
        let landed = session
            .submit_and_resolve("science", &resolver)
            .now_or_never()
            .unwrap();
        assert!(landed[0].text().contains(SCIENCE_CORNER_IDEA));
        assert_eq!(session.history().len(), 5);
    }
}
