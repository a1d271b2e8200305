//! Local fallback replies
//!
//! When the remote reply endpoint is missing or fails, the chat still answers
//! from this table. Rules are evaluated top-to-bottom and the first match
//! wins; the final echo rule matches everything, so [`toy_reply`] is total.
//!
//! Matching is done on the lower-cased user text. Keywords of three
//! characters or fewer must match a whole word ("hi" must not fire on
//! "which"); longer keywords match anywhere in the text.

use crate::{Character, SceneId};

/// Name used when no character has been selected
pub const PLACEHOLDER_NAME: &str = "your Explorer buddy";

const PLACEHOLDER_EMOJI: &str = "✨";

/// Maximum number of characters of user text echoed back
const ECHO_LIMIT: usize = 80;

pub const SCIENCE_CORNER_IDEA: &str = "Let's do a float-or-sink test! Grab a spoon, a leaf and a \
    toy block, guess which ones will float, then drop them in a bowl of water to find out.";

pub const NATURE_PATH_IDEA: &str = "Let's go on a leaf hunt! Find one big leaf, one tiny leaf \
    and one leaf with a funny shape, then we can compare them.";

pub const MATH_GARDEN_IDEA: &str = "Let's count flowers! Count the red ones, then the yellow \
    ones, and tell me which color has more.";

pub const DISCOVERY_ZONE_IDEA: &str = "Let's play I-spy! I spy something round... can you find \
    three round things around you?";

/// What the fallback generator knows about the conversation
#[derive(Debug, Clone, Copy)]
pub struct ReplyContext<'a> {
    pub character: Option<&'a Character>,
    pub scene: SceneId,
}

impl<'a> ReplyContext<'a> {
    pub fn new(character: Option<&'a Character>, scene: SceneId) -> Self {
        Self { character, scene }
    }

    /// Display name of the speaking character, or the placeholder
    pub fn speaker_name(&self) -> &'a str {
        self.character
            .map(|c| c.display_name)
            .unwrap_or(PLACEHOLDER_NAME)
    }

    fn emoji(&self) -> &'a str {
        self.character.map(|c| c.emoji).unwrap_or(PLACEHOLDER_EMOJI)
    }
}

/// One entry of the fallback rule table
pub struct FallbackRule {
    pub name: &'static str,
    matches: fn(&str, &ReplyContext<'_>) -> bool,
    respond: fn(&str, &ReplyContext<'_>) -> String,
}

impl FallbackRule {
    /// Whether this rule applies; `lowered` must already be lower-cased.
    pub fn matches(&self, lowered: &str, ctx: &ReplyContext<'_>) -> bool {
        (self.matches)(lowered, ctx)
    }

    pub fn respond(&self, text: &str, ctx: &ReplyContext<'_>) -> String {
        (self.respond)(text, ctx)
    }
}

const GREETING_WORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "hiya",
    "howdy",
    "good morning",
    "good afternoon",
];
const HELP_WORDS: &[&str] = &["help", "hint", "stuck", "don't know", "dont know", "how do"];
const SCIENCE_WORDS: &[&str] = &[
    "science",
    "experiment",
    "magnet",
    "bubble",
    "float",
    "sink",
    "mix",
];
const NATURE_WORDS: &[&str] = &[
    "nature", "plant", "flower", "tree", "bug", "leaf", "leaves", "bird", "animal",
];
const MATH_WORDS: &[&str] = &["math", "count", "number", "shape", "add", "plus"];
const EXPLORE_WORDS: &[&str] = &["explore", "discover", "adventure", "spy"];
const THANKS_WORDS: &[&str] = &["thank", "thx"];

static RULES: [FallbackRule; 8] = [
    FallbackRule {
        name: "greeting",
        matches: |text, _| mentions(text, GREETING_WORDS),
        respond: |_, ctx| {
            format!(
                "{} Hi there! I'm {}. Welcome to the {}! What should we explore first?",
                ctx.emoji(),
                ctx.speaker_name(),
                ctx.scene.display_name()
            )
        },
    },
    FallbackRule {
        name: "help",
        matches: |text, _| mentions(text, HELP_WORDS),
        respond: |_, ctx| {
            format!(
                "{} Here's a hint from {}: {}",
                ctx.emoji(),
                ctx.speaker_name(),
                scene_hint(ctx.scene)
            )
        },
    },
    FallbackRule {
        name: "science-corner",
        matches: |text, ctx| ctx.scene == SceneId::ScienceCorner && mentions(text, SCIENCE_WORDS),
        respond: |_, ctx| scene_idea(ctx, SCIENCE_CORNER_IDEA),
    },
    FallbackRule {
        name: "nature-path",
        matches: |text, ctx| ctx.scene == SceneId::NaturePath && mentions(text, NATURE_WORDS),
        respond: |_, ctx| scene_idea(ctx, NATURE_PATH_IDEA),
    },
    FallbackRule {
        name: "math-garden",
        matches: |text, ctx| ctx.scene == SceneId::MathGarden && mentions(text, MATH_WORDS),
        respond: |_, ctx| scene_idea(ctx, MATH_GARDEN_IDEA),
    },
    FallbackRule {
        name: "discovery-zone",
        matches: |text, ctx| ctx.scene == SceneId::DiscoveryZone && mentions(text, EXPLORE_WORDS),
        respond: |_, ctx| scene_idea(ctx, DISCOVERY_ZONE_IDEA),
    },
    FallbackRule {
        name: "thanks",
        matches: |text, _| mentions(text, THANKS_WORDS),
        respond: |_, ctx| {
            format!(
                "{} You're welcome! Exploring the {} with you is the best.",
                ctx.emoji(),
                ctx.scene.display_name()
            )
        },
    },
    FallbackRule {
        name: "echo",
        matches: |_, _| true,
        respond: echo,
    },
];

/// The ordered rule table
pub fn rules() -> &'static [FallbackRule] {
    &RULES
}

/// Name of the rule that answers `text` in `ctx`
pub fn matching_rule(text: &str, ctx: &ReplyContext<'_>) -> &'static str {
    select_rule(&text.to_lowercase(), ctx).name
}

/// Compute a local reply. Pure and total: every input yields exactly one
/// non-empty reply.
pub fn toy_reply(text: &str, ctx: &ReplyContext<'_>) -> String {
    select_rule(&text.to_lowercase(), ctx).respond(text, ctx)
}

/// Greeting posted when the chat panel is first opened on an empty log
pub fn greeting(ctx: &ReplyContext<'_>) -> String {
    format!(
        "{} Hi! I'm {}. What would you like to explore in the {} today?",
        ctx.emoji(),
        ctx.speaker_name(),
        ctx.scene.display_name()
    )
}

fn select_rule(lowered: &str, ctx: &ReplyContext<'_>) -> &'static FallbackRule {
    RULES
        .iter()
        .find(|rule| rule.matches(lowered, ctx))
        .unwrap_or(&RULES[RULES.len() - 1])
}

fn mentions(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        if keyword.chars().count() <= 3 {
            lowered
                .split(|c: char| !c.is_alphanumeric() && c != '\'')
                .any(|word| word == *keyword)
        } else {
            lowered.contains(keyword)
        }
    })
}

fn scene_hint(scene: SceneId) -> &'static str {
    match scene {
        SceneId::DiscoveryZone => "look for something you have never noticed before and tell me about it!",
        SceneId::ScienceCorner => "try guessing what will happen first, then test it. Guessing is what scientists do!",
        SceneId::NaturePath => "look closely at one leaf or bug. What colors and shapes can you see?",
        SceneId::MathGarden => "use your fingers to count. One, two, three... you've got this!",
    }
}

fn scene_idea(ctx: &ReplyContext<'_>, idea: &str) -> String {
    format!("{} {} has an idea: {}", ctx.emoji(), ctx.speaker_name(), idea)
}

fn echo(text: &str, ctx: &ReplyContext<'_>) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return format!(
            "{} I'm {} and I'm listening! What would you like to explore in the {}?",
            ctx.emoji(),
            ctx.speaker_name(),
            ctx.scene.display_name()
        );
    }

    let mut echoed: String = trimmed.chars().take(ECHO_LIMIT).collect();
    if trimmed.chars().count() > ECHO_LIMIT {
        echoed.push('…');
    }

    format!(
        "{} Ooh, you said \"{}\"! I'm {}, and I'd love to explore that with you in the {}.",
        ctx.emoji(),
        echoed,
        ctx.speaker_name(),
        ctx.scene.display_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CharacterRegistry;

    fn ctx_with(id: Option<&str>, scene: SceneId) -> ReplyContext<'static> {
        let registry = CharacterRegistry::builtin();
        ReplyContext::new(id.and_then(|id| registry.get(id)), scene)
    }

    #[test]
    fn greeting_words_reference_character_or_scene() {
        for input in ["hello", "Hi!", "HEY there", "good morning Leo"] {
            let ctx = ctx_with(Some("leo"), SceneId::NaturePath);
            let reply = toy_reply(input, &ctx);
            assert!(reply.contains("Leo"), "{reply}");
            assert!(reply.contains("Nature Explorers Path"), "{reply}");
        }

        let anonymous = ctx_with(None, SceneId::DiscoveryZone);
        let reply = toy_reply("hello", &anonymous);
        assert!(reply.contains(PLACEHOLDER_NAME));
        assert!(reply.contains("Discovery Zone"));
    }

    #[test]
    fn short_keywords_need_a_whole_word() {
        let ctx = ctx_with(None, SceneId::DiscoveryZone);
        assert_eq!(matching_rule("which one?", &ctx), "echo");
        assert_eq!(matching_rule("hi", &ctx), "greeting");
        assert_eq!(matching_rule("oh, hi.", &ctx), "greeting");
    }

    #[test]
    fn science_idea_only_in_science_corner() {
        let science = ctx_with(Some("ella"), SceneId::ScienceCorner);
        assert!(toy_reply("science", &science).contains(SCIENCE_CORNER_IDEA));

        let garden = ctx_with(Some("ella"), SceneId::MathGarden);
        let reply = toy_reply("science", &garden);
        assert!(!reply.contains(SCIENCE_CORNER_IDEA));
        assert!(reply.contains("\"science\""));
        assert_eq!(matching_rule("science", &garden), "echo");
    }

    #[test]
    fn topic_rules_follow_the_scene() {
        assert_eq!(
            matching_rule("I found a bug", &ctx_with(None, SceneId::NaturePath)),
            "nature-path"
        );
        assert_eq!(
            matching_rule("can we count?", &ctx_with(None, SceneId::MathGarden)),
            "math-garden"
        );
        assert_eq!(
            matching_rule("let's explore", &ctx_with(None, SceneId::DiscoveryZone)),
            "discovery-zone"
        );
    }

    #[test]
    fn first_match_wins() {
        // "hello" and "help" both appear; greeting is higher in the table
        let ctx = ctx_with(Some("pip"), SceneId::NaturePath);
        assert_eq!(matching_rule("hello, help me", &ctx), "greeting");
        assert_eq!(matching_rule("I need a hint", &ctx), "help");
    }

    #[test]
    fn total_and_deterministic() {
        let ctx = ctx_with(Some("gina"), SceneId::MathGarden);
        for input in ["", "   ", "🦒🦒", "zzz", "hello", "a very long sentence ".repeat(20).as_str()] {
            let first = toy_reply(input, &ctx);
            let second = toy_reply(input, &ctx);
            assert!(!first.is_empty());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn echo_restates_text_and_context() {
        let ctx = ctx_with(Some("leo"), SceneId::ScienceCorner);
        let reply = toy_reply("purple dinosaurs", &ctx);
        assert!(reply.contains("\"purple dinosaurs\""));
        assert!(reply.contains("Leo"));
        assert!(reply.contains("Science Corner"));
    }

    #[test]
    fn echo_truncates_long_text() {
        let ctx = ctx_with(None, SceneId::DiscoveryZone);
        let long = "z".repeat(200);
        let reply = toy_reply(&long, &ctx);
        assert!(reply.contains('…'));
        assert!(!reply.contains(&long));
    }

    #[test]
    fn greeting_uses_placeholder_without_character() {
        let reply = greeting(&ctx_with(None, SceneId::DiscoveryZone));
        assert!(reply.contains(PLACEHOLDER_NAME));

        let reply = greeting(&ctx_with(Some("ella"), SceneId::ScienceCorner));
        assert!(reply.contains("Ella"));
        assert!(reply.contains("Science Corner"));
    }

    #[test]
    fn echo_is_last_rule() {
        assert_eq!(rules().last().map(|r| r.name), Some("echo"));
    }
}
