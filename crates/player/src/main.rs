//! Little Explorers player - composition root binary.

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use explorers_player::AppConfig;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "explorers_player=debug,dioxus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    tracing::info!("Starting Little Explorers");

    #[allow(unused_mut)]
    let mut config = AppConfig::from_env();

    // Narrow browser windows get the mobile layout regardless of configuration
    #[cfg(target_arch = "wasm32")]
    {
        let width = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(1024.0);

        if width < 768.0 {
            config.shell = explorers_player::ShellKind::Mobile;
        }
    }

    tracing::info!(
        remote_replies = config.reply.is_configured(),
        history_cap = config.history_cap,
        shell = ?config.shell,
        "Configuration loaded"
    );

    // Platform. On desktop the first argument seeds the fragment
    // (`explorers-player '#scene=math-garden'`).
    let initial_fragment = std::env::args().nth(1).unwrap_or_default();
    let platform = explorers_player::infrastructure::platform::create_platform(&initial_fragment);

    // Launch Dioxus
    #[allow(unused_mut)]
    let mut builder = dioxus::LaunchBuilder::new();

    #[cfg(not(target_arch = "wasm32"))]
    {
        let head = format!("<style>{}</style>", PLAYER_CSS);
        let cfg = dioxus_desktop::Config::new()
            .with_custom_head(head)
            .with_window(dioxus_desktop::WindowBuilder::new().with_title("Little Explorers"));
        builder = builder.with_cfg(cfg);
    }

    builder
        .with_context(platform)
        .with_context(config)
        .launch(explorers_player::app);
}

#[cfg(not(target_arch = "wasm32"))]
const PLAYER_CSS: &str = include_str!("../assets/css/explorers.css");
