//! Reply resolver
//!
//! Turns a [`ReplyRequest`] into reply text. The remote endpoint is tried
//! first, raced against a timer; any failure (timeout, transport, status,
//! malformed payload) is logged and answered by the local fallback table
//! instead. Callers always get text back.

use std::sync::Arc;

use futures_util::future::{select, Either};

use explorers_domain::{toy_reply, CharacterRegistry, ReplyContext};

use crate::config::ReplyConfig;
use crate::infrastructure::reply_client::ChatCompletionsClient;
use crate::ports::outbound::{ReplyError, ReplyPort, ReplyRequest};
use crate::state::Platform;

/// Why the local fallback answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No remote endpoint is configured
    NotConfigured,
    /// The remote attempt failed
    Remote(ReplyError),
    /// The task resolving this reply ended before producing one
    Abandoned,
}

/// Which path produced a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    Fallback(FallbackReason),
}

/// A resolved reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyOutcome {
    pub text: String,
    pub source: ReplySource,
}

impl ReplyOutcome {
    pub fn is_remote(&self) -> bool {
        self.source == ReplySource::Remote
    }
}

#[derive(Clone)]
pub struct ReplyResolver {
    remote: Option<Arc<dyn ReplyPort>>,
    platform: Platform,
    config: ReplyConfig,
    registry: CharacterRegistry,
}

impl ReplyResolver {
    /// Resolver that always answers locally
    pub fn local(platform: Platform, config: ReplyConfig) -> Self {
        Self {
            remote: None,
            platform,
            config,
            registry: CharacterRegistry::builtin(),
        }
    }

    /// Resolver wired to the configured chat-completions endpoint, if any
    pub fn from_config(platform: Platform, config: ReplyConfig) -> Self {
        let remote = build_client(&config);
        Self {
            remote,
            ..Self::local(platform, config)
        }
    }

    /// Replace the remote port
    pub fn with_remote(mut self, remote: Arc<dyn ReplyPort>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Swap the bearer key at runtime. Rebuilds the client for the configured
    /// endpoint; without an endpoint this only records the key.
    pub fn set_api_key(&mut self, api_key: Option<&str>) {
        self.config.api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        if self.config.is_configured() {
            self.remote = build_client(&self.config);
            tracing::info!(
                has_key = self.config.api_key.is_some(),
                "Reply client rebuilt with new API key"
            );
        }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub fn config(&self) -> &ReplyConfig {
        &self.config
    }

    /// Resolve one reply. Never fails; without a remote port the future
    /// completes on its first poll.
    pub async fn resolve(&self, request: ReplyRequest) -> ReplyOutcome {
        let Some(remote) = self.remote.clone() else {
            tracing::debug!(scene = %request.scene, "No reply endpoint configured, answering locally");
            return self.fallback(&request, FallbackReason::NotConfigured);
        };

        match self.attempt_remote(remote.as_ref(), request.clone()).await {
            Ok(text) => ReplyOutcome {
                text,
                source: ReplySource::Remote,
            },
            Err(e) => {
                tracing::warn!(error = %e, scene = %request.scene, "Remote reply failed, using local fallback");
                self.fallback(&request, FallbackReason::Remote(e))
            }
        }
    }

    async fn attempt_remote(
        &self,
        remote: &dyn ReplyPort,
        request: ReplyRequest,
    ) -> Result<String, ReplyError> {
        let timeout_ms = self.config.timeout_ms;
        let call = remote.reply(request);
        let timer = self.platform.sleep_ms(timeout_ms);

        // Losing the race drops the call future, which aborts the request.
        match select(call, timer).await {
            Either::Left((result, _)) => {
                let text = result?;
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ReplyError::Malformed("empty reply".to_string()));
                }
                Ok(trimmed.to_string())
            }
            Either::Right(((), _)) => Err(ReplyError::Timeout(timeout_ms)),
        }
    }

    fn fallback(&self, request: &ReplyRequest, reason: FallbackReason) -> ReplyOutcome {
        local_outcome(request, &self.registry, reason)
    }
}

/// Answer `request` from the local fallback table
pub fn local_outcome(
    request: &ReplyRequest,
    registry: &CharacterRegistry,
    reason: FallbackReason,
) -> ReplyOutcome {
    let character = request
        .character
        .as_ref()
        .and_then(|id| registry.get(id.as_str()));
    let ctx = ReplyContext::new(character, request.scene);

    ReplyOutcome {
        text: toy_reply(&request.user_text, &ctx),
        source: ReplySource::Fallback(reason),
    }
}

fn build_client(config: &ReplyConfig) -> Option<Arc<dyn ReplyPort>> {
    let endpoint = config.endpoint.as_deref()?;
    let client =
        ChatCompletionsClient::new(endpoint, &config.model).with_api_key(config.api_key.as_deref());
    Some(Arc::new(client))
}
