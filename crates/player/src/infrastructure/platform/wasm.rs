//! WASM platform implementations
//!
//! Provides platform-specific implementations for the browser using
//! web-sys and gloo. Every provider is a unit struct that looks up
//! `window()` on each call, which keeps them `Send + Sync` for the
//! Dioxus context.

use crate::ports::outbound::platform::{
    LocationProvider, PlatformError, SleepProvider, StorageProvider, TimeProvider,
};
use crate::state::Platform;
use chrono::{DateTime, Utc};
use std::{future::Future, pin::Pin};
use wasm_bindgen::JsValue;

fn window() -> Result<web_sys::Window, PlatformError> {
    web_sys::window().ok_or_else(|| PlatformError::Unavailable("no window".into()))
}

fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Browser time provider (`Date.now()` via chrono's wasmbind)
#[derive(Clone, Default)]
pub struct WasmTimeProvider;

impl TimeProvider for WasmTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Browser sleep provider using gloo timers
#[derive(Clone, Default)]
pub struct WasmSleepProvider;

impl SleepProvider for WasmSleepProvider {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        Box::pin(async move {
            let ms = u32::try_from(ms).unwrap_or(u32::MAX);
            gloo_timers::future::TimeoutFuture::new(ms).await;
        })
    }
}

/// Browser storage provider backed by `window.localStorage`
#[derive(Clone, Default)]
pub struct WasmStorageProvider;

impl WasmStorageProvider {
    fn storage(&self) -> Result<web_sys::Storage, PlatformError> {
        window()?
            .local_storage()
            .map_err(|e| PlatformError::Unavailable(js_error(e)))?
            .ok_or_else(|| PlatformError::Unavailable("localStorage disabled".into()))
    }
}

impl StorageProvider for WasmStorageProvider {
    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| PlatformError::QuotaExceeded(js_error(e)))
    }

    fn load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| PlatformError::Io(js_error(e)))
    }

    fn remove(&self, key: &str) -> Result<(), PlatformError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| PlatformError::Io(js_error(e)))
    }
}

/// Browser location provider (`location.hash` + `history.replaceState`)
#[derive(Clone, Default)]
pub struct WasmLocationProvider;

impl LocationProvider for WasmLocationProvider {
    fn fragment(&self) -> String {
        window()
            .ok()
            .and_then(|w| w.location().hash().ok())
            .map(|hash| hash.trim_start_matches('#').to_string())
            .unwrap_or_default()
    }

    fn replace_fragment(&self, fragment: &str) -> Result<(), PlatformError> {
        let history = window()?
            .history()
            .map_err(|e| PlatformError::Unavailable(js_error(e)))?;
        let url = format!("#{}", fragment.trim_start_matches('#'));
        history
            .replace_state_with_url(&JsValue::NULL, "", Some(&url))
            .map_err(|e| PlatformError::Io(js_error(e)))
    }
}

/// Create platform services for the browser
pub fn create_platform(_initial_fragment: &str) -> Platform {
    Platform::new(
        WasmTimeProvider,
        WasmSleepProvider,
        WasmStorageProvider,
        WasmLocationProvider,
    )
}
