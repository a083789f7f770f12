//! Cached provider-selection preference.
//!
//! Browser builds persist it in `localStorage`. Native builds keep it in memory;
//! the app seeds it from, and writes it back to, eframe storage.

#[cfg(not(target_arch = "wasm32"))]
use std::sync::{Arc, Mutex};

use bridge_ui_core::PortError;

#[derive(Debug, Clone)]
pub struct ProviderPreferenceStore {
    key: String,
    #[cfg(not(target_arch = "wasm32"))]
    memory: Arc<Mutex<Option<String>>>,
}

impl ProviderPreferenceStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            #[cfg(not(target_arch = "wasm32"))]
            memory: Arc::new(Mutex::new(None)),
        }
    }

    /// Store seeded with a preference persisted by a previous run.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_value(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            memory: Arc::new(Mutex::new(value)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(&self) -> Result<Option<String>, PortError> {
        let g = self
            .memory
            .lock()
            .map_err(|e| PortError::Transport(format!("preference lock poisoned: {e}")))?;
        Ok(g.clone())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, provider: &str) -> Result<(), PortError> {
        let mut g = self
            .memory
            .lock()
            .map_err(|e| PortError::Transport(format!("preference lock poisoned: {e}")))?;
        *g = Some(provider.to_owned());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear(&self) -> Result<(), PortError> {
        let mut g = self
            .memory
            .lock()
            .map_err(|e| PortError::Transport(format!("preference lock poisoned: {e}")))?;
        *g = None;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load(&self) -> Result<Option<String>, PortError> {
        local_storage()?
            .get_item(&self.key)
            .map_err(|e| PortError::Transport(format!("localStorage read failed: {e:?}")))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, provider: &str) -> Result<(), PortError> {
        local_storage()?
            .set_item(&self.key, provider)
            .map_err(|e| PortError::Transport(format!("localStorage write failed: {e:?}")))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn clear(&self) -> Result<(), PortError> {
        local_storage()?
            .remove_item(&self.key)
            .map_err(|e| PortError::Transport(format!("localStorage remove failed: {e:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, PortError> {
    web_sys::window()
        .ok_or_else(|| PortError::Transport("missing window".to_owned()))?
        .local_storage()
        .map_err(|e| PortError::Transport(format!("localStorage unavailable: {e:?}")))?
        .ok_or_else(|| PortError::NotFound("localStorage disabled".to_owned()))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::ProviderPreferenceStore;

    #[test]
    fn clones_share_the_preference() {
        let store = ProviderPreferenceStore::new("test-key");
        let other = store.clone();
        store.save("proxy").expect("save");
        assert_eq!(other.load().expect("load").as_deref(), Some("proxy"));
        other.clear().expect("clear");
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn seeded_store_reads_back_the_saved_value() {
        let store = ProviderPreferenceStore::with_value("test-key", Some("proxy".to_owned()));
        assert_eq!(store.load().expect("load").as_deref(), Some("proxy"));
    }
}
