//! Bridge between the egui shell and the wallet session.
//! The connector call runs off the frame loop; its result lands in a slot
//! that [`SessionBridge::poll`] hands to the session manager.

use std::sync::{Arc, Mutex};

use eframe::egui;
use tracing::{info, warn};

#[cfg(not(target_arch = "wasm32"))]
use bridge_ui_adapters::ProviderPreferenceStore;
use bridge_ui_adapters::{BridgeAdapterConfig, Eip1193Provider, WalletConnector};
#[cfg(not(target_arch = "wasm32"))]
use bridge_ui_core::WalletConnectorPort;
use bridge_ui_core::{ConnectTicket, ConnectionStatus, PortError, SessionManager, SessionSnapshot};

type ConnectResult = (ConnectTicket, Result<Eip1193Provider, PortError>);

pub struct SessionBridge {
    manager: SessionManager<WalletConnector>,
    pending: Arc<Mutex<Option<ConnectResult>>>,
}

impl SessionBridge {
    /// Natively the cached provider choice lives in eframe storage between
    /// runs; the browser store reads `localStorage` itself.
    pub fn restored(config: BridgeAdapterConfig, storage: Option<&dyn eframe::Storage>) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let connector = {
            let key = config.cached_provider_storage_key.clone();
            let saved = storage
                .and_then(|s| s.get_string(&key))
                .filter(|v| !v.is_empty());
            WalletConnector::with_preference(config, ProviderPreferenceStore::with_value(key, saved))
        };
        #[cfg(target_arch = "wasm32")]
        let connector = {
            let _ = storage;
            WalletConnector::with_config(config)
        };
        Self::with_connector(connector)
    }

    /// Writes the native provider preference back to eframe storage.
    pub fn persist(&self, storage: &mut dyn eframe::Storage) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let preference = self.manager.connector().preference();
            match preference.load() {
                Ok(saved) => storage.set_string(preference.key(), saved.unwrap_or_default()),
                Err(e) => warn!(error = %e, "failed to persist provider preference"),
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = storage;
    }

    pub fn with_connector(connector: WalletConnector) -> Self {
        Self {
            manager: SessionManager::new(connector),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.manager.snapshot()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.manager.status()
    }

    /// Starts a connect attempt unless one is running or a session exists.
    pub fn connect(&mut self, ctx: &egui::Context) {
        let Some(ticket) = self.manager.begin_connect() else {
            return;
        };
        let connector = self.manager.connector().clone();
        let slot = Arc::clone(&self.pending);
        let ctx = ctx.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = connector.connect_async().await;
                deliver(&slot, ticket, result);
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = connector.connect();
                deliver(&slot, ticket, result);
                ctx.request_repaint();
            });
        }
    }

    /// Reconnects on start-up when a provider choice was cached.
    pub fn restore_cached(&mut self, ctx: &egui::Context) -> bool {
        let Some(name) = self.manager.cached_provider() else {
            return false;
        };
        info!(provider = %name, "restoring cached wallet provider");
        self.connect(ctx);
        true
    }

    /// User-initiated disconnect; forgets the cached provider.
    pub fn disconnect(&mut self) {
        self.manager.disconnect(true);
    }

    pub fn teardown(&mut self) {
        self.manager.teardown();
    }

    /// Applies a finished connect attempt and queued provider events.
    /// Returns whether the session changed.
    pub fn poll(&mut self) -> bool {
        let before = self.manager.revision();
        let status = self.manager.status();

        let finished = match self.pending.lock() {
            Ok(mut g) => g.take(),
            Err(e) => {
                warn!(error = %e, "connect slot poisoned");
                None
            }
        };
        if let Some((ticket, result)) = finished {
            self.manager.complete_connect(ticket, result);
        }

        self.manager.pump_events();
        self.manager.revision() != before || self.manager.status() != status
    }
}

fn deliver(
    slot: &Arc<Mutex<Option<ConnectResult>>>,
    ticket: ConnectTicket,
    result: Result<Eip1193Provider, PortError>,
) {
    match slot.lock() {
        Ok(mut g) => *g = Some((ticket, result)),
        Err(e) => warn!(error = %e, "connect slot poisoned; result dropped"),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::time::{Duration, Instant};

    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct MemoryStorage(HashMap<String, String>);

    impl eframe::Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.0.insert(key.to_owned(), value);
        }

        fn flush(&mut self) {}
    }

    fn config(cache_provider: bool) -> BridgeAdapterConfig {
        BridgeAdapterConfig {
            cache_provider,
            ..BridgeAdapterConfig::from_lookup(|_| None)
        }
    }

    fn bridge(cache_provider: bool) -> SessionBridge {
        SessionBridge::with_connector(WalletConnector::with_config(config(cache_provider)))
    }

    fn poll_until_settled(bridge: &mut SessionBridge) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while bridge.status() == ConnectionStatus::Connecting && Instant::now() < deadline {
            bridge.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn background_connect_completes_on_poll() {
        let ctx = egui::Context::default();
        let mut bridge = bridge(false);
        bridge.connect(&ctx);
        assert_eq!(bridge.status(), ConnectionStatus::Connecting);

        poll_until_settled(&mut bridge);
        let snap = bridge.snapshot();
        assert_eq!(snap.status, ConnectionStatus::Connected);
        assert_eq!(snap.chain_id, Some(5));
    }

    #[test]
    fn second_connect_while_connecting_is_ignored() {
        let ctx = egui::Context::default();
        let mut bridge = bridge(false);
        bridge.connect(&ctx);
        bridge.connect(&ctx);
        poll_until_settled(&mut bridge);
        assert_eq!(bridge.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn teardown_during_connect_drops_the_late_result() {
        let ctx = egui::Context::default();
        let mut bridge = bridge(false);
        bridge.connect(&ctx);
        bridge.teardown();
        std::thread::sleep(Duration::from_millis(50));
        bridge.poll();
        assert_eq!(bridge.status(), ConnectionStatus::Disconnected);
        assert!(bridge.snapshot().address.is_none());
    }

    #[test]
    fn restore_requires_a_cached_choice() {
        let ctx = egui::Context::default();
        let mut bridge = bridge(true);
        assert!(!bridge.restore_cached(&ctx));

        bridge.connect(&ctx);
        poll_until_settled(&mut bridge);
        bridge.teardown();
        assert!(bridge.restore_cached(&ctx));
        poll_until_settled(&mut bridge);
        assert_eq!(bridge.status(), ConnectionStatus::Connected);

        bridge.disconnect();
        assert!(!bridge.restore_cached(&ctx));
    }

    #[test]
    fn cached_choice_survives_a_restart_through_eframe_storage() {
        let ctx = egui::Context::default();
        let mut storage = MemoryStorage::default();

        let mut first_run = SessionBridge::restored(config(true), None);
        first_run.connect(&ctx);
        poll_until_settled(&mut first_run);
        first_run.teardown();
        first_run.persist(&mut storage);

        let mut second_run =
            SessionBridge::restored(config(true), Some(&storage as &dyn eframe::Storage));
        assert!(second_run.restore_cached(&ctx));
        poll_until_settled(&mut second_run);
        assert_eq!(second_run.status(), ConnectionStatus::Connected);

        second_run.disconnect();
        second_run.persist(&mut storage);
        let mut third_run =
            SessionBridge::restored(config(true), Some(&storage as &dyn eframe::Storage));
        assert!(!third_run.restore_cached(&ctx));
    }
}
