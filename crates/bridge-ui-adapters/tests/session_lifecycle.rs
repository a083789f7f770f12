mod common;

use bridge_ui_adapters::{
    BridgeAdapterConfig, ProviderPreferenceStore, RuntimeProfile, WalletConnector,
};
use bridge_ui_core::{ConnectionStatus, SessionManager, WalletConnectorPort};

use common::{connected_session, deterministic_account, dev_config, new_session, provider};

#[test]
fn connect_populates_session_from_deterministic_provider() {
    let session = connected_session();
    let snap = session.snapshot();
    assert_eq!(snap.status, ConnectionStatus::Connected);
    assert_eq!(snap.address, Some(deterministic_account()));
    assert_eq!(snap.chain_id, Some(5));
    assert_eq!(snap.network_id, Some(5));
    assert!(session.session().connected());
    assert!(provider(&session).is_listening());
}

#[test]
fn disconnect_without_clearing_keeps_cached_preference() {
    let mut session = connected_session();
    let handle = provider(&session);
    assert_eq!(
        session.connector().cached_provider().expect("cached"),
        Some("deterministic".to_owned())
    );

    session.disconnect(false);
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
    assert!(session.session().is_empty());
    assert!(handle.is_closed());
    assert!(!handle.is_listening());
    assert_eq!(
        session.connector().cached_provider().expect("cached"),
        Some("deterministic".to_owned())
    );
}

#[test]
fn disconnect_with_clearing_drops_cached_preference() {
    let mut session = connected_session();
    session.disconnect(true);
    assert!(session.session().is_empty());
    assert_eq!(session.connector().cached_provider().expect("cached"), None);
}

#[test]
fn disconnect_is_safe_when_never_connected_or_repeated() {
    let mut session = new_session();
    session.disconnect(false);
    session.disconnect(true);
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
    assert_eq!(session.revision(), 0);

    assert_eq!(session.connect(), ConnectionStatus::Connected);
    session.disconnect(false);
    let revision = session.revision();
    session.disconnect(false);
    assert_eq!(session.revision(), revision);
}

#[test]
fn cancelled_connect_stays_disconnected() {
    let mut session = new_session();
    session
        .connector()
        .debug_cancel_next_connect()
        .expect("arm cancel");
    assert_eq!(session.connect(), ConnectionStatus::Disconnected);
    assert!(session.session().is_empty());
    assert_eq!(session.connector().cached_provider().expect("cached"), None);

    assert_eq!(session.connect(), ConnectionStatus::Connected);
}

#[test]
fn production_profile_without_provider_fails_silently() {
    let cfg = BridgeAdapterConfig {
        runtime_profile: RuntimeProfile::Production,
        eip1193_proxy_url: None,
        ..dev_config()
    };
    let mut session = SessionManager::new(WalletConnector::with_config(cfg));
    assert_eq!(session.connect(), ConnectionStatus::Disconnected);
    assert!(session.session().is_empty());
}

#[test]
fn teardown_keeps_preference_for_silent_reconnect() {
    let mut session = connected_session();
    let connector = session.connector().clone();
    session.teardown();
    assert_eq!(session.status(), ConnectionStatus::Disconnected);

    let mut next_load = SessionManager::new(connector);
    assert!(next_load.restore_cached());
    assert_eq!(next_load.status(), ConnectionStatus::Connected);
}

#[test]
fn cleared_preference_prevents_silent_reconnect() {
    let mut session = connected_session();
    let connector = session.connector().clone();
    session.disconnect(true);

    let mut next_load = SessionManager::new(connector);
    assert!(!next_load.restore_cached());
    assert_eq!(next_load.status(), ConnectionStatus::Disconnected);
}

#[test]
fn restore_is_skipped_when_caching_is_off() {
    let cfg = BridgeAdapterConfig {
        cache_provider: false,
        ..dev_config()
    };
    let connector = WalletConnector::with_config(cfg);
    let mut session = SessionManager::new(connector.clone());
    session.connect();
    session.teardown();

    let mut next_load = SessionManager::new(connector);
    assert!(!next_load.restore_cached());
}

#[test]
fn fresh_connector_restores_from_persisted_preference() {
    let mut session = connected_session();
    let saved = session
        .connector()
        .preference()
        .load()
        .expect("load preference");
    let key = session.connector().preference().key().to_owned();
    session.teardown();

    let store = ProviderPreferenceStore::with_value(key, saved);
    let mut next_run = SessionManager::new(WalletConnector::with_preference(dev_config(), store));
    assert!(next_run.restore_cached());
    assert_eq!(next_run.status(), ConnectionStatus::Connected);
}
