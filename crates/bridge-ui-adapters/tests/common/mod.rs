#![allow(dead_code)]

use alloy::primitives::Address;

use bridge_ui_adapters::{BridgeAdapterConfig, Eip1193Provider, WalletConnector};
use bridge_ui_core::{ConnectionStatus, SessionManager};

pub type TestSession = SessionManager<WalletConnector>;

/// Development profile with provider caching on, independent of the host environment.
pub fn dev_config() -> BridgeAdapterConfig {
    BridgeAdapterConfig {
        cache_provider: true,
        ..BridgeAdapterConfig::from_lookup(|_| None)
    }
}

pub fn new_session() -> TestSession {
    SessionManager::new(WalletConnector::with_config(dev_config()))
}

pub fn connected_session() -> TestSession {
    let mut session = new_session();
    assert_eq!(session.connect(), ConnectionStatus::Connected);
    session
}

/// Handle sharing state with the session's provider.
pub fn provider(session: &TestSession) -> Eip1193Provider {
    session
        .session()
        .provider
        .clone()
        .expect("connected provider")
}

pub fn deterministic_account() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid deterministic account")
}

pub fn second_account() -> Address {
    "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("valid second account")
}
