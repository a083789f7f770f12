pub mod config;
pub mod connector;
pub mod eip1193;
pub mod storage;

pub use config::{BridgeAdapterConfig, ConfigError, RuntimeProfile};
pub use connector::WalletConnector;
pub use eip1193::Eip1193Provider;
pub use storage::ProviderPreferenceStore;
