use alloy::primitives::Address;
use thiserror::Error;

use crate::domain::ProviderEvent;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("cancelled: {0}")]
    Cancelled(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("policy error: {0}")]
    Policy(String),
}

/// A connected wallet provider (EIP-1193 shaped).
pub trait ProviderPort {
    fn accounts(&self) -> Result<Vec<Address>, PortError>;
    /// Field-like chain id accessor. `Ok(None)` when the provider does not expose one.
    fn chain_id_field(&self) -> Result<Option<u64>, PortError>;
    /// Chain id through a request call (`eth_chainId`).
    fn request_chain_id(&self) -> Result<u64, PortError>;
    /// `net_version`.
    fn network_id(&self) -> Result<u64, PortError>;
    fn subscribe(&self) -> Result<(), PortError>;
    fn remove_all_listeners(&self) -> Result<(), PortError>;
    fn is_closable(&self) -> bool;
    fn close(&self) -> Result<(), PortError>;
    /// Events received since the last drain, oldest first.
    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError>;
}

/// Hands out providers and owns the cached provider-selection preference.
pub trait WalletConnectorPort {
    type Provider: ProviderPort;

    fn connect(&self) -> Result<Self::Provider, PortError>;
    fn cached_provider(&self) -> Result<Option<String>, PortError>;
    fn clear_cached_provider(&self) -> Result<(), PortError>;
}
