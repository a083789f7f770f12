use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use bridge_ui_core::{PortError, WalletConnectorPort};

use crate::eip1193::{Eip1193Provider, ProviderMode};
use crate::{BridgeAdapterConfig, ProviderPreferenceStore};

/// Picks the provider runtime for this build and hands out connected providers.
#[derive(Debug, Clone)]
pub struct WalletConnector {
    config: BridgeAdapterConfig,
    preference: ProviderPreferenceStore,
    cancel_next: Arc<Mutex<bool>>,
}

impl Default for WalletConnector {
    fn default() -> Self {
        Self::with_config(BridgeAdapterConfig::from_env())
    }
}

impl WalletConnector {
    pub fn with_config(config: BridgeAdapterConfig) -> Self {
        let preference = ProviderPreferenceStore::new(config.cached_provider_storage_key.clone());
        Self::with_preference(config, preference)
    }

    pub fn with_preference(config: BridgeAdapterConfig, preference: ProviderPreferenceStore) -> Self {
        Self {
            config,
            preference,
            cancel_next: Arc::new(Mutex::new(false)),
        }
    }

    pub fn config(&self) -> &BridgeAdapterConfig {
        &self.config
    }

    pub fn preference(&self) -> &ProviderPreferenceStore {
        &self.preference
    }

    /// Makes the next connect behave as if the user dismissed the wallet prompt.
    pub fn debug_cancel_next_connect(&self) -> Result<(), PortError> {
        *self
            .cancel_next
            .lock()
            .map_err(|e| PortError::Transport(format!("connector lock poisoned: {e}")))? = true;
        Ok(())
    }

    fn take_cancel(&self) -> Result<(), PortError> {
        let mut g = self
            .cancel_next
            .lock()
            .map_err(|e| PortError::Transport(format!("connector lock poisoned: {e}")))?;
        if std::mem::take(&mut *g) {
            return Err(PortError::Cancelled("wallet prompt dismissed".to_owned()));
        }
        Ok(())
    }

    fn resolve_mode(&self) -> Result<ProviderMode, PortError> {
        #[cfg(target_arch = "wasm32")]
        let mode = if crate::eip1193::browser_provider_available() {
            ProviderMode::Browser
        } else if self.config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 browser provider not found in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref base_url) = self.config.eip1193_proxy_url {
            match crate::eip1193::ProxyRuntime::new(base_url, &self.config) {
                Ok(proxy) => ProviderMode::Proxy(proxy),
                Err(e) if self.config.strict_runtime_required() => ProviderMode::Disabled(
                    format!("failed to initialize EIP-1193 proxy client in production profile: {e}"),
                ),
                Err(e) => {
                    warn!(error = %e, "falling back to deterministic provider");
                    ProviderMode::Deterministic
                }
            }
        } else if self.config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        if let ProviderMode::Disabled(reason) = &mode {
            return Err(PortError::Policy(reason.clone()));
        }
        debug!(mode = mode.name(), "provider runtime resolved");
        Ok(mode)
    }

    fn remember(&self, provider: &Eip1193Provider) {
        if !self.config.cache_provider {
            return;
        }
        if let Err(e) = self.preference.save(provider.kind()) {
            warn!(error = %e, "failed to cache provider preference");
        }
    }

    /// Browser connect: prompts the injected wallet and prefetches the
    /// answers the synchronous port methods read back.
    #[cfg(target_arch = "wasm32")]
    pub async fn connect_async(&self) -> Result<Eip1193Provider, PortError> {
        self.take_cancel()?;
        let provider = Eip1193Provider::with_mode(self.resolve_mode()?);
        if matches!(provider.mode(), ProviderMode::Browser) {
            provider.wasm_request_accounts_async().await?;
            if let Err(e) = provider.wasm_chain_id_async().await {
                debug!(error = %e, "eth_chainId unavailable; relying on chainId field");
            }
            if let Err(e) = provider.wasm_network_id_async().await {
                debug!(error = %e, "net_version unavailable");
            }
        }
        info!(provider = provider.kind(), "wallet provider selected");
        self.remember(&provider);
        Ok(provider)
    }
}

impl WalletConnectorPort for WalletConnector {
    type Provider = Eip1193Provider;

    fn connect(&self) -> Result<Eip1193Provider, PortError> {
        self.take_cancel()?;
        let provider = Eip1193Provider::with_mode(self.resolve_mode()?);

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(provider.mode(), ProviderMode::Proxy(_)) {
            provider.proxy_handshake()?;
        }

        info!(provider = provider.kind(), "wallet provider selected");
        self.remember(&provider);
        Ok(provider)
    }

    fn cached_provider(&self) -> Result<Option<String>, PortError> {
        if !self.config.cache_provider {
            return Ok(None);
        }
        self.preference.load()
    }

    fn clear_cached_provider(&self) -> Result<(), PortError> {
        self.preference.clear()
    }
}
