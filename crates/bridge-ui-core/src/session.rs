//! Wallet session lifecycle.
//!
//! The manager is the single owner of the connected provider. Provider
//! callbacks never touch it directly: they append to the provider's event
//! queue, and [`SessionManager::pump_events`] applies the queue in arrival
//! order from the UI loop.

use tracing::{debug, info, warn};

use crate::domain::{
    parse_chain_id, ConnectionStatus, ProviderEvent, Session, SessionSnapshot,
};
use crate::ports::{PortError, ProviderPort, WalletConnectorPort};
use crate::state_machine::{connection_transition, ConnectionAction};

/// Identifies one connect attempt; results for an older attempt are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectTicket(u64);

pub struct SessionManager<C: WalletConnectorPort> {
    connector: C,
    status: ConnectionStatus,
    session: Session<C::Provider>,
    revision: u64,
    attempt: u64,
}

impl<C: WalletConnectorPort> SessionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            status: ConnectionStatus::Disconnected,
            session: Session::default(),
            revision: 0,
            attempt: 0,
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn session(&self) -> &Session<C::Provider> {
        &self.session
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            address: self.session.address,
            chain_id: self.session.chain_id,
            network_id: self.session.network_id,
            revision: self.revision,
        }
    }

    /// Connects through the connector in one step.
    pub fn connect(&mut self) -> ConnectionStatus {
        let Some(ticket) = self.begin_connect() else {
            return self.status;
        };
        let result = self.connector.connect();
        self.complete_connect(ticket, result)
    }

    /// The connector's cached provider preference. Read failures count as none.
    pub fn cached_provider(&self) -> Option<String> {
        match self.connector.cached_provider() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "failed to read cached provider preference");
                None
            }
        }
    }

    /// Silently reconnects when a provider preference is cached.
    pub fn restore_cached(&mut self) -> bool {
        let Some(name) = self.cached_provider() else {
            return false;
        };
        info!(provider = %name, "restoring cached wallet provider");
        self.connect() == ConnectionStatus::Connected
    }

    /// First half of [`connect`](Self::connect) for callers that drive the
    /// connector call themselves. `None` unless currently disconnected.
    pub fn begin_connect(&mut self) -> Option<ConnectTicket> {
        if let Err(e) = self.transition(ConnectionAction::Connect) {
            debug!(error = %e, "connect ignored");
            return None;
        }
        self.attempt = self.attempt.wrapping_add(1);
        Some(ConnectTicket(self.attempt))
    }

    pub fn complete_connect(
        &mut self,
        ticket: ConnectTicket,
        result: Result<C::Provider, PortError>,
    ) -> ConnectionStatus {
        if self.status != ConnectionStatus::Connecting || ticket.0 != self.attempt {
            debug!(?ticket, "dropping stale connect result");
            if let Ok(provider) = result {
                release(&provider);
            }
            return self.status;
        }

        let provider = match result {
            Ok(provider) => provider,
            Err(e) => {
                warn!(error = %e, "wallet connect failed");
                self.fail_connect();
                return self.status;
            }
        };

        match attach(&provider) {
            Ok(identity) => {
                self.session = Session {
                    provider: Some(provider),
                    address: Some(identity.address),
                    chain_id: Some(identity.chain_id),
                    network_id: Some(identity.network_id),
                };
                self.must_transition(ConnectionAction::Succeed);
                info!(
                    address = %identity.address,
                    chain_id = identity.chain_id,
                    "wallet connected"
                );
            }
            Err(e) => {
                warn!(error = %e, "wallet provider rejected session setup");
                release(&provider);
                self.fail_connect();
            }
        }
        self.status
    }

    /// Tears the session down. A no-op when nothing is connected.
    pub fn disconnect(&mut self, clear_cache: bool) {
        self.end_session(ConnectionAction::Disconnect, clear_cache);
    }

    /// Component teardown: keeps the cached preference so the next load can
    /// reconnect silently.
    pub fn teardown(&mut self) {
        match self.status {
            ConnectionStatus::Connected => self.end_session(ConnectionAction::Teardown, false),
            ConnectionStatus::Connecting => {
                self.must_transition(ConnectionAction::Teardown);
                self.bump();
            }
            ConnectionStatus::Disconnected => {}
        }
    }

    /// Applies queued provider events in arrival order. Returns whether the
    /// session changed.
    pub fn pump_events(&mut self) -> bool {
        let before = self.revision;
        let events = match self.session.provider.as_ref().map(ProviderPort::drain_events) {
            None => return false,
            Some(Ok(events)) => events,
            Some(Err(e)) => {
                warn!(error = %e, "failed to drain provider events");
                return false;
            }
        };

        for event in events {
            if self.session.provider.is_none() {
                debug!(?event, "dropping event queued before disconnect");
                continue;
            }
            self.handle_event(event);
        }
        self.revision != before
    }

    fn handle_event(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::Disconnect | ProviderEvent::Close => {
                info!(?event, "provider closed the session");
                self.end_session(ConnectionAction::ProviderClosed, false);
            }
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None => {
                    info!("provider reported no accounts; disconnecting");
                    self.end_session(ConnectionAction::ProviderClosed, false);
                }
                Some(address) if self.session.address == Some(*address) => {
                    debug!(%address, "redundant accountsChanged");
                }
                Some(address) => {
                    info!(%address, "account changed");
                    self.session.address = Some(*address);
                    self.bump();
                }
            },
            ProviderEvent::ChainChanged(raw) => match parse_chain_id(&raw) {
                Ok(chain_id) => self.update_chain_id(chain_id),
                Err(e) => warn!(error = %e, payload = %raw, "ignoring chainChanged"),
            },
            ProviderEvent::NetworkChanged(raw) => match parse_chain_id(&raw) {
                Ok(network_id) => self.update_network_id(network_id),
                Err(e) => warn!(error = %e, payload = %raw, "ignoring networkChanged"),
            },
        }
    }

    fn update_chain_id(&mut self, chain_id: u64) {
        if self.session.chain_id == Some(chain_id) {
            debug!(chain_id, "redundant chainChanged");
            return;
        }
        let network_id = self
            .session
            .provider
            .as_ref()
            .and_then(|p| p.network_id().ok())
            .unwrap_or(chain_id);
        info!(chain_id, network_id, "chain changed");
        self.session.chain_id = Some(chain_id);
        self.session.network_id = Some(network_id);
        self.bump();
    }

    fn update_network_id(&mut self, network_id: u64) {
        if self.session.network_id == Some(network_id) {
            debug!(network_id, "redundant networkChanged");
            return;
        }
        let chain_id = match self.session.provider.as_ref().map(probe_chain_id) {
            Some(Ok(chain_id)) => chain_id,
            Some(Err(e)) => {
                warn!(error = %e, "chain id unavailable after networkChanged");
                self.session.chain_id.unwrap_or(network_id)
            }
            None => return,
        };
        info!(chain_id, network_id, "network changed");
        self.session.network_id = Some(network_id);
        self.session.chain_id = Some(chain_id);
        self.bump();
    }

    fn end_session(&mut self, action: ConnectionAction, clear_cache: bool) {
        let Some(provider) = self.session.provider.take() else {
            debug!(?action, "no provider connected; nothing to disconnect");
            return;
        };
        release(&provider);
        if clear_cache {
            if let Err(e) = self.connector.clear_cached_provider() {
                warn!(error = %e, "failed to clear cached provider");
            }
        }
        self.session = Session::default();
        self.must_transition(action);
        info!(?action, clear_cache, "wallet disconnected");
    }

    fn fail_connect(&mut self) {
        self.must_transition(ConnectionAction::Fail);
    }

    fn transition(&mut self, action: ConnectionAction) -> Result<(), crate::TransitionError> {
        let t = connection_transition(self.status, action)?;
        debug!(from = ?t.from, to = ?t.to, reason = t.reason, "connection transition");
        self.status = t.to;
        self.bump();
        Ok(())
    }

    // Callers only reach these actions from states the table accepts.
    fn must_transition(&mut self, action: ConnectionAction) {
        if let Err(e) = self.transition(action) {
            warn!(error = %e, "forcing disconnected state");
            self.status = ConnectionStatus::Disconnected;
            self.bump();
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

struct Identity {
    address: alloy::primitives::Address,
    chain_id: u64,
    network_id: u64,
}

fn attach<P: ProviderPort>(provider: &P) -> Result<Identity, PortError> {
    provider.subscribe()?;
    let address = provider
        .accounts()?
        .first()
        .copied()
        .ok_or_else(|| PortError::NotFound("provider returned no accounts".to_owned()))?;
    let chain_id = probe_chain_id(provider)?;
    let network_id = match provider.network_id() {
        Ok(id) => id,
        Err(e) => {
            debug!(error = %e, "net_version unavailable; using chain id");
            chain_id
        }
    };
    Ok(Identity {
        address,
        chain_id,
        network_id,
    })
}

/// Reads the chain id from the field accessor, falling back to the request call.
pub fn probe_chain_id<P: ProviderPort>(provider: &P) -> Result<u64, PortError> {
    match provider.chain_id_field() {
        Ok(Some(chain_id)) => return Ok(chain_id),
        Ok(None) => {}
        Err(e) => debug!(error = %e, "chain id field unreadable"),
    }
    provider.request_chain_id()
}

fn release<P: ProviderPort>(provider: &P) {
    if let Err(e) = provider.remove_all_listeners() {
        warn!(error = %e, "failed to remove provider listeners");
    }
    if provider.is_closable() {
        if let Err(e) = provider.close() {
            warn!(error = %e, "failed to close provider transport");
        }
    }
}
