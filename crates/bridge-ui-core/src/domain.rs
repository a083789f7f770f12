use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkOption {
    pub chain_id: u64,
    pub name: &'static str,
    pub internal_index: usize,
}

/// Destination networks offered by the bridge, in display order.
pub const NETWORKS: [NetworkOption; 3] = [
    NetworkOption {
        chain_id: 4,
        name: "Rinkeby Testnet",
        internal_index: 0,
    },
    NetworkOption {
        chain_id: 5,
        name: "Goerli Testnet",
        internal_index: 1,
    },
    NetworkOption {
        chain_id: 42,
        name: "Kovan Testnet",
        internal_index: 2,
    },
];

pub fn network_by_chain_id(chain_id: u64) -> Option<&'static NetworkOption> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

pub fn network_by_index(internal_index: usize) -> Option<&'static NetworkOption> {
    NETWORKS.iter().find(|n| n.internal_index == internal_index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemplateChoice {
    #[default]
    Erc20,
    Erc721,
    Custom,
}

impl TemplateChoice {
    pub const ALL: [TemplateChoice; 3] = [
        TemplateChoice::Erc20,
        TemplateChoice::Erc721,
        TemplateChoice::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TemplateChoice::Erc20 => "ERC20",
            TemplateChoice::Erc721 => "ERC721",
            TemplateChoice::Custom => "Custom",
        }
    }

    pub fn fields(self) -> &'static [TemplateField] {
        match self {
            TemplateChoice::Erc20 => &[TemplateField::Amount, TemplateField::Recipient],
            TemplateChoice::Erc721 => &[TemplateField::TokenId, TemplateField::Recipient],
            TemplateChoice::Custom => &[TemplateField::Data],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateField {
    Amount,
    TokenId,
    Recipient,
    Data,
}

impl TemplateField {
    pub fn label(self) -> &'static str {
        match self {
            TemplateField::Amount => "Amount",
            TemplateField::TokenId => "Token ID",
            TemplateField::Recipient => "Recipient",
            TemplateField::Data => "Data",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            TemplateField::Amount => "0",
            TemplateField::TokenId => "1",
            TemplateField::Recipient => "0x...",
            TemplateField::Data => "0x",
        }
    }
}

/// Raw template inputs. Nothing here is validated; values are read as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateForm {
    pub amount: String,
    pub token_id: String,
    pub recipient: String,
    pub data: String,
}

impl TemplateForm {
    pub fn value(&self, field: TemplateField) -> &str {
        match field {
            TemplateField::Amount => &self.amount,
            TemplateField::TokenId => &self.token_id,
            TemplateField::Recipient => &self.recipient,
            TemplateField::Data => &self.data,
        }
    }

    pub fn value_mut(&mut self, field: TemplateField) -> &mut String {
        match field {
            TemplateField::Amount => &mut self.amount,
            TemplateField::TokenId => &mut self.token_id,
            TemplateField::Recipient => &mut self.recipient,
            TemplateField::Data => &mut self.data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub selected_network: Option<usize>,
    pub selected_template: TemplateChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Live session. `connected()` holds iff both a provider and an address are present.
#[derive(Debug)]
pub struct Session<P> {
    pub provider: Option<P>,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub network_id: Option<u64>,
}

impl<P> Default for Session<P> {
    fn default() -> Self {
        Self {
            provider: None,
            address: None,
            chain_id: None,
            network_id: None,
        }
    }
}

impl<P> Session<P> {
    pub fn connected(&self) -> bool {
        self.provider.is_some() && self.address.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.address.is_none()
            && self.chain_id.is_none()
            && self.network_id.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub status: ConnectionStatus,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub network_id: Option<u64>,
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderEvent {
    Disconnect,
    Close,
    AccountsChanged(Vec<Address>),
    /// Raw payload as delivered by the wallet, decimal or `0x` hex.
    ChainChanged(String),
    NetworkChanged(String),
}

/// Parses a chain or network id as wallets deliver it: `"0x5"`, `"5"`.
pub fn parse_chain_id(raw: &str) -> Result<u64, crate::PortError> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| crate::PortError::Validation(format!("invalid hex chain id: {e}")))
    } else {
        raw.parse()
            .map_err(|e| crate::PortError::Validation(format!("invalid chain id: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_accepts_hex_and_decimal() {
        assert_eq!(parse_chain_id("0x5").expect("hex"), 5);
        assert_eq!(parse_chain_id("0X2a").expect("upper hex"), 42);
        assert_eq!(parse_chain_id("4").expect("decimal"), 4);
        assert!(parse_chain_id("goerli").is_err());
        assert!(parse_chain_id("0x").is_err());
    }

    #[test]
    fn template_field_groups() {
        assert_eq!(
            TemplateChoice::Erc20.fields(),
            &[TemplateField::Amount, TemplateField::Recipient]
        );
        assert_eq!(
            TemplateChoice::Erc721.fields(),
            &[TemplateField::TokenId, TemplateField::Recipient]
        );
        assert_eq!(TemplateChoice::Custom.fields(), &[TemplateField::Data]);
    }

    #[test]
    fn session_connected_requires_provider_and_address() {
        let mut session: Session<()> = Session::default();
        assert!(!session.connected());
        session.provider = Some(());
        assert!(!session.connected());
        session.address = Some(Address::ZERO);
        assert!(session.connected());
    }
}
