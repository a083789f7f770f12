//! View-side state that is not owned by the core crate

use alloy::primitives::Address;
use bridge_ui_core::ConnectionStatus;

/// Build metadata embedded by `build.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub git_hash: &'static str,
    pub build_time: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            git_hash: env!("GIT_HASH"),
            build_time: env!("BUILD_TIME"),
        }
    }

    pub fn short_hash(&self) -> &str {
        self.git_hash.get(..8).unwrap_or(self.git_hash)
    }

    pub fn footer_text(&self) -> String {
        format!(
            "v{} · {} · built {}",
            env!("CARGO_PKG_VERSION"),
            self.short_hash(),
            self.build_time
        )
    }
}

/// Checksummed address shortened to `0x1234…abcd`.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

/// Etherscan address page for the chains the bridge knows about.
pub fn explorer_address_url(chain_id: u64, address: &Address) -> Option<String> {
    let base = match chain_id {
        1 => "https://etherscan.io",
        4 => "https://rinkeby.etherscan.io",
        5 => "https://goerli.etherscan.io",
        42 => "https://kovan.etherscan.io",
        _ => return None,
    };
    Some(format!("{}/address/{}", base, address.to_checksum(None)))
}

pub fn status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Disconnected => "Disconnected",
        ConnectionStatus::Connecting => "Connecting…",
        ConnectionStatus::Connected => "Connected",
    }
}

/// Header interaction for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderAction {
    #[default]
    None,
    Connect,
    Disconnect,
}
