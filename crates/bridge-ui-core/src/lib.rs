pub mod domain;
pub mod ports;
pub mod selection;
pub mod session;
pub mod state_machine;

pub use domain::{
    network_by_chain_id, network_by_index, parse_chain_id, ConnectionStatus, NetworkOption,
    ProviderEvent, SelectionState, Session, SessionSnapshot, TemplateChoice, TemplateField,
    TemplateForm, NETWORKS,
};
pub use ports::{PortError, ProviderPort, WalletConnectorPort};
pub use selection::{derive_network_list, network_label, SelectionView};
pub use session::{probe_chain_id, ConnectTicket, SessionManager};
pub use state_machine::{connection_transition, ConnectionAction, StateTransition, TransitionError};
