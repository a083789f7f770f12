use thiserror::Error;

use crate::domain::ConnectionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAction {
    Connect,
    Succeed,
    Fail,
    Disconnect,
    ProviderClosed,
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ConnectionStatus,
    pub to: ConnectionStatus,
    pub reason: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal connection transition: {from:?} --{action:?}-->")]
pub struct TransitionError {
    pub from: ConnectionStatus,
    pub action: ConnectionAction,
}

pub fn connection_transition(
    from: ConnectionStatus,
    action: ConnectionAction,
) -> Result<StateTransition, TransitionError> {
    use ConnectionAction as A;
    use ConnectionStatus as S;

    let (to, reason) = match (from, action) {
        (S::Disconnected, A::Connect) => (S::Connecting, "connect requested"),
        (S::Connecting, A::Succeed) => (S::Connected, "provider connected"),
        (S::Connecting, A::Fail) => (S::Disconnected, "connect failed"),
        (S::Connected, A::Disconnect) => (S::Disconnected, "disconnect requested"),
        (S::Connected, A::ProviderClosed) => (S::Disconnected, "provider closed"),
        (S::Connected, A::Teardown) => (S::Disconnected, "teardown"),
        (S::Connecting, A::Teardown) => (S::Disconnected, "teardown while connecting"),
        _ => return Err(TransitionError { from, action }),
    };
    Ok(StateTransition { from, to, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connecting_can_be_abandoned() {
        let t = connection_transition(ConnectionStatus::Connecting, ConnectionAction::Fail)
            .expect("connecting -> fail");
        assert_eq!(t.to, ConnectionStatus::Disconnected);
    }

    #[test]
    fn teardown_while_disconnected_is_illegal() {
        assert!(
            connection_transition(ConnectionStatus::Disconnected, ConnectionAction::Teardown)
                .is_err()
        );
    }
}
