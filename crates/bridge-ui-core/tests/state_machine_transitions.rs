use bridge_ui_core::{connection_transition, ConnectionAction, ConnectionStatus};

#[test]
fn connection_happy_path_transitions() {
    let t1 = connection_transition(ConnectionStatus::Disconnected, ConnectionAction::Connect)
        .expect("disconnected -> connect");
    assert_eq!(t1.to, ConnectionStatus::Connecting);
    let t2 = connection_transition(t1.to, ConnectionAction::Succeed).expect("connecting -> succeed");
    assert_eq!(t2.to, ConnectionStatus::Connected);
    let t3 = connection_transition(t2.to, ConnectionAction::ProviderClosed)
        .expect("connected -> provider closed");
    assert_eq!(t3.to, ConnectionStatus::Disconnected);
}

#[test]
fn lifecycle_can_repeat_indefinitely() {
    let mut state = ConnectionStatus::Disconnected;
    for exit in [
        ConnectionAction::Disconnect,
        ConnectionAction::ProviderClosed,
        ConnectionAction::Teardown,
    ] {
        for action in [ConnectionAction::Connect, ConnectionAction::Succeed, exit] {
            state = connection_transition(state, action)
                .expect("legal lifecycle step")
                .to;
        }
        assert_eq!(state, ConnectionStatus::Disconnected);
    }
}

#[test]
fn failed_connect_returns_to_disconnected() {
    let t = connection_transition(ConnectionStatus::Connecting, ConnectionAction::Fail)
        .expect("connecting -> fail");
    assert_eq!(t.to, ConnectionStatus::Disconnected);
    assert_eq!(t.reason, "connect failed");
}

#[test]
fn connection_illegal_transition_is_rejected() {
    let err = connection_transition(ConnectionStatus::Disconnected, ConnectionAction::Succeed)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal connection transition"));

    let err = connection_transition(ConnectionStatus::Connected, ConnectionAction::Connect)
        .expect_err("must fail");
    assert_eq!(err.from, ConnectionStatus::Connected);
    assert_eq!(err.action, ConnectionAction::Connect);
}
