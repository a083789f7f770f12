use bridge_ui_core::{
    derive_network_list, network_label, SelectionView, TemplateChoice, TemplateField, NETWORKS,
};

#[test]
fn supported_chain_is_ranked_first_and_rest_keep_order() {
    for network in NETWORKS {
        let ranked = derive_network_list(network.chain_id).expect("supported chain");
        assert_eq!(ranked.len(), NETWORKS.len());
        assert_eq!(ranked[0], network);

        let rest: Vec<usize> = ranked[1..].iter().map(|n| n.internal_index).collect();
        let expected: Vec<usize> = NETWORKS
            .iter()
            .filter(|n| n.chain_id != network.chain_id)
            .map(|n| n.internal_index)
            .collect();
        assert_eq!(rest, expected);
    }
}

#[test]
fn unsupported_chains_yield_no_list() {
    for chain_id in [0, 1, 3, 10, 137, 11_155_111] {
        assert!(derive_network_list(chain_id).is_none());
        assert_eq!(network_label(Some(chain_id)), format!("Unsupported ({chain_id})"));
    }
}

#[test]
fn default_destination_is_second_ranked_entry() {
    for network in NETWORKS {
        let mut view = SelectionView::default();
        assert!(view.sync(Some(network.chain_id)));
        let ranked = view.ranked_networks().expect("ranked list");
        assert_eq!(
            view.state().selected_network,
            Some(ranked[1].internal_index)
        );
        assert_ne!(
            view.state().selected_network,
            Some(ranked[0].internal_index)
        );
    }
}

#[test]
fn goerli_defaults_to_rinkeby_destination() {
    let mut view = SelectionView::default();
    view.sync(Some(5));
    assert_eq!(view.network_label(), "Goerli Testnet");
    let destination = view.destination().expect("default destination");
    assert_eq!(destination.name, "Rinkeby Testnet");
    assert_eq!(
        view.ranked_networks().expect("ranked")[1].name,
        "Rinkeby Testnet"
    );
}

#[test]
fn mainnet_is_unsupported_without_destinations() {
    let mut view = SelectionView::default();
    view.sync(Some(5));
    view.sync(Some(1));
    assert_eq!(view.network_label(), "Unsupported (1)");
    assert!(view.ranked_networks().is_none());
    assert!(view.destinations().is_empty());
    assert!(view.state().selected_network.is_none());
}

#[test]
fn same_chain_does_not_rederive() {
    let mut view = SelectionView::default();
    assert!(view.sync(Some(4)));
    assert!(view.select_destination(2));
    assert!(!view.sync(Some(4)));
    assert_eq!(view.state().selected_network, Some(2));
}

#[test]
fn chain_change_resets_selection() {
    let mut view = SelectionView::default();
    view.sync(Some(4));
    view.select_template(TemplateChoice::Erc721);
    view.sync(Some(42));
    assert_eq!(view.template(), TemplateChoice::Erc20);
    assert_eq!(view.destination().map(|n| n.chain_id), Some(4));
}

#[test]
fn template_switch_swaps_field_group_only() {
    let mut view = SelectionView::default();
    view.sync(Some(5));
    let before = view.state().selected_network;

    view.select_template(TemplateChoice::Erc721);
    assert_eq!(
        view.active_fields(),
        &[TemplateField::TokenId, TemplateField::Recipient]
    );
    view.select_template(TemplateChoice::Custom);
    assert_eq!(view.active_fields(), &[TemplateField::Data]);
    view.select_template(TemplateChoice::Erc20);
    assert_eq!(
        view.active_fields(),
        &[TemplateField::Amount, TemplateField::Recipient]
    );
    assert_eq!(view.state().selected_network, before);
    assert_eq!(view.observed_chain(), Some(5));
}
