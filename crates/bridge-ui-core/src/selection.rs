//! Destination network and transfer template selection.

use tracing::debug;

use crate::domain::{
    network_by_chain_id, network_by_index, NetworkOption, SelectionState, TemplateChoice,
    TemplateField, TemplateForm, NETWORKS,
};

/// Ranks the static network list with `chain_id` first, keeping the static
/// order for the rest. `None` for chains outside the supported set.
pub fn derive_network_list(chain_id: u64) -> Option<Vec<NetworkOption>> {
    network_by_chain_id(chain_id)?;
    let mut ranked = NETWORKS.to_vec();
    ranked.sort_by_key(|n| n.chain_id != chain_id);
    Some(ranked)
}

pub fn network_label(chain_id: Option<u64>) -> String {
    match chain_id {
        None => "Not connected".to_owned(),
        Some(id) => match network_by_chain_id(id) {
            Some(network) => network.name.to_owned(),
            None => format!("Unsupported ({id})"),
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionView {
    observed_chain: Option<u64>,
    ranked: Option<Vec<NetworkOption>>,
    state: SelectionState,
    pub form: TemplateForm,
}

impl SelectionView {
    /// Re-derives the network list when `chain_id` differs from the last one
    /// seen. Returns whether anything was re-derived.
    pub fn sync(&mut self, chain_id: Option<u64>) -> bool {
        if self.observed_chain == chain_id {
            return false;
        }
        self.observed_chain = chain_id;
        self.ranked = chain_id.and_then(derive_network_list);
        self.state = SelectionState {
            selected_network: self
                .ranked
                .as_ref()
                .and_then(|ranked| ranked.get(1))
                .map(|n| n.internal_index),
            selected_template: TemplateChoice::default(),
        };
        debug!(?chain_id, selection = ?self.state, "selection re-derived");
        true
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn observed_chain(&self) -> Option<u64> {
        self.observed_chain
    }

    pub fn ranked_networks(&self) -> Option<&[NetworkOption]> {
        self.ranked.as_deref()
    }

    pub fn network_label(&self) -> String {
        network_label(self.observed_chain)
    }

    pub fn destination(&self) -> Option<&'static NetworkOption> {
        self.state.selected_network.and_then(network_by_index)
    }

    /// Destinations offered for the current chain: every ranked entry but the first.
    pub fn destinations(&self) -> &[NetworkOption] {
        match self.ranked.as_deref() {
            Some([_, rest @ ..]) => rest,
            _ => &[],
        }
    }

    pub fn select_destination(&mut self, internal_index: usize) -> bool {
        if !self
            .destinations()
            .iter()
            .any(|n| n.internal_index == internal_index)
        {
            debug!(internal_index, "destination not offered for current chain");
            return false;
        }
        self.state.selected_network = Some(internal_index);
        true
    }

    pub fn template(&self) -> TemplateChoice {
        self.state.selected_template
    }

    pub fn select_template(&mut self, template: TemplateChoice) {
        self.state.selected_template = template;
    }

    pub fn active_fields(&self) -> &'static [TemplateField] {
        self.state.selected_template.fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_is_disconnected() {
        let view = SelectionView::default();
        assert_eq!(view.network_label(), "Not connected");
        assert!(view.ranked_networks().is_none());
        assert!(view.destinations().is_empty());
        assert_eq!(view.template(), TemplateChoice::Erc20);
    }

    #[test]
    fn current_network_cannot_be_destination() {
        let mut view = SelectionView::default();
        view.sync(Some(5));
        assert!(!view.select_destination(1));
        assert!(view.select_destination(2));
        assert_eq!(view.destination().map(|n| n.chain_id), Some(42));
    }

    #[test]
    fn form_values_survive_template_switches_and_resync() {
        let mut view = SelectionView::default();
        view.sync(Some(4));
        view.form.amount = "10".to_owned();
        view.select_template(TemplateChoice::Custom);
        view.select_template(TemplateChoice::Erc20);
        view.sync(Some(42));
        assert_eq!(view.form.amount, "10");
    }
}
