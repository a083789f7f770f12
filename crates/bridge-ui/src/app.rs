//! Main application state and update loop

use std::time::Duration;

use eframe::egui;
use bridge_ui_adapters::BridgeAdapterConfig;
use bridge_ui_core::{
    ConnectionStatus, SelectionView, SessionSnapshot, TemplateChoice, TemplateField, TemplateForm,
};

use crate::session_bridge::SessionBridge;
use crate::state::{self, BuildInfo, HeaderAction};
use crate::ui;

/// Proxy-backed providers are polled, so keep frames coming while connected.
const CONNECTED_REPAINT: Duration = Duration::from_secs(1);

const FORM_STORAGE_KEY: &str = "template_form";

/// The main application state
pub struct App {
    /// Wallet session and pending connect attempt
    session: SessionBridge,
    /// Destination network and template, derived from the session chain id
    selection: SelectionView,
    build_info: BuildInfo,
}

impl App {
    /// Create a new App instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut session = SessionBridge::restored(BridgeAdapterConfig::from_env(), cc.storage);
        session.restore_cached(&cc.egui_ctx);

        let mut selection = SelectionView::default();
        if let Some(form) = cc
            .storage
            .and_then(|s| eframe::get_value::<TemplateForm>(s, FORM_STORAGE_KEY))
        {
            selection.form = form;
        }

        Self {
            session,
            selection,
            build_info: BuildInfo::current(),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        if self.session.poll() {
            ctx.request_repaint();
        }
        let snapshot = self.session.snapshot();
        self.selection.sync(snapshot.chain_id);
        if snapshot.status == ConnectionStatus::Connected {
            ctx.request_repaint_after(CONNECTED_REPAINT);
        }

        let mut action = HeaderAction::None;
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            action = render_header(ui, &snapshot);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(self.build_info.footer_text())
                        .weak()
                        .small()
                        .monospace(),
                );
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                self.render_network_section(ui, &snapshot);
                ui.add_space(10.0);
                self.render_template_section(ui);
                ui.add_space(20.0);
            });
        });

        match action {
            HeaderAction::Connect => self.session.connect(ctx),
            HeaderAction::Disconnect => self.session.disconnect(),
            HeaderAction::None => {}
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, FORM_STORAGE_KEY, &self.selection.form);
        self.session.persist(storage);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.teardown();
    }
}

fn render_header(ui: &mut egui::Ui, snapshot: &SessionSnapshot) -> HeaderAction {
    let mut action = HeaderAction::None;
    ui.horizontal(|ui| {
        ui.heading(egui::RichText::new("🌉 Bridge").size(22.0).color(ui::ACCENT));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            match snapshot.status {
                ConnectionStatus::Disconnected => {
                    if ui.button("Connect wallet").clicked() {
                        action = HeaderAction::Connect;
                    }
                }
                ConnectionStatus::Connecting => {
                    ui.add_enabled(false, egui::Button::new("Connect wallet"));
                    ui.spinner();
                }
                ConnectionStatus::Connected => {
                    if ui.button("Disconnect").clicked() {
                        action = HeaderAction::Disconnect;
                    }
                    if let Some(address) = &snapshot.address {
                        ui::account_badge(ui, snapshot.chain_id, address);
                    }
                }
            }
            ui.label(egui::RichText::new(state::status_label(snapshot.status)).weak());
        });
    });
    action
}

impl App {
    fn render_network_section(&mut self, ui: &mut egui::Ui, snapshot: &SessionSnapshot) {
        ui::styled_heading(ui, "Network");
        ui.horizontal(|ui| {
            ui.label("Connected to:");
            ui.label(egui::RichText::new(self.selection.network_label()).strong());
        });

        let destinations = self.selection.destinations().to_vec();
        if destinations.is_empty() {
            if snapshot.chain_id.is_some() {
                ui::hint(ui, "Switch your wallet to a supported testnet to pick a destination.");
            }
            return;
        }

        ui::section_header(ui, "Destination");
        let selected = self.selection.state().selected_network;
        for network in destinations {
            if ui
                .radio(selected == Some(network.internal_index), network.name)
                .clicked()
            {
                self.selection.select_destination(network.internal_index);
            }
        }
    }

    fn render_template_section(&mut self, ui: &mut egui::Ui) {
        ui::section_header(ui, "Template");
        let current = self.selection.template();
        ui.horizontal(|ui| {
            for template in TemplateChoice::ALL {
                if ui.radio(current == template, template.label()).clicked() {
                    self.selection.select_template(template);
                }
            }
        });
        ui.add_space(8.0);

        egui::Grid::new("template_fields")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for field in self.selection.active_fields() {
                    ui.label(field.label());
                    let value = self.selection.form.value_mut(*field);
                    match field {
                        TemplateField::Data => {
                            ui::multiline_input(ui, value, field.hint(), 4);
                        }
                        _ => {
                            ui::text_input(ui, value, field.hint());
                        }
                    }
                    ui.end_row();
                }
            });
    }
}
