use std::time::Duration;

use egui::{Color32, RichText};

use crate::models::place::PlaceDetails;
use crate::models::session::RankBy;

pub mod screens;
pub mod state;

use screens::Screen;
use state::{AppState, HomeForm, Route, SessionView, UiAction};

pub struct ChooseeApp {
    state: AppState,
}

impl ChooseeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        Self { state }
    }
}

impl eframe::App for ChooseeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_pending();
        let mut action = None;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Choosee");
                if let Route::Session(view) = &self.state.route {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(address) = view.snapshot().address {
                            ui.label(address);
                        }
                    });
                }
            });
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let location = match &self.state.route {
                    Route::Home => "New session".to_owned(),
                    Route::Session(view) => format!("Session: {}", view.session_id),
                };
                ui.label(location);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(&self.state.config.api_url);
                });
            });
        });

        let busy = self.state.is_busy();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                action = match &mut self.state.route {
                    Route::Home => home_ui(ui, &mut self.state.home, busy),
                    Route::Session(view) => session_ui(ui, view),
                };
            });
        });

        if let Some(action) = action {
            self.state.dispatch(action);
        }

        // Controller updates arrive off the UI thread.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

fn home_ui(ui: &mut egui::Ui, form: &mut HomeForm, busy: bool) -> Option<UiAction> {
    let mut action = None;
    ui.heading("Where should we eat?");
    ui.add_space(12.0);

    egui::Grid::new("new_session_grid")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Address:");
            ui.text_edit_singleline(&mut form.address);
            ui.end_row();

            ui.label("Latitude / longitude:");
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut form.latitude).desired_width(80.0));
                ui.add(egui::TextEdit::singleline(&mut form.longitude).desired_width(80.0));
                if ui.add_enabled(!busy, egui::Button::new("Find address")).clicked() {
                    action = Some(UiAction::LookupAddress);
                }
            });
            ui.end_row();

            ui.label("Radius (miles):");
            ui.text_edit_singleline(&mut form.radius_miles);
            ui.end_row();

            ui.label("Type:");
            let selected = form
                .place_types
                .iter()
                .find(|t| t.value == form.place_type)
                .map_or_else(|| form.place_type.clone(), |t| t.display.clone());
            egui::ComboBox::from_id_salt("place_type")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for place_type in &form.place_types {
                        ui.selectable_value(
                            &mut form.place_type,
                            place_type.value.clone(),
                            &place_type.display,
                        );
                    }
                });
            ui.end_row();

            ui.label("Sort by:");
            ui.horizontal(|ui| {
                ui.radio_value(&mut form.rank_by, RankBy::Prominence, "Best match");
                ui.radio_value(&mut form.rank_by, RankBy::Distance, "Distance");
            });
            ui.end_row();

            ui.label("Voters:");
            ui.text_edit_singleline(&mut form.voter_count);
            ui.end_row();
        });

    ui.add_space(12.0);
    if busy {
        ui.spinner();
    } else if ui.button("Start choosing").clicked() {
        action = Some(UiAction::CreateSession);
    }
    if let Some(message) = &form.message {
        ui.colored_label(Color32::RED, message);
    }
    action
}

fn session_ui(ui: &mut egui::Ui, view: &mut SessionView) -> Option<UiAction> {
    let snapshot = view.snapshot();
    let screen = Screen::from_snapshot(&snapshot);
    let mut action = None;

    ui.heading(screen.title());
    ui.add_space(12.0);

    match &screen {
        Screen::Login => {
            ui.label("Phone number:");
            let response = ui.text_edit_singleline(&mut view.phone);
            let entered =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Continue").clicked() || entered {
                action = Some(UiAction::SubmitPhone);
            }
            if let Some(error) = &view.phone_error {
                ui.colored_label(Color32::RED, error);
            }
        }
        Screen::Loading | Screen::Waiting => {
            ui.spinner();
        }
        Screen::Choice(place) => {
            place_card(ui, place);
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!snapshot.loading, egui::Button::new(RichText::new("No").size(18.0)))
                    .clicked()
                {
                    action = Some(UiAction::Choose {
                        name: place.name.clone(),
                        is_positive: false,
                    });
                }
                if ui
                    .add_enabled(!snapshot.loading, egui::Button::new(RichText::new("Yes").size(18.0)))
                    .clicked()
                {
                    action = Some(UiAction::Choose {
                        name: place.name.clone(),
                        is_positive: true,
                    });
                }
            });
        }
        Screen::RefreshNeeded => {
            if ui.button("Refresh").clicked() {
                action = Some(UiAction::Refresh);
            }
        }
        Screen::Winner(place) => match place {
            Some(place) => place_card(ui, place),
            None => {
                ui.label("The winner could not be loaded.");
            }
        },
        Screen::Finished => {
            ui.label("Every choice was turned down.");
        }
        Screen::Expired | Screen::Error => {}
    }

    if snapshot.phase.is_terminal() || screen == Screen::Error {
        ui.add_space(12.0);
        if ui.button("Make new choices").clicked() {
            action = Some(UiAction::MakeNewChoices);
        }
    }

    if let Some(message) = &snapshot.error_message {
        ui.add_space(8.0);
        ui.colored_label(Color32::RED, message);
    }
    action
}

fn place_card(ui: &mut egui::Ui, place: &PlaceDetails) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&place.name).size(20.0).strong());
            if let Some(address) = place.address() {
                ui.label(address);
            }
            ui.horizontal(|ui| {
                if let Some(rating) = place.rating {
                    ui.label(format!("{:.1} / 5", rating));
                }
                if let Some(price) = place.price_label() {
                    ui.label(price);
                }
            });
            if let Some(phone) = &place.formatted_phone_number {
                ui.label(phone);
            }
            for hours in &place.open_hours {
                ui.small(hours);
            }
            if let Some(website) = &place.website {
                ui.hyperlink(website);
            }
        });
    });
}
