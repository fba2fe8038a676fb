//! Application shell: window layout, persistent settings and the widget code.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use egui_extras::DatePickerButton;
use egui_plot::{Legend, Plot};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use log::info;

mod animate;
mod drafts;
mod export;
mod format;
mod forms;
mod logbook;
mod math;
mod plotting;
mod report;
mod storage;

use drafts::{Debouncer, DraftForm, clear_draft, load_draft, save_draft};
use export::{ExportFormat, activity_records, suggested_filename, weight_records, write_export};
use forms::{ActivityForm, CalculatorForm, ProfileForm, WeightForm};
use logbook::{ActivityEntry, Logbook};
use math::Severity;
use storage::{JsonFileStore, KeyValueStore};

/// Storage key for the colour scheme. Dark is applied only when the stored
/// value is exactly "dark"; anything else falls back to light.
const THEME_KEY: &str = "fitlog_theme";

const TOAST_DEFAULT_MS: u64 = 5000;
const TOAST_AUTOSAVE_MS: u64 = 2000;

fn theme_is_dark(store: &dyn KeyValueStore) -> bool {
    store.get(THEME_KEY).as_deref() == Some("dark")
}

fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Info => egui::Color32::from_rgb(23, 162, 184),
        Severity::Success => egui::Color32::from_rgb(40, 167, 69),
        Severity::Warning => egui::Color32::from_rgb(255, 193, 7),
        Severity::Danger => egui::Color32::from_rgb(220, 53, 69),
    }
}

/// Form label that turns red once its field holds an invalid value. Empty
/// fields stay neutral until submit flags them.
fn field_label(text: &str, raw: &str, error: &Option<String>) -> egui::RichText {
    if !raw.trim().is_empty() && error.is_some() {
        egui::RichText::new(text).color(severity_color(Severity::Danger))
    } else {
        egui::RichText::new(text)
    }
}

/// One transient notification with its own lifetime.
struct Toast {
    message: String,
    severity: Severity,
    shown_at: Instant,
    duration: Duration,
}

impl Toast {
    fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum Tab {
    #[default]
    Overview,
    Activities,
    Weight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortColumn {
    Date,
    Activity,
    Duration,
    Calories,
}

fn default_true() -> bool {
    true
}

fn default_ma_window() -> usize {
    7
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    #[serde(default)]
    remembered_user: Option<u64>,
    #[serde(default = "default_true")]
    show_side_panel: bool,
    #[serde(default = "default_true")]
    animate_stats: bool,
    #[serde(default = "default_true")]
    autosave_drafts: bool,
    #[serde(default)]
    show_weight_trend: bool,
    #[serde(default = "default_ma_window")]
    ma_window: usize,
    #[serde(default)]
    last_tab: Tab,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remembered_user: None,
            show_side_panel: true,
            animate_stats: true,
            autosave_drafts: true,
            show_weight_trend: false,
            ma_window: 7,
            last_tab: Tab::Overview,
        }
    }
}

impl Settings {
    const FILE: &'static str = "fitlog_settings.json";

    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(text) = std::fs::read_to_string(path) {
                if let Ok(settings) = serde_json::from_str(&text) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, json);
            }
        }
    }
}

struct FitLogApp {
    logbook: Logbook,
    store: JsonFileStore,
    settings: Settings,
    settings_dirty: bool,
    logbook_dirty: bool,
    selected_user: Option<u64>,
    tab: Tab,
    dark_mode: bool,
    theme_applied: bool,
    activity_form: ActivityForm,
    activity_debounce: Debouncer,
    weight_form: WeightForm,
    weight_debounce: Debouncer,
    profile_form: ProfileForm,
    profile_debounce: Debouncer,
    calculator_form: CalculatorForm,
    calculator_debounce: Debouncer,
    calc_goal: math::Goal,
    calc_rate: String,
    toasts: Vec<Toast>,
    stats_shown_at: Option<Instant>,
    progress_shown_at: Option<Instant>,
    show_settings: bool,
    show_calculator: bool,
    show_profile: bool,
    show_about: bool,
    // User whose profile is loaded into the form, `None` while creating.
    editing_user: Option<u64>,
    sort_column: SortColumn,
    sort_ascending: bool,
    // (form id, field name) that should grab focus on the next frame.
    focus_field: Option<(&'static str, &'static str)>,
    started_at: Instant,
    first_frame_logged: bool,
}

impl Default for FitLogApp {
    fn default() -> Self {
        let started_at = Instant::now();
        let settings = Settings::load();
        let store = JsonFileStore::load();
        let logbook = Logbook::load();
        info!(
            "Loaded {} users, {} activities, {} weigh-ins",
            logbook.users.len(),
            logbook.activities.len(),
            logbook.weight_history.len()
        );

        let today = Local::now().date_naive();
        let mut activity_form = ActivityForm::new(today);
        let mut weight_form = WeightForm::new(today);
        let mut profile_form = ProfileForm::default();
        let mut calculator_form = CalculatorForm::default();
        if settings.autosave_drafts {
            for form in [
                &mut activity_form as &mut dyn DraftForm,
                &mut weight_form,
                &mut profile_form,
                &mut calculator_form,
            ] {
                if load_draft(&store, form) {
                    info!("Restored draft for the {} form", form.form_id());
                }
            }
        }

        let selected_user = settings
            .remembered_user
            .filter(|id| logbook.user(*id).is_some())
            .or_else(|| logbook.users.first().map(|u| u.id));
        let tab = settings.last_tab;
        let dark_mode = theme_is_dark(&store);

        Self {
            logbook,
            store,
            settings,
            settings_dirty: false,
            logbook_dirty: false,
            selected_user,
            tab,
            dark_mode,
            theme_applied: false,
            activity_form,
            activity_debounce: Debouncer::autosave(),
            weight_form,
            weight_debounce: Debouncer::autosave(),
            profile_form,
            profile_debounce: Debouncer::autosave(),
            calculator_form,
            calculator_debounce: Debouncer::autosave(),
            calc_goal: math::Goal::Maintain,
            calc_rate: "0.5".to_owned(),
            toasts: Vec::new(),
            stats_shown_at: None,
            progress_shown_at: None,
            show_settings: false,
            show_calculator: false,
            show_profile: false,
            show_about: false,
            editing_user: None,
            sort_column: SortColumn::Date,
            sort_ascending: false,
            focus_field: None,
            started_at,
            first_frame_logged: false,
        }
    }
}

impl FitLogApp {
    fn sort_button(
        ui: &mut egui::Ui,
        label: &str,
        column: SortColumn,
        sort_column: &mut SortColumn,
        sort_ascending: &mut bool,
    ) {
        let arrow = if *sort_column == column {
            if *sort_ascending {
                " \u{25B2}"
            } else {
                " \u{25BC}"
            }
        } else {
            ""
        };
        if ui.button(format!("{label}{arrow}")).clicked() {
            if *sort_column == column {
                *sort_ascending = !*sort_ascending;
            } else {
                *sort_column = column;
                *sort_ascending = true;
            }
        }
    }

    fn push_toast(&mut self, message: impl Into<String>, severity: Severity) {
        self.push_toast_for(message, severity, TOAST_DEFAULT_MS);
    }

    fn push_toast_for(&mut self, message: impl Into<String>, severity: Severity, ms: u64) {
        self.toasts.push(Toast {
            message: message.into(),
            severity,
            shown_at: Instant::now(),
            duration: Duration::from_millis(ms),
        });
    }

    fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        let value = if self.dark_mode { "dark" } else { "light" };
        self.store.set(THEME_KEY, value);
        self.theme_applied = false;
    }

    fn set_tab(&mut self, tab: Tab, now: Instant) {
        self.tab = tab;
        self.stats_shown_at = (tab == Tab::Overview).then_some(now);
        self.settings.last_tab = tab;
        self.settings_dirty = true;
    }

    fn select_user(&mut self, id: u64, now: Instant) {
        self.selected_user = Some(id);
        self.settings.remembered_user = Some(id);
        self.settings_dirty = true;
        self.stats_shown_at = Some(now);
        self.progress_shown_at = Some(now);
    }

    /// Writes out every draft whose quiet period has elapsed.
    fn flush_drafts(&mut self, now: Instant) {
        if !self.settings.autosave_drafts {
            self.activity_debounce.cancel();
            self.weight_debounce.cancel();
            self.profile_debounce.cancel();
            self.calculator_debounce.cancel();
            return;
        }
        let mut saved = false;
        if self.activity_debounce.fire(now) {
            save_draft(&mut self.store, &self.activity_form);
            saved = true;
        }
        if self.weight_debounce.fire(now) {
            save_draft(&mut self.store, &self.weight_form);
            saved = true;
        }
        // Edits to an existing user are never drafted, the logbook has them.
        if self.profile_debounce.fire(now) && self.editing_user.is_none() {
            save_draft(&mut self.store, &self.profile_form);
            saved = true;
        }
        if self.calculator_debounce.fire(now) {
            save_draft(&mut self.store, &self.calculator_form);
            saved = true;
        }
        if saved {
            self.push_toast_for("Draft saved", Severity::Info, TOAST_AUTOSAVE_MS);
        }
    }

    /// Ctrl+S: submit whatever form is in front, through the same validation
    /// as its button. Windows take precedence over the tab behind them.
    fn submit_active_form(&mut self, now: Instant, today: NaiveDate) {
        if self.show_profile {
            self.submit_profile(now, today);
            return;
        }
        if self.show_calculator {
            // The calculator has no submit, results update live.
            return;
        }
        match self.tab {
            Tab::Activities => self.submit_activity(now, today),
            Tab::Weight => self.submit_weight(now, today),
            Tab::Overview => {}
        }
    }

    fn any_draft_pending(&self) -> bool {
        self.activity_debounce.is_pending()
            || self.weight_debounce.is_pending()
            || self.profile_debounce.is_pending()
            || self.calculator_debounce.is_pending()
    }

    fn user_activities_sorted(&self, user_id: u64) -> Vec<&ActivityEntry> {
        let mut entries: Vec<&ActivityEntry> = self.logbook.activities_for(user_id).collect();
        entries.sort_by_key(|e| e.date);
        entries
    }

    fn submit_activity(&mut self, now: Instant, today: NaiveDate) {
        let Some(user_id) = self.selected_user else {
            self.push_toast("Add a user before logging activities", Severity::Warning);
            return;
        };
        if let Some(errors) = self.activity_form.validate() {
            if let Some((field, message)) = errors.first() {
                let message = message.to_owned();
                self.focus_field = Some((self.activity_form.form_id(), field));
                self.push_toast(message, Severity::Warning);
            }
            return;
        }
        let estimated = self.activity_form.calories_value().is_none();
        let added = self.logbook.add_activity(
            user_id,
            self.activity_form.activity_name.trim(),
            self.activity_form.duration_min(),
            self.activity_form.calories_value(),
            self.activity_form.date,
            self.activity_form.details.trim().to_owned(),
        );
        if added.is_some() {
            self.logbook_dirty = true;
            clear_draft(&mut self.store, &self.activity_form);
            self.activity_debounce.cancel();
            self.activity_form.reset(today);
            self.stats_shown_at = Some(now);
            let message = if estimated {
                "Activity added, calories estimated"
            } else {
                "Activity added"
            };
            self.push_toast(message, Severity::Success);
        }
    }

    fn submit_weight(&mut self, now: Instant, today: NaiveDate) {
        let Some(user_id) = self.selected_user else {
            self.push_toast("Add a user before recording weight", Severity::Warning);
            return;
        };
        if let Some(errors) = self.weight_form.validate() {
            if let Some((field, message)) = errors.first() {
                let message = message.to_owned();
                self.focus_field = Some((self.weight_form.form_id(), field));
                self.push_toast(message, Severity::Warning);
            }
            return;
        }
        let recorded = self.logbook.record_weight(
            user_id,
            self.weight_form.weight_kg(),
            self.weight_form.date,
            self.weight_form.notes.trim().to_owned(),
        );
        if recorded.is_some() {
            self.logbook_dirty = true;
            clear_draft(&mut self.store, &self.weight_form);
            self.weight_debounce.cancel();
            self.weight_form.reset(today);
            self.progress_shown_at = Some(now);
            self.push_toast("Weight recorded", Severity::Success);
        }
    }

    fn submit_profile(&mut self, now: Instant, today: NaiveDate) {
        if let Some(errors) = self.profile_form.validate() {
            if let Some((field, message)) = errors.first() {
                let message = message.to_owned();
                self.focus_field = Some((self.profile_form.form_id(), field));
                self.push_toast(message, Severity::Warning);
            }
            return;
        }
        if let Some(id) = self.editing_user {
            if self.logbook.update_user(
                id,
                Some(self.profile_form.name.trim().to_owned()),
                Some(self.profile_form.height_cm()),
                Some(self.profile_form.weight_kg()),
                Some(self.profile_form.age_years()),
                Some(self.profile_form.target_weight_kg()),
                today,
            ) {
                self.logbook_dirty = true;
                self.progress_shown_at = Some(now);
                self.push_toast("Profile updated", Severity::Success);
            }
            self.cancel_edit();
            self.show_profile = false;
            return;
        }
        let id = self.logbook.add_user(
            self.profile_form.name.trim().to_owned(),
            self.profile_form.height_cm(),
            self.profile_form.weight_kg(),
            self.profile_form.age_years(),
            self.profile_form.target_weight_kg(),
            today,
        );
        self.logbook_dirty = true;
        clear_draft(&mut self.store, &self.profile_form);
        self.profile_debounce.cancel();
        self.profile_form = ProfileForm::default();
        self.select_user(id, now);
        self.show_profile = false;
        self.push_toast("User added", Severity::Success);
    }

    /// Copies a user's profile into the form for editing.
    fn start_edit_user(&mut self, id: u64) {
        let Some(user) = self.logbook.user(id) else {
            return;
        };
        self.profile_form = ProfileForm {
            name: user.name.clone(),
            height: user.height_cm.to_string(),
            weight: user.weight_kg.to_string(),
            age: user.age.to_string(),
            target_weight: user.target_weight_kg.to_string(),
        };
        self.profile_debounce.cancel();
        self.editing_user = Some(id);
    }

    /// Ends an edit session. The draft slot belongs to the create form, so
    /// any saved new-user draft comes back into the emptied fields.
    fn cancel_edit(&mut self) {
        self.editing_user = None;
        self.profile_form = ProfileForm::default();
        self.profile_debounce.cancel();
        if self.settings.autosave_drafts {
            load_draft(&self.store, &mut self.profile_form);
        }
    }

    fn remove_user(&mut self, id: u64) {
        if !self.logbook.remove_user(id) {
            return;
        }
        self.logbook_dirty = true;
        if self.editing_user == Some(id) {
            self.cancel_edit();
        }
        if self.selected_user == Some(id) {
            self.selected_user = self.logbook.users.first().map(|u| u.id);
            self.settings.remembered_user = self.selected_user;
            self.settings_dirty = true;
        }
        self.push_toast("User removed", Severity::Info);
    }

    fn export_activities(&mut self, format: ExportFormat, today: NaiveDate) {
        let Some(user_id) = self.selected_user else {
            self.push_toast("No user selected", Severity::Warning);
            return;
        };
        let records = activity_records(self.user_activities_sorted(user_id).into_iter());
        let dialog = FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(suggested_filename(format, today));
        if let Some(path) = dialog.save_file() {
            match write_export(&path, format, &records) {
                Ok(()) => self.push_toast("Activities exported", Severity::Success),
                Err(e) => {
                    log::error!("Failed to export activities: {}", e);
                    self.push_toast("Export failed", Severity::Danger);
                }
            }
        }
    }

    fn export_weights(&mut self, format: ExportFormat, today: NaiveDate) {
        let Some(user_id) = self.selected_user else {
            self.push_toast("No user selected", Severity::Warning);
            return;
        };
        let mut weigh_ins: Vec<_> = self.logbook.weights_for(user_id).collect();
        weigh_ins.sort_by_key(|w| w.date);
        let records = weight_records(weigh_ins.into_iter());
        let dialog = FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(suggested_filename(format, today));
        if let Some(path) = dialog.save_file() {
            match write_export(&path, format, &records) {
                Ok(()) => self.push_toast("Weight history exported", Severity::Success),
                Err(e) => {
                    log::error!("Failed to export weight history: {}", e);
                    self.push_toast("Export failed", Severity::Danger);
                }
            }
        }
    }

    fn export_report(&mut self, today: NaiveDate) {
        let Some(user_id) = self.selected_user else {
            self.push_toast("No user selected", Severity::Warning);
            return;
        };
        let (Some(user), Some(stats)) =
            (self.logbook.user(user_id), self.logbook.stats_for(user_id))
        else {
            return;
        };
        let entries = self.user_activities_sorted(user_id);
        let daily = self.logbook.daily_calories(user_id);
        let weights = self.logbook.weight_series(user_id);
        let dialog = FileDialog::new()
            .add_filter("HTML", &["html"])
            .set_file_name(format!("fitlog_report_{today}.html"));
        if let Some(path) = dialog.save_file() {
            match report::export_html_report(&path, user, &stats, &entries, &daily, &weights, today)
            {
                Ok(()) => {
                    let _ = open::that(&path);
                    self.push_toast("Report exported", Severity::Success);
                }
                Err(e) => {
                    log::error!("Failed to export report: {}", e);
                    self.push_toast("Report export failed", Severity::Danger);
                }
            }
        }
    }

    fn apply_focus(&mut self, response: &egui::Response, form_id: &str, field: &str) {
        if self
            .focus_field
            .is_some_and(|(f, n)| f == form_id && n == field)
        {
            response.request_focus();
            self.focus_field = None;
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, today: NaiveDate) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Export Activities as CSV...").clicked() {
                        ui.close_menu();
                        self.export_activities(ExportFormat::Csv, today);
                    }
                    if ui.button("Export Activities as JSON...").clicked() {
                        ui.close_menu();
                        self.export_activities(ExportFormat::Json, today);
                    }
                    if ui.button("Export Weights as CSV...").clicked() {
                        ui.close_menu();
                        self.export_weights(ExportFormat::Csv, today);
                    }
                    if ui.button("Export Weights as JSON...").clicked() {
                        ui.close_menu();
                        self.export_weights(ExportFormat::Json, today);
                    }
                    ui.separator();
                    if ui.button("Export HTML Report...").clicked() {
                        ui.close_menu();
                        self.export_report(today);
                    }
                    ui.separator();
                    if ui.button("Settings").clicked() {
                        ui.close_menu();
                        self.show_settings = true;
                    }
                    if ui.button("About").clicked() {
                        ui.close_menu();
                        self.show_about = true;
                    }
                });
                if ui.button("Calculator").clicked() {
                    self.show_calculator = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if self.dark_mode { "\u{2600} Light" } else { "\u{1F319} Dark" };
                    if ui.button(label).clicked() {
                        self.toggle_theme();
                    }
                });
            });
        });
    }

    fn control_bar(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("control_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("User:");
                let selected_name = self
                    .selected_user
                    .and_then(|id| self.logbook.user(id))
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| "none".to_owned());
                let mut clicked_user = None;
                egui::ComboBox::from_id_source("user_combo")
                    .selected_text(selected_name)
                    .show_ui(ui, |ui| {
                        for user in &self.logbook.users {
                            if ui
                                .selectable_label(self.selected_user == Some(user.id), &user.name)
                                .clicked()
                            {
                                clicked_user = Some(user.id);
                            }
                        }
                    });
                if let Some(id) = clicked_user {
                    if self.selected_user != Some(id) {
                        self.select_user(id, now);
                    }
                }
                if ui.button("Add User...").clicked() {
                    self.show_profile = true;
                }
                ui.separator();
                for (tab, label) in [
                    (Tab::Overview, "Overview"),
                    (Tab::Activities, "Activities"),
                    (Tab::Weight, "Weight"),
                ] {
                    if ui.selectable_label(self.tab == tab, label).clicked() && self.tab != tab {
                        self.set_tab(tab, now);
                    }
                }
            });
        });
    }

    fn side_panel(&mut self, ctx: &egui::Context, now: Instant) {
        egui::SidePanel::left("user_summary").show(ctx, |ui| {
            let Some(user) = self
                .selected_user
                .and_then(|id| self.logbook.user(id))
                .cloned()
            else {
                ui.label("No users yet.");
                ui.label("Use \"Add User...\" to create one.");
                return;
            };
            let Some(stats) = self.logbook.stats_for(user.id) else {
                return;
            };

            ui.heading(&user.name);
            ui.label(format!("{:.0} cm, {} years", user.height_cm, user.age));
            ui.separator();

            let bmi = math::bmi(user.weight_kg, user.height_cm);
            let category = math::bmi_category(bmi);
            ui.label(
                egui::RichText::new(format!("BMI {:.1} ({})", bmi, category.label()))
                    .color(severity_color(category.severity())),
            );
            ui.label(format!("Current weight: {:.1} kg", user.weight_kg));
            ui.label(format!("Target weight: {:.1} kg", user.target_weight_kg));
            ui.separator();

            ui.label(format!("{}", stats.weight_status));
            if self.progress_shown_at.is_none() {
                self.progress_shown_at = Some(now);
            }
            let fill = if self.settings.animate_stats {
                let elapsed = self
                    .progress_shown_at
                    .map(|t| now.duration_since(t))
                    .unwrap_or_default();
                animate::eased_fill(elapsed)
            } else {
                1.0
            };
            let fraction = fill * (stats.weight_progress_pct / 100.0) as f32;
            ui.add(
                egui::ProgressBar::new(fraction)
                    .text(format!("{:.0}%", stats.weight_progress_pct)),
            );
            ui.separator();

            let weights: Vec<f64> = self
                .logbook
                .weight_series(user.id)
                .into_iter()
                .map(|(_, kg)| kg)
                .collect();
            if weights.len() >= 2 {
                ui.label("Weight trend");
                sparkline(ui, &weights);
            }

            ui.collapsing("Tips", |ui| {
                ui.label("\u{2022} Ctrl+S submits the form in front.");
                ui.label("\u{2022} Ctrl+N focuses the current form.");
                ui.label("\u{2022} Esc closes open windows.");
                ui.label("\u{2022} Leave calories blank to estimate them.");
            });
        });
    }

    fn overview_tab(&mut self, ui: &mut egui::Ui, now: Instant) {
        let Some(user_id) = self.selected_user else {
            ui.label("Add a user to see statistics.");
            return;
        };
        let Some(stats) = self.logbook.stats_for(user_id) else {
            return;
        };
        if self.stats_shown_at.is_none() {
            self.stats_shown_at = Some(now);
        }
        let elapsed = if self.settings.animate_stats {
            self.stats_shown_at
                .map(|t| now.duration_since(t))
                .unwrap_or_default()
        } else {
            Duration::from_millis(animate::COUNT_UP_MS)
        };

        ui.horizontal(|ui| {
            stat_card(
                ui,
                "Activities",
                &animate::count_up_display(stats.total_activities as f64, elapsed),
            );
            stat_card(
                ui,
                "Total kcal",
                &animate::count_up_display(stats.total_calories, elapsed),
            );
            stat_card(
                ui,
                "Avg kcal/entry",
                &animate::count_up_display(stats.avg_calories, elapsed),
            );
        });
        ui.separator();

        let daily = self.logbook.daily_calories(user_id);
        if daily.len() < 2 {
            ui.label("Log a few activities to see the calorie chart.");
            return;
        }
        ui.heading("Calories per day");
        let line = plotting::calories_per_day_line(&daily);
        Plot::new("calories_plot")
            .legend(Legend::default())
            .height(260.0)
            .x_axis_formatter(|mark, _chars, _| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| format!("{:.0}", mark.value))
            })
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    }

    fn activities_tab(&mut self, ui: &mut egui::Ui, now: Instant, today: NaiveDate) {
        ui.heading("Log an activity");
        let errors = self.activity_form.validate().unwrap_or_default();
        egui::Grid::new("activity_form_grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Date:");
                if ui
                    .add(
                        DatePickerButton::new(&mut self.activity_form.date)
                            .id_source("activity_date"),
                    )
                    .changed()
                {
                    self.activity_debounce.trigger(now);
                }
                ui.end_row();

                ui.label("Activity:");
                let response = ui.text_edit_singleline(&mut self.activity_form.activity_name);
                self.apply_focus(&response, "activity", "activity_name");
                if response.changed() {
                    self.activity_debounce.trigger(now);
                }
                ui.end_row();

                ui.label(field_label(
                    "Duration (min):",
                    &self.activity_form.duration,
                    &errors.duration,
                ));
                let response = ui.text_edit_singleline(&mut self.activity_form.duration);
                self.apply_focus(&response, "activity", "duration");
                if response.changed() {
                    self.activity_debounce.trigger(now);
                }
                ui.end_row();

                ui.label(field_label(
                    "Calories (blank = estimate):",
                    &self.activity_form.calories,
                    &errors.calories,
                ));
                let response = ui.text_edit_singleline(&mut self.activity_form.calories);
                self.apply_focus(&response, "activity", "calories");
                if response.changed() {
                    self.activity_debounce.trigger(now);
                }
                ui.end_row();

                ui.label("Notes:");
                let response = ui.text_edit_singleline(&mut self.activity_form.details);
                if response.changed() {
                    self.activity_debounce.trigger(now);
                }
                ui.end_row();
            });

        self.activity_hints(ui, now);

        if ui.button("Add Activity").clicked() {
            self.submit_activity(now, today);
        }
        ui.separator();
        self.activities_table(ui);
    }

    /// Suggestion and estimate preview shown under the activity form.
    fn activity_hints(&mut self, ui: &mut egui::Ui, now: Instant) {
        let name = self.activity_form.activity_name.trim().to_owned();
        if name.is_empty() {
            return;
        }
        let key = math::normalize_activity(&name);
        if !math::ACTIVITY_MET.contains_key(key.as_str()) {
            let suggestion = math::closest_activity(&name);
            ui.horizontal(|ui| {
                ui.label("Unknown activity, estimates use the default factor.");
                if let Some(suggestion) = suggestion {
                    if ui
                        .small_button(format!("Did you mean {suggestion}?"))
                        .clicked()
                    {
                        self.activity_form.activity_name = suggestion.to_owned();
                        self.activity_debounce.trigger(now);
                    }
                }
            });
        }
        if self.activity_form.calories.trim().is_empty() {
            let duration: Option<f64> = self.activity_form.duration.trim().parse().ok();
            let weight = self
                .selected_user
                .and_then(|id| self.logbook.user(id))
                .map(|u| u.weight_kg);
            if let (Some(duration), Some(weight)) = (duration, weight) {
                if duration > 0.0 {
                    let estimate = math::estimate_calories(&key, duration, weight);
                    ui.label(format!("Estimated burn: {} kcal", estimate));
                }
            }
        }
    }

    fn activities_table(&mut self, ui: &mut egui::Ui) {
        let Some(user_id) = self.selected_user else {
            return;
        };
        let mut entries: Vec<ActivityEntry> =
            self.logbook.activities_for(user_id).cloned().collect();
        match self.sort_column {
            SortColumn::Date => entries.sort_by_key(|e| e.date),
            SortColumn::Activity => entries.sort_by(|a, b| a.activity.cmp(&b.activity)),
            SortColumn::Duration => entries.sort_by(|a, b| {
                a.duration_min
                    .partial_cmp(&b.duration_min)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            SortColumn::Calories => entries.sort_by(|a, b| {
                a.calories
                    .partial_cmp(&b.calories)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
        }
        if !self.sort_ascending {
            entries.reverse();
        }

        let mut sort_column = self.sort_column;
        let mut sort_ascending = self.sort_ascending;
        let mut to_delete = None;
        egui_extras::TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(egui_extras::Column::auto())
            .column(egui_extras::Column::auto())
            .column(egui_extras::Column::auto())
            .column(egui_extras::Column::auto())
            .column(egui_extras::Column::remainder())
            .column(egui_extras::Column::auto())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    Self::sort_button(
                        ui,
                        "Date",
                        SortColumn::Date,
                        &mut sort_column,
                        &mut sort_ascending,
                    );
                });
                header.col(|ui| {
                    Self::sort_button(
                        ui,
                        "Activity",
                        SortColumn::Activity,
                        &mut sort_column,
                        &mut sort_ascending,
                    );
                });
                header.col(|ui| {
                    Self::sort_button(
                        ui,
                        "Duration",
                        SortColumn::Duration,
                        &mut sort_column,
                        &mut sort_ascending,
                    );
                });
                header.col(|ui| {
                    Self::sort_button(
                        ui,
                        "Calories",
                        SortColumn::Calories,
                        &mut sort_column,
                        &mut sort_ascending,
                    );
                });
                header.col(|ui| {
                    ui.label("Notes");
                });
                header.col(|_ui| {});
            })
            .body(|mut body| {
                for entry in &entries {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(entry.date.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&entry.activity);
                        });
                        row.col(|ui| {
                            ui.label(format!("{} min", entry.duration_min));
                        });
                        row.col(|ui| {
                            ui.label(format!("{} kcal", entry.calories));
                        });
                        row.col(|ui| {
                            ui.label(&entry.notes);
                        });
                        row.col(|ui| {
                            if ui.small_button("\u{2716}").clicked() {
                                to_delete = Some(entry.id);
                            }
                        });
                    });
                }
            });
        self.sort_column = sort_column;
        self.sort_ascending = sort_ascending;
        if let Some(id) = to_delete {
            self.logbook.remove_activity(id);
            self.logbook_dirty = true;
            self.push_toast("Activity removed", Severity::Info);
        }
    }

    fn weight_tab(&mut self, ui: &mut egui::Ui, now: Instant, today: NaiveDate) {
        ui.heading("Record weight");
        let errors = self.weight_form.validate().unwrap_or_default();
        egui::Grid::new("weight_form_grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Date:");
                if ui
                    .add(DatePickerButton::new(&mut self.weight_form.date).id_source("weight_date"))
                    .changed()
                {
                    self.weight_debounce.trigger(now);
                }
                ui.end_row();

                ui.label(field_label(
                    "Weight (kg):",
                    &self.weight_form.weight,
                    &errors.weight,
                ));
                let response = ui.text_edit_singleline(&mut self.weight_form.weight);
                self.apply_focus(&response, "weight", "weight");
                if response.changed() {
                    self.weight_debounce.trigger(now);
                }
                ui.end_row();

                ui.label("Notes:");
                let response = ui.text_edit_singleline(&mut self.weight_form.notes);
                if response.changed() {
                    self.weight_debounce.trigger(now);
                }
                ui.end_row();
            });
        if ui.button("Record Weight").clicked() {
            self.submit_weight(now, today);
        }
        ui.separator();

        let Some(user_id) = self.selected_user else {
            return;
        };
        let series = self.logbook.weight_series(user_id);
        if series.len() >= 2 {
            ui.heading("Weight over time");
            let line = plotting::weight_line(&series);
            let target = self
                .logbook
                .user(user_id)
                .and_then(|u| plotting::target_weight_line(u.target_weight_kg, &series));
            let trend = if self.settings.show_weight_trend {
                plotting::weight_trend_line(&series, self.settings.ma_window)
            } else {
                None
            };
            Plot::new("weight_plot")
                .legend(Legend::default())
                .height(240.0)
                .x_axis_formatter(|mark, _chars, _| {
                    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| format!("{:.0}", mark.value))
                })
                .show(ui, |plot_ui| {
                    plot_ui.line(line);
                    if let Some(target) = target {
                        plot_ui.line(target);
                    }
                    if let Some(trend) = trend {
                        plot_ui.line(trend);
                    }
                });
            ui.separator();
        }

        let mut weigh_ins: Vec<_> = self.logbook.weights_for(user_id).cloned().collect();
        weigh_ins.sort_by_key(|w| w.date);
        weigh_ins.reverse();
        egui_extras::TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(egui_extras::Column::auto())
            .column(egui_extras::Column::auto())
            .column(egui_extras::Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.label("Date");
                });
                header.col(|ui| {
                    ui.label("Weight");
                });
                header.col(|ui| {
                    ui.label("Notes");
                });
            })
            .body(|mut body| {
                for record in &weigh_ins {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(record.date.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1} kg", record.weight_kg));
                        });
                        row.col(|ui| {
                            ui.label(&record.notes);
                        });
                    });
                }
            });
    }

    fn calculator_window(&mut self, ui: &mut egui::Ui, now: Instant) {
        if let Some(user) = self.selected_user.and_then(|id| self.logbook.user(id)) {
            let (weight, height, age) = (user.weight_kg, user.height_cm, user.age);
            if ui.button("Use my profile").clicked() {
                self.calculator_form.weight = weight.to_string();
                self.calculator_form.height = height.to_string();
                self.calculator_form.age = age.to_string();
                self.calculator_debounce.trigger(now);
            }
        }
        let errors = self.calculator_form.validate().unwrap_or_default();
        egui::Grid::new("calculator_grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label(field_label(
                    "Weight (kg):",
                    &self.calculator_form.weight,
                    &errors.weight,
                ));
                let response = ui.text_edit_singleline(&mut self.calculator_form.weight);
                self.apply_focus(&response, "calculator", "weight");
                if response.changed() {
                    self.calculator_debounce.trigger(now);
                }
                ui.end_row();

                ui.label(field_label(
                    "Height (cm):",
                    &self.calculator_form.height,
                    &errors.height,
                ));
                let response = ui.text_edit_singleline(&mut self.calculator_form.height);
                self.apply_focus(&response, "calculator", "height");
                if response.changed() {
                    self.calculator_debounce.trigger(now);
                }
                ui.end_row();

                ui.label(field_label("Age:", &self.calculator_form.age, &errors.age));
                let response = ui.text_edit_singleline(&mut self.calculator_form.age);
                self.apply_focus(&response, "calculator", "age");
                if response.changed() {
                    self.calculator_debounce.trigger(now);
                }
                ui.end_row();

                ui.label("Gender:");
                let mut changed = false;
                egui::ComboBox::from_id_source("calculator_gender")
                    .selected_text(self.calculator_form.gender.label())
                    .show_ui(ui, |ui| {
                        for sex in [math::Sex::Male, math::Sex::Female] {
                            changed |= ui
                                .selectable_value(
                                    &mut self.calculator_form.gender,
                                    sex,
                                    sex.label(),
                                )
                                .changed();
                        }
                    });
                if changed {
                    self.calculator_debounce.trigger(now);
                }
                ui.end_row();

                ui.label("Activity level:");
                let mut changed = false;
                egui::ComboBox::from_id_source("calculator_level")
                    .selected_text(self.calculator_form.activity_level.label())
                    .show_ui(ui, |ui| {
                        for level in math::ALL_ACTIVITY_LEVELS {
                            changed |= ui
                                .selectable_value(
                                    &mut self.calculator_form.activity_level,
                                    level,
                                    level.label(),
                                )
                                .changed();
                        }
                    });
                if changed {
                    self.calculator_debounce.trigger(now);
                }
                ui.end_row();
            });

        if self.calculator_form.validate().is_some() {
            ui.label("Fill in weight, height and age for results.");
            return;
        }
        ui.separator();

        let weight = self.calculator_form.weight_kg();
        let height = self.calculator_form.height_cm();
        let age = self.calculator_form.age_years();
        let sex = self.calculator_form.gender;
        let bmi = math::bmi(weight, height);
        let category = math::bmi_category(bmi);
        ui.label(
            egui::RichText::new(format!("BMI {:.1} ({})", bmi, category.label()))
                .color(severity_color(category.severity())),
        );
        let bmr = math::bmr(weight, height, age, sex);
        let tdee = math::tdee(bmr, self.calculator_form.activity_level);
        ui.label(format!("BMR: {:.0} kcal/day", bmr));
        ui.label(format!("TDEE: {:.0} kcal/day", tdee));
        let (low, high) = math::ideal_weight_range(height);
        ui.label(format!("Ideal weight: {:.1} to {:.1} kg", low, high));
        let body_fat = math::body_fat_percentage(bmi, age, sex);
        ui.label(format!("Estimated body fat: {:.1}%", body_fat));
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Goal:");
            egui::ComboBox::from_id_source("calculator_goal")
                .selected_text(self.calc_goal.label())
                .show_ui(ui, |ui| {
                    for goal in math::ALL_GOALS {
                        ui.selectable_value(&mut self.calc_goal, goal, goal.label());
                    }
                });
            if self.calc_goal != math::Goal::Maintain {
                ui.label("kg per week:");
                ui.text_edit_singleline(&mut self.calc_rate);
            }
        });
        let rate = self.calc_rate.trim().parse::<f64>().unwrap_or(0.5);
        let daily = math::daily_calories_for_goal(tdee, self.calc_goal, rate);
        ui.label(format!("Daily target: {:.0} kcal", daily));

        let recommended = math::recommended_activities(category, self.calc_goal);
        if !recommended.is_empty() {
            ui.label("Suggested activities:");
            ui.horizontal_wrapped(|ui| {
                let mut picked = None;
                for key in recommended {
                    if ui.small_button(*key).clicked() {
                        picked = Some(*key);
                    }
                }
                if let Some(key) = picked {
                    self.activity_form.activity_name = key.to_owned();
                    self.activity_debounce.trigger(now);
                    self.tab = Tab::Activities;
                }
            });
        }
    }

    fn profile_window(&mut self, ui: &mut egui::Ui, now: Instant, today: NaiveDate) {
        let errors = self.profile_form.validate().unwrap_or_default();
        egui::Grid::new("profile_grid").num_columns(2).show(ui, |ui| {
            ui.label("Name:");
            let response = ui.text_edit_singleline(&mut self.profile_form.name);
            self.apply_focus(&response, "profile", "name");
            if response.changed() {
                self.profile_debounce.trigger(now);
            }
            ui.end_row();

            ui.label(field_label(
                "Height (cm):",
                &self.profile_form.height,
                &errors.height,
            ));
            let response = ui.text_edit_singleline(&mut self.profile_form.height);
            self.apply_focus(&response, "profile", "height");
            if response.changed() {
                self.profile_debounce.trigger(now);
            }
            ui.end_row();

            ui.label(field_label(
                "Weight (kg):",
                &self.profile_form.weight,
                &errors.weight,
            ));
            let response = ui.text_edit_singleline(&mut self.profile_form.weight);
            self.apply_focus(&response, "profile", "weight");
            if response.changed() {
                self.profile_debounce.trigger(now);
            }
            ui.end_row();

            ui.label(field_label("Age:", &self.profile_form.age, &errors.age));
            let response = ui.text_edit_singleline(&mut self.profile_form.age);
            self.apply_focus(&response, "profile", "age");
            if response.changed() {
                self.profile_debounce.trigger(now);
            }
            ui.end_row();

            ui.label(field_label(
                "Target weight (kg):",
                &self.profile_form.target_weight,
                &errors.target_weight,
            ));
            let response = ui.text_edit_singleline(&mut self.profile_form.target_weight);
            self.apply_focus(&response, "profile", "target_weight");
            if response.changed() {
                self.profile_debounce.trigger(now);
            }
            ui.end_row();
        });
        ui.horizontal(|ui| {
            let label = if self.editing_user.is_some() {
                "Save Changes"
            } else {
                "Create User"
            };
            if ui.button(label).clicked() {
                self.submit_profile(now, today);
            }
            if self.editing_user.is_some() && ui.button("Cancel").clicked() {
                self.cancel_edit();
            }
        });

        if self.logbook.users.is_empty() {
            return;
        }
        ui.separator();
        ui.label("Existing users:");
        let mut to_edit = None;
        let mut to_remove = None;
        for user in &self.logbook.users {
            ui.horizontal(|ui| {
                ui.label(&user.name);
                if ui.small_button("Edit").clicked() {
                    to_edit = Some(user.id);
                }
                if ui.small_button("Remove").clicked() {
                    to_remove = Some(user.id);
                }
            });
        }
        if let Some(id) = to_edit {
            self.start_edit_user(id);
        }
        if let Some(id) = to_remove {
            self.remove_user(id);
        }
    }

    fn show_toasts(&mut self, ctx: &egui::Context, now: Instant) {
        self.toasts.retain(|t| !t.expired(now));
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&toast.message)
                                .color(severity_color(toast.severity)),
                        );
                    });
                }
            });
    }
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(label);
            ui.label(egui::RichText::new(value).size(24.0).strong());
        });
    });
}

fn sparkline(ui: &mut egui::Ui, values: &[f64]) {
    let heights = plotting::normalized_heights(values);
    let width = ui.available_width().min(160.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 40.0), egui::Sense::hover());
    if heights.len() < 2 {
        return;
    }
    let step = rect.width() / (heights.len() - 1) as f32;
    let points: Vec<egui::Pos2> = heights
        .iter()
        .enumerate()
        .map(|(i, t)| {
            egui::pos2(
                rect.left() + i as f32 * step,
                rect.bottom() - *t as f32 * rect.height(),
            )
        })
        .collect();
    ui.painter().add(egui::Shape::line(
        points,
        egui::Stroke::new(1.5, ui.visuals().hyperlink_color),
    ));
}

impl App for FitLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();
        let today = Local::now().date_naive();

        if !self.first_frame_logged {
            info!(
                "First frame after {} ms",
                self.started_at.elapsed().as_millis()
            );
            self.first_frame_logged = true;
        }
        if !self.theme_applied {
            ctx.set_visuals(if self.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.theme_applied = true;
        }

        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S)) {
            self.submit_active_form(now, today);
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::N)) {
            match self.tab {
                Tab::Activities => self.focus_field = Some(("activity", "activity_name")),
                Tab::Weight => self.focus_field = Some(("weight", "weight")),
                Tab::Overview => {}
            }
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.show_settings = false;
            self.show_calculator = false;
            self.show_profile = false;
            self.show_about = false;
        }

        self.menu_bar(ctx, today);
        self.control_bar(ctx, now);
        if self.settings.show_side_panel {
            self.side_panel(ctx, now);
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Overview => self.overview_tab(ui, now),
            Tab::Activities => self.activities_tab(ui, now, today),
            Tab::Weight => self.weight_tab(ui, now, today),
        });

        if self.show_calculator {
            let mut open = self.show_calculator;
            egui::Window::new("Health Calculator")
                .open(&mut open)
                .vscroll(true)
                .show(ctx, |ui| self.calculator_window(ui, now));
            self.show_calculator = open;
        }

        if self.show_profile {
            let mut open = self.show_profile;
            egui::Window::new("Users")
                .open(&mut open)
                .vscroll(true)
                .show(ctx, |ui| self.profile_window(ui, now, today));
            self.show_profile = open && self.show_profile;
        }
        if !self.show_profile && self.editing_user.is_some() {
            // Closing the window abandons the edit.
            self.cancel_edit();
        }

        if self.show_settings {
            egui::Window::new("Settings")
                .open(&mut self.show_settings)
                .show(ctx, |ui| {
                    if ui
                        .checkbox(&mut self.settings.show_side_panel, "Show summary panel")
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                    if ui
                        .checkbox(&mut self.settings.animate_stats, "Animate statistics")
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                    if ui
                        .checkbox(&mut self.settings.autosave_drafts, "Autosave form drafts")
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                    if ui
                        .checkbox(
                            &mut self.settings.show_weight_trend,
                            "Show weight moving average",
                        )
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                    ui.horizontal(|ui| {
                        ui.label("MA window:");
                        let mut w = self.settings.ma_window.to_string();
                        if ui.text_edit_singleline(&mut w).changed() {
                            if let Ok(v) = w.parse::<usize>() {
                                self.settings.ma_window = v.max(1);
                                self.settings_dirty = true;
                            }
                        }
                    });
                });
        }

        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .resizable(true)
                .show(ctx, |ui| {
                    ui.heading("Fit Log Dashboard");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.separator();
                    ui.label("\u{2022} Ctrl+S submits the form in front.");
                    ui.label("\u{2022} Ctrl+N focuses the current form.");
                    ui.label("\u{2022} Esc closes open windows.");
                });
        }

        self.flush_drafts(now);
        self.show_toasts(ctx, now);

        // Idle frames must keep arriving while a quiet period, a toast or an
        // animation is running.
        let animating = self.settings.animate_stats
            && (self
                .stats_shown_at
                .is_some_and(|t| !animate::count_up_done(now.duration_since(t)))
                || self.progress_shown_at.is_some_and(|t| {
                    now.duration_since(t)
                        < Duration::from_millis(animate::FILL_DELAY_MS + animate::FILL_MS)
                }));
        if animating {
            ctx.request_repaint();
        } else if self.any_draft_pending() || !self.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
        if self.logbook_dirty {
            self.logbook.save();
            self.logbook_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Quiet periods still running at shutdown are flushed, not dropped.
        if self.activity_debounce.is_pending() {
            save_draft(&mut self.store, &self.activity_form);
        }
        if self.weight_debounce.is_pending() {
            save_draft(&mut self.store, &self.weight_form);
        }
        if self.profile_debounce.is_pending() && self.editing_user.is_none() {
            save_draft(&mut self.store, &self.profile_form);
        }
        if self.calculator_debounce.is_pending() {
            save_draft(&mut self.store, &self.calculator_form);
        }
        self.settings.save();
        self.logbook.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions::default();
    eframe::run_native(
        "Fit Log Dashboard",
        options,
        Box::new(|_cc| Box::new(FitLogApp::default())),
    )
}
