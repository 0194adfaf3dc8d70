//! Interactive state: the input form, the plan table and inline pace edits.
//!
//! Everything here is terminal-agnostic so the whole flow can be driven
//! headlessly with synthetic key events.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::config::Config;
use crate::editor::{PlanEditor, Totals};
use crate::pace::{format_mmss, parse_clock_field, target_seconds};
use crate::plan::{PlanBuilder, PlanRequest};
use crate::preset::DistancePreset;

/// How long a status message stays up, in ticks.
pub const MESSAGE_TICKS: u16 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Form,
    Table,
    EditingPace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FormField {
    #[strum(serialize = "Distance (km)")]
    Distance,
    #[strum(serialize = "Hours")]
    Hours,
    #[strum(serialize = "Minutes")]
    Minutes,
    #[strum(serialize = "Step (km)")]
    Step,
    #[strum(serialize = "Delta (s/km)")]
    Delta,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Distance,
        FormField::Hours,
        FormField::Minutes,
        FormField::Step,
        FormField::Delta,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn accepts(self, c: char) -> bool {
        match self {
            FormField::Hours | FormField::Minutes => c.is_ascii_digit(),
            FormField::Distance | FormField::Step => c.is_ascii_digit() || c == '.',
            FormField::Delta => c.is_ascii_digit() || c == '.' || c == '-',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    ticks_left: u16,
}

impl Message {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            ticks_left: MESSAGE_TICKS,
        }
    }
}

/// Raw text of the input form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormInput {
    pub distance: String,
    pub preset: Option<DistancePreset>,
    pub hours: String,
    pub minutes: String,
    pub step: String,
    pub delta: String,
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

impl FormInput {
    pub fn from_config(cfg: &Config) -> Self {
        let mut form = Self {
            step: format_number(cfg.step_distance),
            delta: format_number(cfg.pace_delta),
            ..Self::default()
        };
        if let Some(preset) = cfg.default_preset {
            form.select_preset(preset);
        }
        form
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Distance => &self.distance,
            FormField::Hours => &self.hours,
            FormField::Minutes => &self.minutes,
            FormField::Step => &self.step,
            FormField::Delta => &self.delta,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Distance => &mut self.distance,
            FormField::Hours => &mut self.hours,
            FormField::Minutes => &mut self.minutes,
            FormField::Step => &mut self.step,
            FormField::Delta => &mut self.delta,
        }
    }

    pub fn set_distance(&mut self, km: f64) {
        self.distance = format_number(km);
        self.preset = None;
    }

    /// Fills the distance from a preset.
    pub fn select_preset(&mut self, preset: DistancePreset) {
        self.distance = format_number(preset.km());
        self.preset = Some(preset);
    }

    pub fn set_target(&mut self, hours: u32, minutes: u32) {
        self.hours = hours.to_string();
        self.minutes = minutes.to_string();
    }

    /// Converts the text into numbers. Text that does not parse turns into
    /// values the plan builder rejects with the matching error: a bad
    /// distance reads as 0 km, a bad time as NaN seconds. A blank delta
    /// means no progression.
    pub fn to_request(&self) -> PlanRequest {
        let distance = self.distance.trim().parse::<f64>().unwrap_or(0.0);
        let target_time = match (
            parse_clock_field(&self.hours),
            parse_clock_field(&self.minutes),
        ) {
            (Some(h), Some(m)) => target_seconds(h, m),
            _ => f64::NAN,
        };
        let step_distance = self.step.trim().parse::<f64>().unwrap_or(f64::NAN);
        let pace_delta = if self.delta.trim().is_empty() {
            0.0
        } else {
            self.delta.trim().parse::<f64>().unwrap_or(f64::NAN)
        };

        PlanRequest {
            distance,
            target_time,
            step_distance,
            pace_delta,
        }
    }

    /// Whether the form holds enough to attempt a build without prompting.
    pub fn is_filled(&self) -> bool {
        !self.distance.trim().is_empty()
            && !(self.hours.trim().is_empty() && self.minutes.trim().is_empty())
    }
}

#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub form: FormInput,
    pub focus: FormField,
    pub editor: PlanEditor,
    pub selected: usize,
    pub edit_buffer: String,
    /// Rows whose last edit attempt was rejected.
    pub invalid_rows: HashSet<usize>,
    /// Totals as of the last build or explicit recompute.
    pub shown_totals: Option<Totals>,
    pub message: Option<Message>,
    defaults: Config,
}

impl App {
    pub fn new(defaults: Config, form: FormInput) -> Self {
        Self {
            state: AppState::Form,
            form,
            focus: FormField::Distance,
            editor: PlanEditor::with_drift_threshold(defaults.drift_threshold_secs),
            selected: 0,
            edit_buffer: String::new(),
            invalid_rows: HashSet::new(),
            shown_totals: None,
            message: None,
            defaults,
        }
    }

    pub fn flash(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(Message::new(kind, text));
    }

    /// Builds a plan from the form. Failures keep the previous plan.
    pub fn calculate(&mut self) {
        let request = self.form.to_request();
        match PlanBuilder::from(request).build() {
            Ok(plan) => {
                let advisory = plan.advisory();
                info!(
                    distance = request.distance,
                    target_time = request.target_time,
                    segments = plan.segments().len(),
                    "plan calculated"
                );
                self.editor.load(plan);
                self.shown_totals = self.editor.recompute_totals();
                self.selected = 0;
                self.invalid_rows.clear();
                self.state = AppState::Table;
                match advisory {
                    Some(adv) => self.flash(MessageKind::Warning, adv.to_string()),
                    None => self.flash(MessageKind::Info, "Plan optimized"),
                }
            }
            Err(e) => {
                debug!(error = %e, "plan rejected");
                self.flash(MessageKind::Error, e.to_string());
            }
        }
    }

    /// Back to a blank form with the configured defaults; drops the plan.
    pub fn reset(&mut self) {
        self.form = FormInput::from_config(&self.defaults);
        self.focus = FormField::Distance;
        self.editor.clear();
        self.shown_totals = None;
        self.selected = 0;
        self.edit_buffer.clear();
        self.invalid_rows.clear();
        self.message = None;
        self.state = AppState::Form;
    }

    pub fn recompute(&mut self) {
        if let Some(totals) = self.editor.recompute_totals() {
            self.shown_totals = Some(totals);
            if totals.drift_exceeded {
                self.flash(
                    MessageKind::Warning,
                    format!(
                        "Estimated finish is {} {} the target",
                        format_mmss(totals.drift.abs()),
                        if totals.drift > 0.0 { "behind" } else { "ahead of" }
                    ),
                );
            } else {
                self.flash(MessageKind::Info, "Totals recomputed");
            }
        }
    }

    pub fn begin_edit(&mut self) {
        if let Some(seg) = self.editor.segments().get(self.selected) {
            self.edit_buffer = format_mmss(seg.pace);
            self.state = AppState::EditingPace;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.invalid_rows.remove(&self.selected);
        self.edit_buffer.clear();
        self.state = AppState::Table;
    }

    pub fn commit_edit(&mut self) {
        let index = self.selected;
        match self.editor.set_segment_pace(index, &self.edit_buffer) {
            Ok(()) => {
                self.invalid_rows.remove(&index);
                self.flash(
                    MessageKind::Info,
                    format!("Segment {} set to {}/km", index + 1, self.edit_buffer.trim()),
                );
                self.edit_buffer.clear();
                self.state = AppState::Table;
                self.select_next();
            }
            Err(e) => {
                self.invalid_rows.insert(index);
                self.flash(MessageKind::Error, e.to_string());
            }
        }
    }

    fn select_next(&mut self) {
        let len = self.editor.segments().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn on_tick(&mut self) {
        if let Some(msg) = self.message.as_mut() {
            msg.ticks_left = msg.ticks_left.saturating_sub(1);
            if msg.ticks_left == 0 {
                self.message = None;
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        match self.state {
            AppState::Form => self.on_form_key(key),
            AppState::Table => self.on_table_key(key),
            AppState::EditingPace => {
                match key.code {
                    KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => self.edit_buffer.push(c),
                    KeyCode::Backspace => {
                        self.edit_buffer.pop();
                    }
                    KeyCode::Enter => self.commit_edit(),
                    KeyCode::Esc => self.cancel_edit(),
                    _ => {}
                }
                AppAction::Continue
            }
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Enter => self.calculate(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Backspace => {
                self.form.field_mut(self.focus).pop();
                if self.focus == FormField::Distance {
                    self.form.preset = None;
                }
            }
            KeyCode::Char(c) if self.focus.accepts(c) => {
                self.form.field_mut(self.focus).push(c);
                if self.focus == FormField::Distance {
                    self.form.preset = None;
                }
            }
            KeyCode::Char('p') => {
                let preset = DistancePreset::cycle(self.form.preset);
                self.form.select_preset(preset);
            }
            KeyCode::Char('x') => self.reset(),
            KeyCode::Char('t') if self.editor.plan().is_some() => self.state = AppState::Table,
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn on_table_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.editor.segments().len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('r') => self.recompute(),
            KeyCode::Tab | KeyCode::Char('f') => self.state = AppState::Form,
            KeyCode::Char('x') => self.reset(),
            _ => {}
        }
        AppAction::Continue
    }
}
