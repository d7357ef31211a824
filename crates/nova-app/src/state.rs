// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ActionError, Entity, FieldSpec, FormKind, FormValues, Operation, ReportKind, ReportOutcome,
    ResultSet, ResultViewer,
};

pub const NO_CONTRACT_MESSAGE: &str =
    "No contract exists between this pharmacy and pharmaceutical company";

/// Editable text for an ordered list of fields, with one focused input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInputs {
    fields: &'static [FieldSpec],
    values: Vec<String>,
    focus: usize,
}

impl FieldInputs {
    pub fn new(fields: &'static [FieldSpec]) -> Self {
        Self {
            fields,
            values: vec![String::new(); fields.len()],
            focus: 0,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map_or("", String::as_str)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.fields.get(self.focus)
    }

    pub fn move_focus(&mut self, delta: isize) {
        if self.fields.is_empty() {
            return;
        }
        let len = self.fields.len() as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(len) as usize;
    }

    pub fn insert_char(&mut self, ch: char) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.pop();
        }
    }

    /// Newline in a multi-line field, next field otherwise.
    pub fn enter(&mut self) {
        if self.focused_field().is_some_and(|field| field.multiline) {
            self.insert_char('\n');
        } else {
            self.move_focus(1);
        }
    }

    pub fn collect(&self) -> FormValues {
        self.fields
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.key, value.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub inputs: FieldInputs,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            inputs: FieldInputs::new(kind.fields()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDialog {
    pub kind: ReportKind,
    pub inputs: FieldInputs,
}

impl ReportDialog {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            inputs: FieldInputs::new(kind.params()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A modal message; the next key press dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn from_error(error: &ActionError) -> Self {
        Self::error(error.title(), format!("{error:#}"))
    }

    /// Reports always fail under the plain "Error" title.
    pub fn report_failed(error: &ActionError) -> Self {
        match error {
            ActionError::Validation(message) => Self::error("Error", message.clone()),
            other => Self::error("Error", format!("An error occurred: {other:#}")),
        }
    }

    pub fn submitted(kind: FormKind) -> Self {
        Self::info(
            "Success",
            format!(
                "{} operation on {} completed successfully!",
                kind.operation().label(),
                kind.entity().label()
            ),
        )
    }

    pub fn connected() -> Self {
        Self::info("Connection", "Successfully connected to the database!")
    }

    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::error("Database Connection Error", message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub operation: Operation,
    pub entity: Entity,
    pub form: Option<FormState>,
    pub report: Option<ReportDialog>,
    pub results: ResultViewer,
    pub results_visible: bool,
    pub notice: Option<Notice>,
    pub connection: ConnectionStatus,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            operation: Operation::Add,
            entity: Entity::Patient,
            form: None,
            report: None,
            results: ResultViewer::Empty,
            results_visible: false,
            notice: None,
            connection: ConnectionStatus::Disconnected,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    NextOperation,
    PrevOperation,
    NextEntity,
    PrevEntity,
    GenerateForm,
    ClearForm,
    OpenReport(ReportKind),
    CloseReport,
    FocusNext,
    FocusPrev,
    InsertChar(char),
    Backspace,
    Enter,
    SubmissionSucceeded(FormKind),
    ReportFinished(ReportOutcome),
    ShowResults,
    HideResults,
    ShowNotice(Notice),
    DismissNotice,
    SetConnection(ConnectionStatus),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SelectionChanged(Operation, Entity),
    FormOpened(FormKind),
    FormCleared,
    ReportOpened(ReportKind),
    ReportClosed,
    InputChanged,
    ResultsAvailability(bool),
    ResultsVisibility(bool),
    NoticeShown(Notice),
    NoticeDismissed,
    ConnectionChanged(ConnectionStatus),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextOperation => self.select(self.operation.rotate(1), self.entity),
            AppCommand::PrevOperation => self.select(self.operation.rotate(-1), self.entity),
            AppCommand::NextEntity => self.select(self.operation, self.entity.rotate(1)),
            AppCommand::PrevEntity => self.select(self.operation, self.entity.rotate(-1)),
            AppCommand::GenerateForm => self.generate_form(),
            AppCommand::ClearForm => self.clear_form(),
            AppCommand::OpenReport(kind) => {
                self.report = Some(ReportDialog::new(kind));
                vec![AppEvent::ReportOpened(kind)]
            }
            AppCommand::CloseReport => {
                if self.report.take().is_some() {
                    vec![AppEvent::ReportClosed]
                } else {
                    Vec::new()
                }
            }
            AppCommand::FocusNext => self.edit(|inputs| inputs.move_focus(1)),
            AppCommand::FocusPrev => self.edit(|inputs| inputs.move_focus(-1)),
            AppCommand::InsertChar(ch) => self.edit(|inputs| inputs.insert_char(ch)),
            AppCommand::Backspace => self.edit(FieldInputs::backspace),
            AppCommand::Enter => self.edit(FieldInputs::enter),
            AppCommand::SubmissionSucceeded(kind) => {
                let mut events = self.clear_form();
                events.extend(self.show_notice(Notice::submitted(kind)));
                events
            }
            AppCommand::ReportFinished(outcome) => self.finish_report(outcome),
            AppCommand::ShowResults => {
                if self.results.is_enabled() {
                    self.results_visible = true;
                    vec![AppEvent::ResultsVisibility(true)]
                } else {
                    vec![self.set_status("no results yet -- run a report first")]
                }
            }
            AppCommand::HideResults => {
                self.results_visible = false;
                vec![AppEvent::ResultsVisibility(false)]
            }
            AppCommand::ShowNotice(notice) => self.show_notice(notice),
            AppCommand::DismissNotice => {
                if self.notice.take().is_some() {
                    vec![AppEvent::NoticeDismissed]
                } else {
                    Vec::new()
                }
            }
            AppCommand::SetConnection(status) => {
                self.connection = status.clone();
                vec![AppEvent::ConnectionChanged(status)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// The form kind behind the current selectors, if the pair is supported.
    pub fn selected_form(&self) -> Option<FormKind> {
        FormKind::for_selection(self.operation, self.entity)
    }

    /// Inputs that receive typing: the report dialog when open, else the form.
    pub fn active_inputs(&self) -> Option<&FieldInputs> {
        match (&self.report, &self.form) {
            (Some(dialog), _) => Some(&dialog.inputs),
            (None, Some(form)) => Some(&form.inputs),
            (None, None) => None,
        }
    }

    fn active_inputs_mut(&mut self) -> Option<&mut FieldInputs> {
        match (&mut self.report, &mut self.form) {
            (Some(dialog), _) => Some(&mut dialog.inputs),
            (None, Some(form)) => Some(&mut form.inputs),
            (None, None) => None,
        }
    }

    fn select(&mut self, operation: Operation, entity: Entity) -> Vec<AppEvent> {
        self.operation = operation;
        self.entity = entity;
        let mut events = vec![AppEvent::SelectionChanged(operation, entity)];
        if self.form.take().is_some() {
            events.push(AppEvent::FormCleared);
        }
        events
    }

    fn generate_form(&mut self) -> Vec<AppEvent> {
        match self.selected_form() {
            Some(kind) => {
                self.form = Some(FormState::new(kind));
                vec![AppEvent::FormOpened(kind)]
            }
            None => {
                let mut events = self.clear_form();
                let message = format!(
                    "{} has no {} form",
                    self.entity.label(),
                    self.operation.label()
                );
                events.push(self.set_status(&message));
                events
            }
        }
    }

    fn clear_form(&mut self) -> Vec<AppEvent> {
        if self.form.take().is_some() {
            vec![AppEvent::FormCleared]
        } else {
            Vec::new()
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut FieldInputs)) -> Vec<AppEvent> {
        match self.active_inputs_mut() {
            Some(inputs) => {
                apply(inputs);
                vec![AppEvent::InputChanged]
            }
            None => Vec::new(),
        }
    }

    fn finish_report(&mut self, outcome: ReportOutcome) -> Vec<AppEvent> {
        match outcome {
            ReportOutcome::ResultSets(sets) => {
                let mut events = Vec::new();
                if self.report.take().is_some() {
                    events.push(AppEvent::ReportClosed);
                }
                if sets.is_empty() {
                    events.push(self.set_status("report returned no result sets"));
                    return events;
                }
                let rows = sets.iter().map(ResultSet::row_count).sum::<usize>();
                for set in sets {
                    self.results.receive(set);
                }
                events.push(AppEvent::ResultsAvailability(self.results.is_enabled()));
                events.push(self.set_status(&format!("report returned {rows} row(s)")));
                events
            }
            ReportOutcome::NoContract => {
                self.show_notice(Notice::info("Information", NO_CONTRACT_MESSAGE))
            }
        }
    }

    fn show_notice(&mut self, notice: Notice) -> Vec<AppEvent> {
        self.notice = Some(notice.clone());
        vec![AppEvent::NoticeShown(notice)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
