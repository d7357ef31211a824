// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use nova_app::{
    ActionError, AppCommand, AppEvent, AppState, ConnectionStatus, DEFAULT_COLUMN_WIDTH,
    FieldInputs, Notice, NoticeLevel, ReportKind, ReportOutcome, ReportRequest, Submission,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

const RESULTS_PAGE_LINES: isize = 10;

/// Store access the screen needs. Implemented over the database in the binary
/// and by an in-memory double in tests.
pub trait AppRuntime {
    fn submit(&mut self, submission: &Submission) -> Result<(), ActionError>;
    fn run_report(&mut self, request: &ReportRequest) -> Result<ReportOutcome, ActionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub column_width: usize,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    options: UiOptions,
    results_scroll: u16,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        options,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match pump_event(
            state,
            runtime,
            &mut view_data,
            &internal_tx,
            event::poll,
            event::read,
        ) {
            Ok(false) => {}
            Ok(true) => break,
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Waits briefly for one terminal event and handles it. Returns true when the
/// app should quit. Errors come back as values so the caller can restore the terminal.
fn pump_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    poll: impl FnOnce(Duration) -> io::Result<bool>,
    read: impl FnOnce() -> io::Result<Event>,
) -> Result<bool> {
    if !poll(Duration::from_millis(120)).context("poll event")? {
        return Ok(false);
    }
    match read().context("read event")? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key_event(
            state,
            runtime,
            view_data,
            internal_tx,
            key,
        )),
        _ => Ok(false),
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// Dispatches a command and arms the status timer when it produced a status line.
fn dispatch(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch(
        state,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

fn is_ctrl(key: KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

/// Returns true when the app should quit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if is_ctrl(key, 'q') {
        return true;
    }

    // A notice swallows the key that dismisses it.
    if state.notice.is_some() {
        state.dispatch(AppCommand::DismissNotice);
        return false;
    }

    if state.results_visible {
        handle_results_key(state, view_data, key);
    } else if state.report.is_some() {
        handle_report_key(state, runtime, view_data, internal_tx, key);
    } else if state.form.is_some() {
        handle_form_key(state, runtime, view_data, internal_tx, key);
    } else {
        handle_nav_key(state, view_data, internal_tx, key);
    }
    false
}

fn handle_nav_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Char('o') => AppCommand::NextOperation,
        KeyCode::Char('O') => AppCommand::PrevOperation,
        KeyCode::Char('t') => AppCommand::NextEntity,
        KeyCode::Char('T') => AppCommand::PrevEntity,
        KeyCode::Char('g') | KeyCode::Enter => AppCommand::GenerateForm,
        KeyCode::Char('r') => {
            view_data.results_scroll = 0;
            AppCommand::ShowResults
        }
        _ => match report_hotkey(key, true) {
            Some(kind) => AppCommand::OpenReport(kind),
            None => return,
        },
    };
    dispatch(state, view_data, internal_tx, command);
}

/// F1-F7 and alt+1-7 open a report from anywhere; bare digits only when no form
/// is taking text.
fn report_hotkey(key: KeyEvent, bare_digits: bool) -> Option<ReportKind> {
    let number = match key.code {
        KeyCode::F(number) => usize::from(number),
        KeyCode::Char(ch) if bare_digits || key.modifiers.contains(KeyModifiers::ALT) => {
            ch.to_digit(10)? as usize
        }
        _ => return None,
    };
    ReportKind::from_hotkey(number)
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if is_ctrl(key, 's') {
        submit_form(state, runtime, view_data, internal_tx);
        return;
    }
    if let Some(kind) = report_hotkey(key, false) {
        dispatch(state, view_data, internal_tx, AppCommand::OpenReport(kind));
        return;
    }
    if key.code == KeyCode::Esc {
        dispatch(state, view_data, internal_tx, AppCommand::ClearForm);
        emit_status(state, view_data, internal_tx, "form cleared");
        return;
    }
    handle_input_key(state, view_data, internal_tx, key);
}

fn handle_report_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if is_ctrl(key, 's') {
        run_report(state, runtime, view_data, internal_tx);
        return;
    }
    if key.code == KeyCode::Esc {
        dispatch(state, view_data, internal_tx, AppCommand::CloseReport);
        return;
    }
    handle_input_key(state, view_data, internal_tx, key);
}

/// Focus and editing keys shared by the form and the report dialog.
fn handle_input_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Tab | KeyCode::Down => AppCommand::FocusNext,
        KeyCode::BackTab | KeyCode::Up => AppCommand::FocusPrev,
        KeyCode::Enter => AppCommand::Enter,
        KeyCode::Backspace => AppCommand::Backspace,
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            AppCommand::InsertChar(ch)
        }
        _ => return,
    };
    dispatch(state, view_data, internal_tx, command);
}

fn handle_results_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('r') => {
            state.dispatch(AppCommand::HideResults);
            view_data.results_scroll = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => scroll_results(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => scroll_results(state, view_data, -1),
        KeyCode::PageDown => scroll_results(state, view_data, RESULTS_PAGE_LINES),
        KeyCode::PageUp => scroll_results(state, view_data, -RESULTS_PAGE_LINES),
        KeyCode::Home => view_data.results_scroll = 0,
        _ => {}
    }
}

fn scroll_results(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let last_line = results_text(state, view_data)
        .lines()
        .count()
        .saturating_sub(1);
    let next = (view_data.results_scroll as isize + delta).clamp(0, last_line as isize);
    view_data.results_scroll = u16::try_from(next).unwrap_or(u16::MAX);
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = state.form.as_ref() else {
        return;
    };
    let kind = form.kind;
    let values = form.inputs.collect();

    let command = match Submission::parse(kind, &values)
        .and_then(|submission| runtime.submit(&submission))
    {
        Ok(()) => AppCommand::SubmissionSucceeded(kind),
        Err(error) => {
            debug!(form = %kind.title(), error = %error, "submission rejected");
            AppCommand::ShowNotice(Notice::from_error(&error))
        }
    };
    dispatch(state, view_data, internal_tx, command);
}

fn run_report<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(dialog) = state.report.as_ref() else {
        return;
    };
    let kind = dialog.kind;
    let values = dialog.inputs.collect();

    let command = match ReportRequest::parse(kind, &values)
        .and_then(|request| runtime.run_report(&request))
    {
        Ok(outcome) => {
            view_data.results_scroll = 0;
            AppCommand::ReportFinished(outcome)
        }
        Err(error) => {
            debug!(report = kind.label(), error = %error, "report rejected");
            AppCommand::ShowNotice(Notice::report_failed(&error))
        }
    };
    dispatch(state, view_data, internal_tx, command);
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().title("nova").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(1)])
        .split(layout[1]);

    let reports = Paragraph::new(reports_text())
        .block(Block::default().title("reports").borders(Borders::ALL));
    frame.render_widget(reports, body[0]);

    let form = Paragraph::new(form_text(state))
        .wrap(Wrap { trim: false })
        .block(Block::default().title(form_title(state)).borders(Borders::ALL));
    frame.render_widget(form, body[1]);

    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(dialog) = &state.report {
        let area = centered_rect(60, 45, frame.area());
        frame.render_widget(Clear, area);
        let text = format!(
            "{}\n\nctrl+s {} | esc cancel",
            inputs_text(&dialog.inputs),
            dialog.kind.action_label().to_lowercase()
        );
        let widget = Paragraph::new(text).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(dialog.kind.label())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(widget, area);
    }

    if state.results_visible {
        let area = centered_rect(90, 80, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(results_text(state, view_data))
            .scroll((view_data.results_scroll, 0))
            .block(
                Block::default()
                    .title("results")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            );
        frame.render_widget(widget, area);
    }

    if let Some(notice) = &state.notice {
        let area = centered_rect(50, 30, frame.area());
        frame.render_widget(Clear, area);
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Error => Color::Red,
        };
        let widget = Paragraph::new(format!("{}\n\npress any key", notice.message))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(notice.title.as_str())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            );
        frame.render_widget(widget, area);
    }
}

fn header_text(state: &AppState) -> String {
    let results = if state.results.is_enabled() {
        "available [r]"
    } else {
        "empty"
    };
    let connection = match state.connection {
        ConnectionStatus::Connected => "connected",
        ConnectionStatus::Disconnected => "disconnected",
    };
    format!(
        "operation: {} [o/O]   entity: {} [t/T]   results: {results}   db: {connection}",
        state.operation.label(),
        state.entity.label()
    )
}

fn reports_text() -> String {
    ReportKind::ALL
        .iter()
        .map(|kind| format!("{}  {}", kind.hotkey(), kind.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn form_title(state: &AppState) -> String {
    match &state.form {
        Some(form) => form.kind.title(),
        None => "form".to_owned(),
    }
}

fn form_text(state: &AppState) -> String {
    if let Some(form) = &state.form {
        return inputs_text(&form.inputs);
    }
    match state.selected_form() {
        Some(kind) => format!("press g to open the {} form", kind.title()),
        None => format!(
            "{} has no {} form",
            state.entity.label(),
            state.operation.label()
        ),
    }
}

/// One line per field; continuation lines of multi-line values are indented.
fn inputs_text(inputs: &FieldInputs) -> String {
    let mut lines = Vec::new();
    for (index, field) in inputs.fields().iter().enumerate() {
        let focused = index == inputs.focus();
        let marker = if focused { '>' } else { ' ' };
        let mut value = inputs.value(index).to_owned();
        if focused {
            value.push('_');
        }
        let mut parts = value.split('\n');
        lines.push(format!(
            "{marker} {} {}",
            field.label,
            parts.next().unwrap_or_default()
        ));
        lines.extend(parts.map(|part| format!("    {part}")));
    }
    lines.join("\n")
}

fn results_text(state: &AppState, view_data: &ViewData) -> String {
    state
        .results
        .render(view_data.options.column_width)
        .unwrap_or_default()
}

fn status_text(state: &AppState) -> String {
    let (mode, hints) = if state.notice.is_some() {
        ("NOTICE", "any key dismiss")
    } else if state.results_visible {
        ("RESULTS", "j/k pgup/pgdn scroll | esc close")
    } else if state.report.is_some() {
        ("REPORT", "tab/shift+tab field | ctrl+s run | esc cancel")
    } else if state.form.is_some() {
        (
            "FORM",
            "tab/shift+tab field | enter next | ctrl+s submit | F1-F7 report | esc clear",
        )
    } else {
        (
            "NAV",
            "o/O operation | t/T entity | g form | 1-7 report | r results | ctrl+q quit",
        )
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, InternalEvent, UiOptions, ViewData, emit_status, form_text, handle_key_event,
        inputs_text, pump_event, render, status_text,
    };
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use nova_app::{
        ActionError, AppState, Entity, FieldInputs, FormKind, FormValues, NO_CONTRACT_MESSAGE,
        NoticeLevel, Operation, ReportKind, ReportOutcome, ReportRequest, Submission,
    };
    use nova_testkit::{PharmacyFaker, contract_result, stock_result};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::io;
    use std::sync::mpsc;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct TestRuntime {
        submissions: Vec<Submission>,
        reports: Vec<ReportRequest>,
        submit_error: Option<String>,
        report_error: Option<String>,
        report_outcome: Option<ReportOutcome>,
    }

    impl AppRuntime for TestRuntime {
        fn submit(&mut self, submission: &Submission) -> Result<(), ActionError> {
            self.submissions.push(submission.clone());
            match &self.submit_error {
                Some(message) => Err(ActionError::Database(message.clone())),
                None => Ok(()),
            }
        }

        fn run_report(&mut self, request: &ReportRequest) -> Result<ReportOutcome, ActionError> {
            self.reports.push(request.clone());
            if let Some(message) = &self.report_error {
                return Err(ActionError::Database(message.clone()));
            }
            Ok(self
                .report_outcome
                .clone()
                .unwrap_or_else(|| ReportOutcome::ResultSets(vec![stock_result()])))
        }
    }

    fn view_data_for_test() -> ViewData {
        ViewData {
            options: UiOptions::default(),
            ..ViewData::default()
        }
    }

    fn internal_tx() -> mpsc::Sender<InternalEvent> {
        let (tx, _rx) = mpsc::channel();
        tx
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn press(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        event: KeyEvent,
    ) -> bool {
        handle_key_event(state, runtime, view_data, &internal_tx(), event)
    }

    fn type_text(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        text: &str,
    ) {
        for ch in text.chars() {
            let event = if ch == '\n' {
                key(KeyCode::Enter)
            } else {
                key(KeyCode::Char(ch))
            };
            press(state, runtime, view_data, event);
        }
    }

    /// Types every value in field order, tabbing between fields.
    fn fill_active_inputs(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        values: &FormValues,
    ) {
        let fields = state
            .active_inputs()
            .map(FieldInputs::fields)
            .unwrap_or_default();
        for field in fields {
            type_text(state, runtime, view_data, values.get(field.key));
            press(state, runtime, view_data, key(KeyCode::Tab));
        }
    }

    #[test]
    fn ctrl_q_quits_from_any_mode() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        assert!(press(&mut state, &mut runtime, &mut view_data, ctrl('q')));

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        assert!(state.form.is_some());
        assert!(press(&mut state, &mut runtime, &mut view_data, ctrl('q')));
    }

    #[test]
    fn selector_keys_rotate_operation_and_entity() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('o')));
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('t')));
        assert_eq!(state.operation, Operation::Delete);
        assert_eq!(state.entity, Entity::Doctor);

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('O')));
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('T')));
        assert_eq!(state.operation, Operation::Add);
        assert_eq!(state.entity, Entity::Patient);
    }

    #[test]
    fn update_drug_has_no_form() {
        let mut state = AppState {
            operation: Operation::Update,
            entity: Entity::Drug,
            ..AppState::default()
        };
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));

        assert!(state.form.is_none());
        assert_eq!(state.status_line.as_deref(), Some("Drug has no Update form"));
        assert_eq!(form_text(&state), "Drug has no Update form");
        assert_eq!(view_data.status_token, 1);
    }

    #[test]
    fn typing_goes_to_the_focused_field_and_tab_moves_focus() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        type_text(&mut state, &mut runtime, &mut view_data, "P-1o");
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Backspace));
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Tab));
        type_text(&mut state, &mut runtime, &mut view_data, "Asha");

        let form = state.form.as_ref().expect("form open");
        assert_eq!(form.inputs.value(0), "P-1");
        assert_eq!(form.inputs.value(1), "Asha");
        assert_eq!(form.inputs.focus(), 1);
        assert_eq!(state.operation, Operation::Add, "typing must not rotate");

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::BackTab));
        assert_eq!(state.form.as_ref().map(|form| form.inputs.focus()), Some(0));
    }

    #[test]
    fn enter_adds_a_newline_only_in_multiline_fields() {
        let mut state = AppState {
            operation: Operation::Add,
            entity: Entity::Contract,
            ..AppState::default()
        };
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Enter));
        assert_eq!(state.form.as_ref().map(|form| form.inputs.focus()), Some(1));

        let content = FormKind::AddContract
            .fields()
            .iter()
            .position(|field| field.multiline)
            .expect("contract content field");
        while state.form.as_ref().map(|form| form.inputs.focus()) != Some(content) {
            press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Tab));
        }
        type_text(&mut state, &mut runtime, &mut view_data, "line one\nline two");

        let form = state.form.as_ref().expect("form open");
        assert_eq!(form.inputs.focus(), content);
        assert_eq!(form.inputs.value(content), "line one\nline two");
    }

    #[test]
    fn blank_submit_shows_validation_notice_and_skips_the_store() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        let notice = state.notice.clone().expect("validation notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Error");
        assert!(notice.message.starts_with("Patient ID (Aadhar) is required"));
        assert!(runtime.submissions.is_empty());
        assert!(state.form.is_some());

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('x')));
        assert!(state.notice.is_none());
        assert_eq!(
            state.form.as_ref().map(|form| form.inputs.value(0)),
            Some(""),
            "the dismissing key is swallowed"
        );
    }

    #[test]
    fn successful_submit_clears_the_form_and_confirms() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();
        let values = PharmacyFaker::new(3).form_values(FormKind::AddPatient);

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        fill_active_inputs(&mut state, &mut runtime, &mut view_data, &values);
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        assert_eq!(runtime.submissions.len(), 1);
        assert_eq!(runtime.submissions[0].kind(), FormKind::AddPatient);
        assert!(state.form.is_none());
        let notice = state.notice.clone().expect("success notice");
        assert_eq!(notice.title, "Success");
        assert_eq!(
            notice.message,
            "Add operation on Patient completed successfully!"
        );
    }

    #[test]
    fn store_error_keeps_the_form_and_shows_the_message() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime {
            submit_error: Some("1062 (23000): Duplicate entry 'P-1'".to_owned()),
            ..TestRuntime::default()
        };
        let mut view_data = view_data_for_test();
        let values = PharmacyFaker::new(4).form_values(FormKind::AddPatient);

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        fill_active_inputs(&mut state, &mut runtime, &mut view_data, &values);
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        let notice = state.notice.clone().expect("error notice");
        assert_eq!(notice.title, "Database Error");
        assert_eq!(notice.message, "1062 (23000): Duplicate entry 'P-1'");
        let form = state.form.as_ref().expect("form kept");
        assert_eq!(form.inputs.value(0), values.get("p_id"));
    }

    #[test]
    fn non_numeric_age_aborts_before_the_store_and_keeps_input() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();
        let mut values = PharmacyFaker::new(6).form_values(FormKind::AddPatient);
        values.insert("p_age", "forty");

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        fill_active_inputs(&mut state, &mut runtime, &mut view_data, &values);
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        assert!(runtime.submissions.is_empty());
        let notice = state.notice.clone().expect("validation notice");
        assert_eq!(notice.title, "Error");
        assert!(notice.message.contains("forty"), "{}", notice.message);
        let form = state.form.as_ref().expect("form kept");
        assert_eq!(form.inputs.collect(), values);
    }

    #[test]
    fn esc_clears_the_form() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        type_text(&mut state, &mut runtime, &mut view_data, "P-9");
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Esc));

        assert!(state.form.is_none());
        assert_eq!(state.status_line.as_deref(), Some("form cleared"));
    }

    #[test]
    fn report_hotkey_runs_the_report_and_fills_the_viewer() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('4')));
        assert_eq!(
            state.report.as_ref().map(|dialog| dialog.kind),
            Some(ReportKind::PharmacyStock)
        );
        type_text(&mut state, &mut runtime, &mut view_data, "5 Park Street");
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        assert_eq!(
            runtime.reports,
            vec![ReportRequest::PharmacyStock {
                pharmacy_address: "5 Park Street".to_owned(),
            }]
        );
        assert!(state.report.is_none());
        assert!(state.results.is_enabled());
        assert_eq!(state.status_line.as_deref(), Some("report returned 3 row(s)"));

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('r')));
        assert!(state.results_visible);
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Esc));
        assert!(!state.results_visible);
    }

    #[test]
    fn report_hotkeys_from_a_form_keep_its_input() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        type_text(&mut state, &mut runtime, &mut view_data, "P-1");
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::F(3)));
        assert_eq!(
            state.report.as_ref().map(|dialog| dialog.kind),
            Some(ReportKind::CompanyDrugs)
        );

        type_text(&mut state, &mut runtime, &mut view_data, "Cipla");
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));
        assert_eq!(
            runtime.reports,
            vec![ReportRequest::CompanyDrugs {
                company_name: "Cipla".to_owned(),
            }]
        );
        assert!(state.report.is_none());
        let form = state.form.as_ref().expect("form kept");
        assert_eq!(form.inputs.value(0), "P-1");

        let alt_one = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::ALT);
        press(&mut state, &mut runtime, &mut view_data, alt_one);
        assert_eq!(
            state.report.as_ref().map(|dialog| dialog.kind),
            Some(ReportKind::PatientPrescriptions)
        );
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Esc));
        assert!(state.report.is_none());
        let form = state.form.as_ref().expect("form kept after cancel");
        assert_eq!(form.inputs.value(0), "P-1");
    }

    #[test]
    fn bare_digits_are_text_while_a_form_is_open() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('g')));
        type_text(&mut state, &mut runtime, &mut view_data, "P-13");
        assert!(state.report.is_none());
        let form = state.form.as_ref().expect("form open");
        assert_eq!(form.inputs.value(0), "P-13");
    }

    #[test]
    fn report_store_error_uses_the_plain_error_title() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime {
            report_error: Some("1305 (42000): PROCEDURE drug_details does not exist".to_owned()),
            ..TestRuntime::default()
        };
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('3')));
        type_text(&mut state, &mut runtime, &mut view_data, "Cipla");
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        let notice = state.notice.clone().expect("error notice");
        assert_eq!(notice.title, "Error");
        assert_eq!(
            notice.message,
            "An error occurred: 1305 (42000): PROCEDURE drug_details does not exist"
        );
        assert!(state.report.is_some());
    }

    #[test]
    fn terminal_event_errors_are_returned_not_raised() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();
        let tx = internal_tx();

        let error = pump_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            |_: Duration| -> io::Result<bool> { Err(io::Error::other("tty gone")) },
            || -> io::Result<Event> { panic!("read after failed poll") },
        )
        .expect_err("poll failure should surface");
        assert!(format!("{error:#}").contains("poll event"));

        let error = pump_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            |_: Duration| -> io::Result<bool> { Ok(true) },
            || -> io::Result<Event> { Err(io::Error::other("tty gone")) },
        )
        .expect_err("read failure should surface");
        assert!(format!("{error:#}").contains("read event"));
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn pump_event_reports_quit_and_idle_polls() -> anyhow::Result<()> {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();
        let tx = internal_tx();

        let idle = pump_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            |_: Duration| -> io::Result<bool> { Ok(false) },
            || -> io::Result<Event> { panic!("no event to read") },
        )?;
        assert!(!idle);

        let quit = pump_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            |_: Duration| -> io::Result<bool> { Ok(true) },
            || -> io::Result<Event> { Ok(Event::Key(ctrl('q'))) },
        )?;
        assert!(quit);
        Ok(())
    }

    #[test]
    fn results_scroll_stays_within_the_rendered_lines() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();
        state.results.receive(stock_result());

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('r')));
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('k')));
        assert_eq!(view_data.results_scroll, 0);

        for _ in 0..10 {
            press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('j')));
        }
        // Header, rule and three rows.
        assert_eq!(view_data.results_scroll, 4);

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Home));
        assert_eq!(view_data.results_scroll, 0);
    }

    #[test]
    fn blank_report_parameter_keeps_the_dialog_open() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('3')));
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        let notice = state.notice.clone().expect("validation notice");
        assert_eq!(notice.message, "Company name is required!");
        assert!(runtime.reports.is_empty());
        assert!(state.report.is_some());

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Enter));
        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Esc));
        assert!(state.report.is_none());
    }

    #[test]
    fn missing_contract_is_information_and_keeps_previous_results() {
        let mut state = AppState::default();
        state.results.receive(contract_result());
        let mut runtime = TestRuntime {
            report_outcome: Some(ReportOutcome::NoContract),
            ..TestRuntime::default()
        };
        let mut view_data = view_data_for_test();
        let values = PharmacyFaker::new(5).report_values(ReportKind::DisplayContract);

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('7')));
        fill_active_inputs(&mut state, &mut runtime, &mut view_data, &values);
        press(&mut state, &mut runtime, &mut view_data, ctrl('s'));

        let notice = state.notice.clone().expect("information notice");
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.title, "Information");
        assert_eq!(notice.message, NO_CONTRACT_MESSAGE);
        assert!(state.report.is_some());
        assert_eq!(state.results.current(), Some(&contract_result()));
    }

    #[test]
    fn results_key_without_results_only_sets_status() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for_test();

        press(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('r')));

        assert!(!state.results_visible);
        assert_eq!(
            state.status_line.as_deref(),
            Some("no results yet -- run a report first")
        );
    }

    #[test]
    fn stale_status_clear_is_ignored() {
        let mut state = AppState::default();
        let mut view_data = view_data_for_test();
        let (tx, rx) = mpsc::channel();

        emit_status(&mut state, &mut view_data, &tx, "first");
        emit_status(&mut state, &mut view_data, &tx, "second");
        assert_eq!(view_data.status_token, 2);

        tx.send(InternalEvent::ClearStatus { token: 1 })
            .expect("send stale clear");
        super::process_internal_events(&mut state, &view_data, &rx);
        assert_eq!(state.status_line.as_deref(), Some("second"));

        tx.send(InternalEvent::ClearStatus { token: 2 })
            .expect("send current clear");
        super::process_internal_events(&mut state, &view_data, &rx);
        assert_eq!(state.status_line, None);
    }

    #[test]
    fn inputs_text_marks_focus_and_indents_continuations() {
        let mut inputs = FieldInputs::new(FormKind::AddContract.fields());
        let content = inputs
            .fields()
            .iter()
            .position(|field| field.multiline)
            .expect("content field");
        inputs.move_focus(content as isize);
        "Supply of generics\nNet 30"
            .chars()
            .for_each(|ch| inputs.insert_char(ch));

        let text = inputs_text(&inputs);
        assert!(text.contains("> Content: Supply of generics\n    Net 30_"));
        assert!(text.starts_with("  "));
    }

    #[test]
    fn status_text_names_the_mode() {
        let mut state = AppState::default();
        assert!(status_text(&state).starts_with("NAV | "));

        state.status_line = Some("form cleared".to_owned());
        assert!(status_text(&state).starts_with("NAV | form cleared | "));

        state.report = Some(nova_app::ReportDialog::new(ReportKind::CompanyDrugs));
        assert!(status_text(&state).starts_with("REPORT | "));
    }

    #[test]
    fn render_draws_every_overlay() -> anyhow::Result<()> {
        let mut state = AppState::default();
        state.results.receive(stock_result());
        state.results_visible = true;
        state.report = Some(nova_app::ReportDialog::new(ReportKind::PharmacyStock));
        state.notice = Some(nova_app::Notice::connected());
        let view_data = view_data_for_test();

        let mut terminal = Terminal::new(TestBackend::new(120, 40))?;
        terminal.draw(|frame| render(frame, &state, &view_data))?;

        let buffer = terminal.backend().buffer();
        let screen = buffer
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(screen.contains("Connection"));
        assert!(screen.contains("operation: Add"));
        Ok(())
    }
}
