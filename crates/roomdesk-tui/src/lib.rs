// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use roomdesk_app::{
    FieldEdit, LoadPhase, Notice, NoticeKind, NoticeLevel, Room, RoomBackend, RoomCommand,
    RoomEvent, RoomField, RoomId, RoomsState, Route, load_rooms, open_incoming_requests,
    reload_rooms, request_delete, resolve_delete, save_room, start_edit,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const LIST_HINT: &str = "j/k move  e edit  x delete  n requests  r reload  q quit";
const EDIT_HINT: &str = "tab/shift+tab field  space toggle  enter save  esc discard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Screen-local state that the room model does not own.
#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    selected: usize,
    field_cursor: usize,
    buffer: String,
    edit_original: Option<Room>,
    status_token: u64,
}

impl ViewData {
    fn focused_field(&self) -> RoomField {
        RoomField::ALL[self.field_cursor % RoomField::ALL.len()]
    }
}

pub fn run_app<B: RoomBackend + ?Sized>(state: &mut RoomsState, backend: &mut B) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = terminal
        .draw(|frame| render(frame, state, &view_data))
        .map(|_| ())
        .context("draw frame");
    if result.is_ok() {
        let events = load_rooms(state, backend);
        after_events(state, &mut view_data, &internal_tx, &events);
    }

    while result.is_ok() {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(state, backend, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => result = Err(error),
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut RoomsState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(RoomCommand::ClearNotice);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// Bookkeeping after a workflow step: a fresh notice restarts the clear
/// timer, and the selection follows the list.
fn after_events(
    state: &RoomsState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: &[RoomEvent],
) {
    if events
        .iter()
        .any(|event| matches!(event, RoomEvent::Noticed(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
    if state.editing.is_none() {
        view_data.edit_original = None;
        view_data.buffer.clear();
        view_data.field_cursor = 0;
    }
    clamp_selection(state, view_data);
}

fn emit_notice(
    state: &mut RoomsState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    notice: Notice,
) {
    let events = state.dispatch(RoomCommand::Notify(notice));
    after_events(state, view_data, internal_tx, &events);
}

fn clamp_selection(state: &RoomsState, view_data: &mut ViewData) {
    view_data.selected = view_data.selected.min(state.rooms.len().saturating_sub(1));
}

fn selected_room_id(state: &RoomsState, view_data: &ViewData) -> Option<RoomId> {
    state
        .rooms
        .get(view_data.selected)
        .map(|room| room.id.clone())
}

fn handle_key_event<B: RoomBackend + ?Sized>(
    state: &mut RoomsState,
    backend: &mut B,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.confirm_delete.is_some() {
        let confirmed = match key.code {
            KeyCode::Char('y') | KeyCode::Enter => true,
            KeyCode::Char('n') | KeyCode::Esc => false,
            _ => return false,
        };
        let events = resolve_delete(state, backend, confirmed);
        after_events(state, view_data, internal_tx, &events);
        return false;
    }

    if matches!(state.route, Route::IncomingRequests { .. }) {
        match key.code {
            KeyCode::Esc => {
                state.dispatch(RoomCommand::BackToRooms);
            }
            KeyCode::Char('q') => return true,
            _ => {}
        }
        return false;
    }

    if state.editing.is_some() {
        handle_edit_key(state, backend, view_data, internal_tx, key);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.selected = view_data.selected.saturating_add(1);
            clamp_selection(state, view_data);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.selected = view_data.selected.saturating_sub(1);
        }
        KeyCode::Char('e') => {
            if let Some(room_id) = selected_room_id(state, view_data) {
                let events = start_edit(state, room_id);
                view_data.edit_original = state.editing_room().cloned();
                view_data.field_cursor = 0;
                load_buffer(state, view_data);
                after_events(state, view_data, internal_tx, &events);
            }
        }
        KeyCode::Char('x') => {
            if let Some(room_id) = selected_room_id(state, view_data) {
                let events = request_delete(state, backend, room_id);
                after_events(state, view_data, internal_tx, &events);
            }
        }
        KeyCode::Char('n') => {
            if let Some(room_id) = selected_room_id(state, view_data) {
                let events = open_incoming_requests(state, room_id);
                after_events(state, view_data, internal_tx, &events);
            }
        }
        KeyCode::Char('r') => {
            let events = reload_rooms(state, backend);
            after_events(state, view_data, internal_tx, &events);
        }
        _ => {}
    }
    false
}

fn handle_edit_key<B: RoomBackend + ?Sized>(
    state: &mut RoomsState,
    backend: &mut B,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field = view_data.focused_field();
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            let mut events = Vec::new();
            if let Some(original) = view_data.edit_original.take() {
                events.extend(state.dispatch(RoomCommand::ReplaceRoom(original)));
            }
            events.extend(state.dispatch(RoomCommand::StopEdit));
            after_events(state, view_data, internal_tx, &events);
        }
        (KeyCode::Enter, _) | (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            if commit_focused_field(state, view_data, internal_tx) {
                let events = save_room(state, backend);
                after_events(state, view_data, internal_tx, &events);
            }
        }
        (KeyCode::Tab, _) => move_field_cursor(state, view_data, internal_tx, 1),
        (KeyCode::BackTab, _) => move_field_cursor(state, view_data, internal_tx, -1),
        (KeyCode::Char(' '), _) if !field.is_text() => toggle_field(state, field),
        (KeyCode::Backspace, _) if field.is_text() => {
            view_data.buffer.pop();
        }
        (KeyCode::Char(ch), modifiers)
            if field.is_text() && !modifiers.contains(KeyModifiers::CONTROL) =>
        {
            view_data.buffer.push(ch);
        }
        _ => {}
    }
}

fn toggle_field(state: &mut RoomsState, field: RoomField) {
    let Some(room) = state.editing_room() else {
        return;
    };
    let edit = match field {
        RoomField::Available => FieldEdit::Available(!room.is_available),
        RoomField::RoomType => FieldEdit::RoomType(room.room_type.next()),
        _ => return,
    };
    state.dispatch(RoomCommand::ApplyEdit(edit));
}

fn move_field_cursor(
    state: &mut RoomsState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    delta: isize,
) {
    if !commit_focused_field(state, view_data, internal_tx) {
        return;
    }
    let len = RoomField::ALL.len() as isize;
    let next = (view_data.field_cursor as isize + delta).rem_euclid(len);
    view_data.field_cursor = next as usize;
    load_buffer(state, view_data);
}

fn load_buffer(state: &RoomsState, view_data: &mut ViewData) {
    let field = view_data.focused_field();
    view_data.buffer = match state.editing_room() {
        Some(room) if field.is_text() => field.current_text(room),
        _ => String::new(),
    };
}

/// Applies the typed text of the focused field. Returns false and raises a
/// notice when the text does not parse; the buffer is left as typed.
fn commit_focused_field(
    state: &mut RoomsState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) -> bool {
    let field = view_data.focused_field();
    if !field.is_text() {
        return true;
    }
    match field.parse_input(&view_data.buffer) {
        Ok(edit) => {
            state.dispatch(RoomCommand::ApplyEdit(edit));
            true
        }
        Err(error) => {
            emit_notice(
                state,
                view_data,
                internal_tx,
                Notice::with_message(NoticeKind::InvalidInput, error.to_string()),
            );
            false
        }
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &RoomsState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().title("roomdesk").borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(header, layout[0]);

    match &state.route {
        Route::IncomingRequests { room_id } => {
            let body = Paragraph::new(incoming_requests_text(state, room_id)).block(
                Block::default()
                    .title("incoming requests")
                    .borders(Borders::ALL),
            );
            frame.render_widget(body, layout[1]);
        }
        Route::Rooms => render_rooms(frame, layout[1], state, view_data),
    }

    let status = Paragraph::new(status_text(state))
        .style(status_style(state))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(text) = confirm_delete_text(state) {
        let area = centered_rect(50, 25, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("delete room")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(modal, area);
    }
}

fn render_rooms(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &RoomsState,
    view_data: &ViewData,
) {
    if let Some(placeholder) = body_placeholder(state) {
        let body = Paragraph::new(placeholder)
            .block(Block::default().title("my rooms").borders(Borders::ALL));
        frame.render_widget(body, area);
        return;
    }

    let (table_area, form_area) = if state.editing.is_some() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(11)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    let header = Row::new(
        ["No.", "Type", "Address", "Rent", "Rooms", "Baths", "Status", "Updated"]
            .into_iter()
            .map(Cell::from),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = state.rooms.iter().enumerate().map(|(index, room)| {
        let mut style = Style::default();
        if !room.is_available {
            style = style.fg(Color::DarkGray);
        }
        if index == view_data.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if state.is_editing(&room.id) {
            style = style.fg(Color::Yellow);
        }
        Row::new(room_cells(room).into_iter().map(Cell::from)).style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!("my rooms ({})", state.rooms.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, table_area);

    if let Some(form_area) = form_area {
        let form = Paragraph::new(edit_form_text(state, view_data))
            .block(Block::default().title("edit room").borders(Borders::ALL));
        frame.render_widget(form, form_area);
    }
}

fn header_text(state: &RoomsState) -> String {
    match &state.route {
        Route::Rooms => "My Rooms".to_owned(),
        Route::IncomingRequests { room_id } => {
            let label = state
                .room(room_id)
                .map_or_else(|| room_id.to_string(), Room::room_number_label);
            format!("My Rooms > Room {label} > Incoming Requests")
        }
    }
}

fn body_placeholder(state: &RoomsState) -> Option<&'static str> {
    if state.phase == LoadPhase::Loading {
        Some("Loading...")
    } else if state.shows_empty_state() {
        Some("No rooms found")
    } else {
        None
    }
}

fn room_cells(room: &Room) -> [String; 8] {
    [
        room.room_number_label(),
        room.room_type.label().to_owned(),
        room.address.one_line(),
        room.rent_label(),
        room.number_of_rooms.to_string(),
        room.number_of_bathrooms.to_string(),
        room.availability_label().to_owned(),
        updated_label(room.updated_at.or(room.created_at)),
    ]
}

fn updated_label(at: Option<OffsetDateTime>) -> String {
    at.map_or_else(|| "-".to_owned(), |at| at.date().to_string())
}

fn edit_form_text(state: &RoomsState, view_data: &ViewData) -> String {
    let Some(room) = state.editing_room() else {
        return String::new();
    };
    let focused = view_data.focused_field();
    RoomField::ALL
        .iter()
        .map(|field| {
            let marker = if *field == focused { ">" } else { " " };
            let value = match field {
                RoomField::Available => room.availability_label().to_owned(),
                RoomField::RoomType => room.room_type.label().to_owned(),
                _ if *field == focused => format!("{}_", view_data.buffer),
                _ => field.current_text(room),
            };
            format!("{marker} {:<20} {value}", field.label())
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn status_text(state: &RoomsState) -> String {
    if let Some(notice) = &state.notice {
        return notice.message.clone();
    }
    if let Some(pending) = &state.pending {
        return format!("working on room {}...", pending.room_id);
    }
    match state.route {
        Route::IncomingRequests { .. } => "esc back  q quit".to_owned(),
        Route::Rooms if state.editing.is_some() => EDIT_HINT.to_owned(),
        Route::Rooms => LIST_HINT.to_owned(),
    }
}

fn status_style(state: &RoomsState) -> Style {
    match state.notice.as_ref().map(Notice::level) {
        Some(NoticeLevel::Success) => Style::default().fg(Color::Green),
        Some(NoticeLevel::Error) => Style::default().fg(Color::Red),
        Some(NoticeLevel::Info) => Style::default().fg(Color::Yellow),
        None => Style::default().fg(Color::Gray),
    }
}

fn confirm_delete_text(state: &RoomsState) -> Option<String> {
    let room_id = state.confirm_delete.as_ref()?;
    let label = state
        .room(room_id)
        .map_or_else(|| room_id.to_string(), |room| room.address.one_line());
    Some(format!(
        "Are you sure?\n\n{label}\nThis action cannot be undone!\n\n[y] Yes, delete it!   [n] No, cancel"
    ))
}

fn incoming_requests_text(state: &RoomsState, room_id: &RoomId) -> String {
    let summary = state.room(room_id).map_or_else(
        || room_id.to_string(),
        |room| format!("{} ({})", room.address.one_line(), room.rent_label()),
    );
    format!("Requests for {summary}\n\nNo incoming requests yet.")
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
        InternalEvent, LIST_HINT, ViewData, body_placeholder, confirm_delete_text, edit_form_text,
        handle_key_event, header_text, process_internal_events, room_cells, status_text,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use roomdesk_app::{
        LoadPhase, NoticeKind, RoomField, RoomType, RoomsState, Route, load_rooms,
    };
    use roomdesk_testkit::{MemoryBackend, RoomFaker};
    use std::sync::mpsc;

    struct Harness {
        state: RoomsState,
        backend: MemoryBackend,
        view_data: ViewData,
        tx: mpsc::Sender<InternalEvent>,
        rx: mpsc::Receiver<InternalEvent>,
    }

    impl Harness {
        fn new(backend: MemoryBackend) -> Self {
            let (tx, rx) = mpsc::channel();
            let mut harness = Self {
                state: RoomsState::default(),
                backend,
                view_data: ViewData::default(),
                tx,
                rx,
            };
            load_rooms(&mut harness.state, &mut harness.backend);
            harness
        }

        fn press(&mut self, code: KeyCode) -> bool {
            self.press_with(code, KeyModifiers::NONE)
        }

        fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.backend,
                &mut self.view_data,
                &self.tx,
                KeyEvent::new(code, modifiers),
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn clear_buffer(&mut self) {
            while !self.view_data.buffer.is_empty() {
                self.press(KeyCode::Backspace);
            }
        }

        fn focus(&mut self, field: RoomField) {
            while self.view_data.focused_field() != field {
                self.press(KeyCode::Tab);
            }
        }

        fn notice_kind(&self) -> Option<NoticeKind> {
            self.state.notice.as_ref().map(|notice| notice.kind)
        }
    }

    fn harness(count: usize) -> Harness {
        let mut rooms = RoomFaker::new(21).rooms(count);
        for room in &mut rooms {
            room.is_available = true;
        }
        Harness::new(MemoryBackend::with_rooms(rooms))
    }

    #[test]
    fn quit_keys() {
        let mut h = harness(1);
        assert!(h.press_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(h.press(KeyCode::Char('q')));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut h = harness(3);
        for _ in 0..10 {
            h.press(KeyCode::Char('j'));
        }
        assert_eq!(h.view_data.selected, 2);
        for _ in 0..10 {
            h.press(KeyCode::Char('k'));
        }
        assert_eq!(h.view_data.selected, 0);
    }

    #[test]
    fn edit_rent_and_save_sends_parsed_number() {
        let mut h = harness(2);
        h.press(KeyCode::Char('j'));
        h.press(KeyCode::Char('e'));
        let target = h.state.editing.clone().expect("editing");
        assert_eq!(target, h.state.rooms[1].id);

        h.focus(RoomField::RentPrice);
        h.clear_buffer();
        h.type_text("6250.5");
        assert!(!h.press(KeyCode::Enter));

        assert_eq!(h.backend.calls.updates, 1);
        assert_eq!(h.backend.updates_received[0].rent_price, 6250.5);
        assert_eq!(h.notice_kind(), Some(NoticeKind::Saved));
        assert_eq!(h.state.editing, None);
        assert!(h.view_data.buffer.is_empty());
    }

    #[test]
    fn invalid_number_blocks_field_move_and_save() {
        let mut h = harness(1);
        h.press(KeyCode::Char('e'));
        h.focus(RoomField::NumberOfRooms);
        h.clear_buffer();
        h.type_text("two");

        h.press(KeyCode::Tab);
        assert_eq!(h.view_data.focused_field(), RoomField::NumberOfRooms);
        assert_eq!(h.notice_kind(), Some(NoticeKind::InvalidInput));

        h.press(KeyCode::Enter);
        assert_eq!(h.backend.calls.updates, 0);
        assert!(h.state.editing.is_some());
    }

    #[test]
    fn space_toggles_availability_and_cycles_type() {
        let mut h = harness(1);
        let before = h.state.rooms[0].room_type;
        h.press(KeyCode::Char('e'));

        h.focus(RoomField::RoomType);
        h.press(KeyCode::Char(' '));
        assert_eq!(h.state.rooms[0].room_type, before.next());

        h.focus(RoomField::Available);
        h.press(KeyCode::Char(' '));
        assert!(!h.state.rooms[0].is_available);
    }

    #[test]
    fn escape_discards_local_edits() {
        let mut h = harness(1);
        let original = h.state.rooms[0].clone();
        h.press(KeyCode::Char('e'));
        h.focus(RoomField::City);
        h.clear_buffer();
        h.type_text("Nashik");
        h.press(KeyCode::Tab);
        assert_eq!(h.state.rooms[0].address.city, "Nashik");

        h.press(KeyCode::Esc);
        assert_eq!(h.state.rooms[0], original);
        assert_eq!(h.state.editing, None);
        assert_eq!(h.backend.calls.updates, 0);
    }

    #[test]
    fn typed_letters_do_not_trigger_list_commands_while_editing() {
        let mut h = harness(2);
        h.press(KeyCode::Char('e'));
        h.type_text("xqnr");
        assert_eq!(h.view_data.buffer.len(), h.state.rooms[0].address.street.len() + 4);
        assert_eq!(h.backend.calls.relation_checks, 0);
        assert_eq!(h.backend.calls.list, 1);
        assert_eq!(h.state.route, Route::Rooms);
    }

    #[test]
    fn delete_flow_confirms_then_removes() {
        let mut h = harness(3);
        let target = h.state.rooms[0].id.clone();

        h.press(KeyCode::Char('x'));
        assert_eq!(h.state.confirm_delete, Some(target.clone()));
        let prompt = confirm_delete_text(&h.state).expect("confirmation text");
        assert!(prompt.starts_with("Are you sure?"));
        assert!(prompt.contains("cannot be undone"));

        h.press(KeyCode::Char('j'));
        assert_eq!(h.state.confirm_delete, Some(target.clone()));

        h.press(KeyCode::Char('y'));
        assert!(h.state.room(&target).is_none());
        assert_eq!(h.notice_kind(), Some(NoticeKind::Deleted));
        assert_eq!(h.state.rooms.len(), 2);
    }

    #[test]
    fn delete_cancel_and_last_room_selection() {
        let mut h = harness(2);
        h.press(KeyCode::Char('j'));
        h.press(KeyCode::Char('x'));
        h.press(KeyCode::Esc);
        assert_eq!(h.notice_kind(), Some(NoticeKind::DeleteCancelled));
        assert_eq!(h.backend.calls.deletes, 0);

        h.press(KeyCode::Char('x'));
        h.press(KeyCode::Enter);
        assert_eq!(h.state.rooms.len(), 1);
        assert_eq!(h.view_data.selected, 0);
    }

    #[test]
    fn incoming_requests_route_and_back() {
        let mut h = harness(1);
        let target = h.state.rooms[0].id.clone();
        h.press(KeyCode::Char('n'));
        assert_eq!(
            h.state.route,
            Route::IncomingRequests {
                room_id: target.clone()
            }
        );
        assert!(header_text(&h.state).contains("Incoming Requests"));

        h.press(KeyCode::Char('x'));
        assert_eq!(h.state.confirm_delete, None);

        h.press(KeyCode::Esc);
        assert_eq!(h.state.route, Route::Rooms);
    }

    #[test]
    fn placeholders_for_loading_and_empty() {
        let state = RoomsState::default();
        assert_eq!(state.phase, LoadPhase::Loading);
        assert_eq!(body_placeholder(&state), Some("Loading..."));

        let h = harness(0);
        assert_eq!(body_placeholder(&h.state), Some("No rooms found"));

        let h = harness(1);
        assert_eq!(body_placeholder(&h.state), None);
    }

    #[test]
    fn stale_clear_token_keeps_notice() {
        let mut h = harness(1);
        h.press(KeyCode::Char('x'));
        h.press(KeyCode::Char('n'));
        assert!(h.state.notice.is_some());

        h.tx.send(InternalEvent::ClearStatus {
            token: h.view_data.status_token.wrapping_sub(1),
        })
        .expect("send");
        process_internal_events(&mut h.state, &h.view_data, &h.rx);
        assert!(h.state.notice.is_some());

        h.tx.send(InternalEvent::ClearStatus {
            token: h.view_data.status_token,
        })
        .expect("send");
        process_internal_events(&mut h.state, &h.view_data, &h.rx);
        assert!(h.state.notice.is_none());
        assert_eq!(status_text(&h.state), LIST_HINT);
    }

    #[test]
    fn room_cells_and_edit_form_text() {
        let mut h = harness(1);
        {
            let room = &mut h.state.rooms[0];
            room.room_number = None;
            room.room_type = RoomType::Studio;
            room.rent_price = 4500.0;
        }
        let cells = room_cells(&h.state.rooms[0]);
        assert_eq!(cells[0], "N/A");
        assert_eq!(cells[1], "Studio");
        assert_eq!(cells[3], "₹4500");
        assert_eq!(cells[6], "Available");

        h.press(KeyCode::Char('e'));
        let form = edit_form_text(&h.state, &h.view_data);
        assert!(form.starts_with("> Street"));
        assert!(form.contains("Rent Price"));
        assert_eq!(form.lines().count(), RoomField::ALL.len());
    }
}
