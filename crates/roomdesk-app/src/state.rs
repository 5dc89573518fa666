// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FieldEdit, Room, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Rooms,
    IncomingRequests { room_id: RoomId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Save,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub room_id: RoomId,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    LoadFailed,
    Saved,
    SaveRejectedOccupied,
    SaveFailed,
    DeleteRejectedOccupied,
    DeleteCheckFailed,
    Deleted,
    DeleteFailed,
    DeleteCancelled,
    Busy,
    NotAvailable,
    EditInProgress,
    InvalidInput,
}

impl NoticeKind {
    pub const fn level(self) -> NoticeLevel {
        match self {
            Self::Saved | Self::Deleted => NoticeLevel::Success,
            Self::DeleteCancelled | Self::Busy | Self::EditInProgress => NoticeLevel::Info,
            Self::LoadFailed
            | Self::SaveRejectedOccupied
            | Self::SaveFailed
            | Self::DeleteRejectedOccupied
            | Self::DeleteCheckFailed
            | Self::DeleteFailed
            | Self::NotAvailable
            | Self::InvalidInput => NoticeLevel::Error,
        }
    }

    pub const fn default_message(self) -> &'static str {
        match self {
            Self::LoadFailed | Self::DeleteCheckFailed | Self::DeleteFailed => {
                "Something went wrong!"
            }
            Self::Saved => "Room updated successfully!",
            Self::SaveRejectedOccupied => "You have renters in your existing room!",
            Self::SaveFailed => "Failed to update the room!",
            Self::DeleteRejectedOccupied => "There is someone in the room, so you can't delete it!",
            Self::Deleted => "Room Deleted Successfully!",
            Self::DeleteCancelled => "Deletion cancelled",
            Self::Busy => "Another request for this room is still running",
            Self::NotAvailable => "Only available rooms accept incoming requests",
            Self::EditInProgress => "Save the room being edited before reloading",
            Self::InvalidInput => "Invalid input",
        }
    }
}

/// A one-shot user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_owned(),
        }
    }

    pub fn with_message(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn level(&self) -> NoticeLevel {
        self.kind.level()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomsState {
    pub phase: LoadPhase,
    pub rooms: Vec<Room>,
    pub editing: Option<RoomId>,
    pub pending: Option<PendingAction>,
    pub confirm_delete: Option<RoomId>,
    pub route: Route,
    pub notice: Option<Notice>,
}

impl Default for RoomsState {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Loading,
            rooms: Vec::new(),
            editing: None,
            pending: None,
            confirm_delete: None,
            route: Route::Rooms,
            notice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoomCommand {
    BeginLoad,
    FinishLoad(Vec<Room>),
    /// Ends a load that failed. Rooms already on screen are kept.
    LoadFailed,
    StartEdit(RoomId),
    ApplyEdit(FieldEdit),
    StopEdit,
    ReplaceRoom(Room),
    RemoveRoom(RoomId),
    Lock(PendingAction),
    Unlock,
    AskDeleteConfirmation(RoomId),
    DismissConfirmation,
    OpenIncomingRequests(RoomId),
    BackToRooms,
    Notify(Notice),
    ClearNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    PhaseChanged(LoadPhase),
    RoomsReplaced(usize),
    EditStarted(RoomId),
    EditStopped(RoomId),
    RoomChanged(RoomId),
    RoomRemoved(RoomId),
    ActionLocked(PendingAction),
    ActionReleased,
    ConfirmationShown(RoomId),
    ConfirmationDismissed,
    RouteChanged(Route),
    Noticed(Notice),
    NoticeCleared,
}

impl RoomsState {
    pub fn dispatch(&mut self, command: RoomCommand) -> Vec<RoomEvent> {
        match command {
            RoomCommand::BeginLoad => {
                self.phase = LoadPhase::Loading;
                vec![RoomEvent::PhaseChanged(self.phase)]
            }
            RoomCommand::FinishLoad(rooms) => {
                let count = rooms.len();
                self.rooms = rooms;
                self.phase = LoadPhase::Ready;
                let mut events = vec![
                    RoomEvent::RoomsReplaced(count),
                    RoomEvent::PhaseChanged(self.phase),
                ];
                if let Some(id) = self.editing.take() {
                    events.push(RoomEvent::EditStopped(id));
                }
                events
            }
            RoomCommand::LoadFailed => {
                self.phase = LoadPhase::Ready;
                vec![RoomEvent::PhaseChanged(self.phase)]
            }
            RoomCommand::StartEdit(id) => {
                if self.room(&id).is_none() {
                    return Vec::new();
                }
                let mut events = Vec::new();
                if let Some(previous) = self.editing.take()
                    && previous != id
                {
                    events.push(RoomEvent::EditStopped(previous));
                }
                self.editing = Some(id.clone());
                events.push(RoomEvent::EditStarted(id));
                events
            }
            RoomCommand::ApplyEdit(edit) => {
                let Some(id) = self.editing.clone() else {
                    return Vec::new();
                };
                if self.update_room(&id, |room| edit.applied_to(room)) {
                    vec![RoomEvent::RoomChanged(id)]
                } else {
                    Vec::new()
                }
            }
            RoomCommand::StopEdit => match self.editing.take() {
                Some(id) => vec![RoomEvent::EditStopped(id)],
                None => Vec::new(),
            },
            RoomCommand::ReplaceRoom(room) => {
                let id = room.id.clone();
                if self.update_room(&id, |_| room) {
                    vec![RoomEvent::RoomChanged(id)]
                } else {
                    Vec::new()
                }
            }
            RoomCommand::RemoveRoom(id) => {
                let before = self.rooms.len();
                self.rooms.retain(|room| room.id != id);
                if self.rooms.len() == before {
                    return Vec::new();
                }
                let mut events = vec![RoomEvent::RoomRemoved(id.clone())];
                if self.editing.as_ref() == Some(&id) {
                    self.editing = None;
                    events.push(RoomEvent::EditStopped(id));
                }
                events
            }
            RoomCommand::Lock(action) => {
                if self.pending.is_some() {
                    return Vec::new();
                }
                self.pending = Some(action.clone());
                vec![RoomEvent::ActionLocked(action)]
            }
            RoomCommand::Unlock => match self.pending.take() {
                Some(_) => vec![RoomEvent::ActionReleased],
                None => Vec::new(),
            },
            RoomCommand::AskDeleteConfirmation(id) => {
                self.confirm_delete = Some(id.clone());
                vec![RoomEvent::ConfirmationShown(id)]
            }
            RoomCommand::DismissConfirmation => match self.confirm_delete.take() {
                Some(_) => vec![RoomEvent::ConfirmationDismissed],
                None => Vec::new(),
            },
            RoomCommand::OpenIncomingRequests(room_id) => {
                self.route = Route::IncomingRequests { room_id };
                vec![RoomEvent::RouteChanged(self.route.clone())]
            }
            RoomCommand::BackToRooms => {
                self.route = Route::Rooms;
                vec![RoomEvent::RouteChanged(Route::Rooms)]
            }
            RoomCommand::Notify(notice) => {
                self.notice = Some(notice.clone());
                vec![RoomEvent::Noticed(notice)]
            }
            RoomCommand::ClearNotice => {
                self.notice = None;
                vec![RoomEvent::NoticeCleared]
            }
        }
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| &room.id == id)
    }

    pub fn editing_room(&self) -> Option<&Room> {
        self.editing.as_ref().and_then(|id| self.room(id))
    }

    pub fn is_editing(&self, id: &RoomId) -> bool {
        self.editing.as_ref() == Some(id)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn shows_empty_state(&self) -> bool {
        self.phase == LoadPhase::Ready && self.rooms.is_empty()
    }

    fn update_room(&mut self, id: &RoomId, update: impl FnOnce(&Room) -> Room) -> bool {
        match self.rooms.iter_mut().find(|room| &room.id == id) {
            Some(slot) => {
                *slot = update(slot);
                true
            }
            None => false,
        }
    }
}
