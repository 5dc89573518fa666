// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tracing::{error, info, warn};

use crate::{
    ActionKind, Notice, NoticeKind, PendingAction, Room, RoomCommand, RoomEvent, RoomId,
    RoomsState,
};

/// Remote operations the room screen depends on.
pub trait RoomBackend {
    fn list_rooms(&mut self) -> Result<Vec<Room>>;
    /// Tenancy check used before saving.
    fn room_has_renters(&mut self, room_id: &RoomId) -> Result<bool>;
    /// Tenancy check used before deleting.
    fn room_relation_exists(&mut self, room_id: &RoomId) -> Result<bool>;
    /// Full replace. Returns the server's copy when the response carries one.
    fn update_room(&mut self, room: &Room) -> Result<Option<Room>>;
    fn delete_room(&mut self, room_id: &RoomId) -> Result<()>;
}

pub fn load_rooms<B: RoomBackend + ?Sized>(
    state: &mut RoomsState,
    backend: &mut B,
) -> Vec<RoomEvent> {
    let mut events = state.dispatch(RoomCommand::BeginLoad);
    match backend.list_rooms() {
        Ok(rooms) => {
            info!(count = rooms.len(), "rooms loaded");
            events.extend(state.dispatch(RoomCommand::FinishLoad(rooms)));
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "load rooms failed");
            events.extend(state.dispatch(RoomCommand::LoadFailed));
            events.extend(notify(state, NoticeKind::LoadFailed));
        }
    }
    events
}

pub fn reload_rooms<B: RoomBackend + ?Sized>(
    state: &mut RoomsState,
    backend: &mut B,
) -> Vec<RoomEvent> {
    if state.editing.is_some() {
        return notify(state, NoticeKind::EditInProgress);
    }
    if state.is_busy() {
        return notify(state, NoticeKind::Busy);
    }
    load_rooms(state, backend)
}

pub fn start_edit(state: &mut RoomsState, room_id: RoomId) -> Vec<RoomEvent> {
    state.dispatch(RoomCommand::StartEdit(room_id))
}

/// Saves the room currently in edit mode.
pub fn save_room<B: RoomBackend + ?Sized>(
    state: &mut RoomsState,
    backend: &mut B,
) -> Vec<RoomEvent> {
    let Some(room) = state.editing_room().cloned() else {
        return Vec::new();
    };
    let Some(mut events) = lock(state, &room.id, ActionKind::Save) else {
        return notify(state, NoticeKind::Busy);
    };

    match submit_update(backend, &room) {
        Ok(SaveOutcome::RejectedOccupied) => {
            warn!(room_id = %room.id, "save blocked: available room has renters");
            events.extend(notify(state, NoticeKind::SaveRejectedOccupied));
        }
        Ok(SaveOutcome::Saved(server_copy)) => {
            info!(room_id = %room.id, "room updated");
            if let Some(server_room) = server_copy {
                if server_room.id == room.id {
                    events.extend(state.dispatch(RoomCommand::ReplaceRoom(server_room)));
                } else {
                    warn!(
                        room_id = %room.id,
                        returned_id = %server_room.id,
                        "update response names a different room; keeping local copy"
                    );
                }
            }
            events.extend(notify(state, NoticeKind::Saved));
            events.extend(state.dispatch(RoomCommand::StopEdit));
        }
        Err(err) => {
            error!(room_id = %room.id, error = %format!("{err:#}"), "update room failed");
            events.extend(notify(state, NoticeKind::SaveFailed));
            events.extend(state.dispatch(RoomCommand::StopEdit));
        }
    }

    events.extend(state.dispatch(RoomCommand::Unlock));
    events
}

enum SaveOutcome {
    RejectedOccupied,
    Saved(Option<Room>),
}

fn submit_update<B: RoomBackend + ?Sized>(backend: &mut B, room: &Room) -> Result<SaveOutcome> {
    let has_renters = backend.room_has_renters(&room.id)?;
    if room.is_available && has_renters {
        return Ok(SaveOutcome::RejectedOccupied);
    }
    let server_copy = backend.update_room(room)?;
    Ok(SaveOutcome::Saved(server_copy))
}

/// Runs the delete pre-check and, when the room is free, raises the
/// confirmation prompt. The delete itself happens in [`resolve_delete`].
pub fn request_delete<B: RoomBackend + ?Sized>(
    state: &mut RoomsState,
    backend: &mut B,
    room_id: RoomId,
) -> Vec<RoomEvent> {
    if state.room(&room_id).is_none() {
        return Vec::new();
    }
    if state.is_busy() {
        return notify(state, NoticeKind::Busy);
    }

    match backend.room_relation_exists(&room_id) {
        Ok(true) => {
            warn!(room_id = %room_id, "delete blocked: room has a tenancy relationship");
            notify(state, NoticeKind::DeleteRejectedOccupied)
        }
        Ok(false) => state.dispatch(RoomCommand::AskDeleteConfirmation(room_id)),
        Err(err) => {
            error!(room_id = %room_id, error = %format!("{err:#}"), "delete pre-check failed");
            notify(state, NoticeKind::DeleteCheckFailed)
        }
    }
}

/// Answers the open delete confirmation.
pub fn resolve_delete<B: RoomBackend + ?Sized>(
    state: &mut RoomsState,
    backend: &mut B,
    confirmed: bool,
) -> Vec<RoomEvent> {
    let Some(room_id) = state.confirm_delete.clone() else {
        return Vec::new();
    };
    let mut events = state.dispatch(RoomCommand::DismissConfirmation);

    if !confirmed {
        info!(room_id = %room_id, "deletion cancelled");
        events.extend(notify(state, NoticeKind::DeleteCancelled));
        return events;
    }

    let Some(locked) = lock(state, &room_id, ActionKind::Delete) else {
        events.extend(notify(state, NoticeKind::Busy));
        return events;
    };
    events.extend(locked);

    match backend.delete_room(&room_id) {
        Ok(()) => {
            info!(room_id = %room_id, "room deleted");
            events.extend(notify(state, NoticeKind::Deleted));
            events.extend(state.dispatch(RoomCommand::RemoveRoom(room_id)));
        }
        Err(err) => {
            error!(room_id = %room_id, error = %format!("{err:#}"), "delete room failed");
            events.extend(notify(state, NoticeKind::DeleteFailed));
        }
    }

    events.extend(state.dispatch(RoomCommand::Unlock));
    events
}

pub fn open_incoming_requests(state: &mut RoomsState, room_id: RoomId) -> Vec<RoomEvent> {
    match state.room(&room_id) {
        Some(room) if room.is_available => {
            state.dispatch(RoomCommand::OpenIncomingRequests(room_id))
        }
        Some(_) => notify(state, NoticeKind::NotAvailable),
        None => Vec::new(),
    }
}

fn lock(state: &mut RoomsState, room_id: &RoomId, kind: ActionKind) -> Option<Vec<RoomEvent>> {
    let events = state.dispatch(RoomCommand::Lock(PendingAction {
        room_id: room_id.clone(),
        kind,
    }));
    if events.is_empty() { None } else { Some(events) }
}

fn notify(state: &mut RoomsState, kind: NoticeKind) -> Vec<RoomEvent> {
    state.dispatch(RoomCommand::Notify(Notice::new(kind)))
}
