// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use roomdesk_api::Client;
use roomdesk_app::{Room, RoomBackend, RoomId};

/// Live backend: every workflow call goes to the rental API.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl RoomBackend for ApiRuntime {
    fn list_rooms(&mut self) -> Result<Vec<Room>> {
        self.client.list_my_rooms().context("list rooms")
    }

    fn room_has_renters(&mut self, room_id: &RoomId) -> Result<bool> {
        self.client
            .has_renters(room_id)
            .with_context(|| format!("check renters for room {room_id}"))
    }

    fn room_relation_exists(&mut self, room_id: &RoomId) -> Result<bool> {
        self.client
            .relation_exists(room_id)
            .with_context(|| format!("check tenancy for room {room_id}"))
    }

    fn update_room(&mut self, room: &Room) -> Result<Option<Room>> {
        self.client
            .update_room(room)
            .with_context(|| format!("update room {}", room.id))
    }

    fn delete_room(&mut self, room_id: &RoomId) -> Result<()> {
        self.client
            .delete_room(room_id)
            .with_context(|| format!("delete room {room_id}"))
    }
}
