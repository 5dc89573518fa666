// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use roomdesk_app::{Address, Room, RoomBackend, RoomId, RoomNumber, RoomType};
use serde_json::Map;
use std::collections::BTreeSet;
use time::{Date, Month, OffsetDateTime, Time};

const STREET_NAMES: [&str; 14] = [
    "Nehru", "Gandhi", "Station", "Lake", "Temple", "Market", "Church", "Hill", "Park", "Canal",
    "Mill", "Garden", "Fort", "College",
];
const STREET_SUFFIXES: [&str; 4] = ["Road", "Street", "Marg", "Lane"];

const CITIES: [(&str, &str, u32); 10] = [
    ("Pune", "Maharashtra", 411_001),
    ("Mumbai", "Maharashtra", 400_001),
    ("Bengaluru", "Karnataka", 560_001),
    ("Chennai", "Tamil Nadu", 600_001),
    ("Hyderabad", "Telangana", 500_001),
    ("Jaipur", "Rajasthan", 302_001),
    ("Kochi", "Kerala", 682_001),
    ("Indore", "Madhya Pradesh", 452_001),
    ("Lucknow", "Uttar Pradesh", 226_001),
    ("Bhopal", "Madhya Pradesh", 462_001),
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Generates plausible rooms from a fixed seed.
#[derive(Debug, Clone)]
pub struct RoomFaker {
    rng: DeterministicRng,
    next_id: u64,
}

impl RoomFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn room(&mut self) -> Room {
        let id = format!("room-{:03}", self.next_id);
        self.next_id += 1;

        let room_type = RoomType::ALL[self.rng.int_n(RoomType::ALL.len())];
        let (city, state, zip_base) = CITIES[self.rng.int_n(CITIES.len())];
        let street = format!(
            "{} {} {}",
            self.int_range(1, 250),
            STREET_NAMES[self.rng.int_n(STREET_NAMES.len())],
            STREET_SUFFIXES[self.rng.int_n(STREET_SUFFIXES.len())],
        );
        let (rooms, bathrooms) = match room_type {
            RoomType::Single | RoomType::Shared => (1, 1),
            RoomType::Studio => (1, self.int_range(1, 2)),
            RoomType::Apartment => (self.int_range(1, 4), self.int_range(1, 3)),
            RoomType::House => (self.int_range(2, 6), self.int_range(1, 4)),
        };
        let rent_step = match room_type {
            RoomType::Shared => self.int_range(4, 12),
            RoomType::Single | RoomType::Studio => self.int_range(8, 25),
            RoomType::Apartment => self.int_range(15, 60),
            RoomType::House => self.int_range(30, 120),
        };
        let created = reference_now() - time::Duration::days(i64::from(self.int_range(1, 400)));

        Room {
            id: RoomId::new(id),
            room_number: if self.rng.bool() {
                Some(RoomNumber::Text(format!(
                    "{}{:02}",
                    self.int_range(1, 9),
                    self.int_range(1, 20)
                )))
            } else {
                None
            },
            room_type,
            address: Address {
                street,
                city: city.to_owned(),
                state: state.to_owned(),
                zip_code: (zip_base + self.int_range(0, 40)).to_string(),
            },
            rent_price: f64::from(rent_step * 500),
            number_of_rooms: rooms,
            number_of_bathrooms: bathrooms,
            is_available: self.rng.bool(),
            created_at: Some(created),
            updated_at: Some(created),
            extra: Map::new(),
        }
    }

    pub fn rooms(&mut self, count: usize) -> Vec<Room> {
        (0..count).map(|_| self.room()).collect()
    }

    fn int_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + self.rng.int_n((max - min + 1) as usize) as u32
    }
}

/// Counts of calls a [`MemoryBackend`] has served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub renters_checks: usize,
    pub relation_checks: usize,
    pub updates: usize,
    pub deletes: usize,
}

/// In-memory [`RoomBackend`] with failure injection, used by tests and by
/// the demo mode.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    pub rooms: Vec<Room>,
    pub occupied: BTreeSet<RoomId>,
    pub fail_list: bool,
    pub fail_renters_check: bool,
    pub fail_relation_check: bool,
    pub fail_update: bool,
    pub fail_delete: bool,
    pub echo_updates: bool,
    pub calls: CallCounts,
    pub updates_received: Vec<Room>,
}

impl MemoryBackend {
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        Self {
            rooms,
            echo_updates: true,
            ..Self::default()
        }
    }

    /// Seeded demo data: a handful of rooms, the first one occupied.
    pub fn demo(seed: u64) -> Self {
        let mut faker = RoomFaker::new(seed);
        let mut rooms = faker.rooms(6);
        if let Some(first) = rooms.first_mut() {
            first.is_available = false;
        }
        let mut backend = Self::with_rooms(rooms);
        if let Some(first) = backend.rooms.first() {
            backend.occupied.insert(first.id.clone());
        }
        backend
    }

    pub fn occupy(&mut self, room_id: &RoomId) {
        self.occupied.insert(room_id.clone());
    }
}

impl RoomBackend for MemoryBackend {
    fn list_rooms(&mut self) -> Result<Vec<Room>> {
        self.calls.list += 1;
        if self.fail_list {
            bail!("connection refused");
        }
        Ok(self.rooms.clone())
    }

    fn room_has_renters(&mut self, room_id: &RoomId) -> Result<bool> {
        self.calls.renters_checks += 1;
        if self.fail_renters_check {
            bail!("connection refused");
        }
        Ok(self.occupied.contains(room_id))
    }

    fn room_relation_exists(&mut self, room_id: &RoomId) -> Result<bool> {
        self.calls.relation_checks += 1;
        if self.fail_relation_check {
            bail!("connection refused");
        }
        Ok(self.occupied.contains(room_id))
    }

    fn update_room(&mut self, room: &Room) -> Result<Option<Room>> {
        self.calls.updates += 1;
        self.updates_received.push(room.clone());
        if self.fail_update {
            bail!("server error (500): update failed");
        }
        let Some(slot) = self.rooms.iter_mut().find(|stored| stored.id == room.id) else {
            bail!("server error (404): room not found");
        };
        *slot = room.clone();
        slot.updated_at = Some(reference_now());
        Ok(self.echo_updates.then(|| slot.clone()))
    }

    fn delete_room(&mut self, room_id: &RoomId) -> Result<()> {
        self.calls.deletes += 1;
        if self.fail_delete {
            bail!("server error (500): delete failed");
        }
        self.rooms.retain(|room| &room.id != room_id);
        Ok(())
    }
}

fn reference_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(REFERENCE_YEAR, Month::January, 1)
        .unwrap_or(Date::MIN);
    date.with_time(Time::MIDNIGHT).assume_utc()
}

#[cfg(test)]
mod tests {
    use super::{MemoryBackend, RoomFaker};
    use roomdesk_app::{RoomBackend, RoomId};
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = RoomFaker::new(42);
        let mut right = RoomFaker::new(42);
        assert_eq!(left.room(), right.room());
    }

    #[test]
    fn room_fields_are_populated() {
        let mut faker = RoomFaker::new(1);
        for room in faker.rooms(20) {
            assert!(!room.address.street.is_empty());
            assert!(!room.address.city.is_empty());
            assert!(room.rent_price > 0.0);
            assert!(room.number_of_rooms >= 1);
            assert!(room.number_of_bathrooms >= 1);
        }
    }

    #[test]
    fn ids_are_unique_and_sequential() {
        let mut faker = RoomFaker::new(3);
        let ids: BTreeSet<String> = faker
            .rooms(10)
            .into_iter()
            .map(|room| room.id.to_string())
            .collect();
        assert_eq!(ids.len(), 10);
        assert!(ids.contains("room-001"));
    }

    #[test]
    fn variety_across_seeds() {
        let mut cities = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            let mut faker = RoomFaker::new(seed);
            cities.insert(faker.room().address.city);
        }
        assert!(cities.len() >= 4, "got {}", cities.len());
    }

    #[test]
    fn demo_backend_marks_first_room_occupied() -> anyhow::Result<()> {
        let mut backend = MemoryBackend::demo(7);
        let rooms = backend.list_rooms()?;
        assert_eq!(rooms.len(), 6);
        assert!(backend.room_relation_exists(&rooms[0].id)?);
        assert!(!rooms[0].is_available);
        assert!(!backend.room_has_renters(&rooms[1].id)?);
        Ok(())
    }

    #[test]
    fn memory_backend_update_and_delete_mutate_store() -> anyhow::Result<()> {
        let mut backend = MemoryBackend::with_rooms(RoomFaker::new(5).rooms(3));
        let mut edited = backend.rooms[1].clone();
        edited.rent_price = 123.0;

        let echoed = backend.update_room(&edited)?;
        assert_eq!(echoed.map(|room| room.rent_price), Some(123.0));
        assert_eq!(backend.rooms[1].rent_price, 123.0);

        backend.delete_room(&RoomId::new("room-002"))?;
        assert_eq!(backend.rooms.len(), 2);
        assert_eq!(backend.calls.updates, 1);
        assert_eq!(backend.calls.deletes, 1);
        Ok(())
    }

    #[test]
    fn int_n() {
        let mut faker = RoomFaker::new(42);
        for _ in 0..100 {
            assert!(faker.int_n(5) < 5);
        }
    }
}
