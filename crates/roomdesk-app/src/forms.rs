// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{Room, RoomType};

/// An editable field of a room in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    Street,
    City,
    State,
    ZipCode,
    RentPrice,
    RoomType,
    NumberOfRooms,
    NumberOfBathrooms,
    Available,
}

impl RoomField {
    pub const ALL: [Self; 9] = [
        Self::Street,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::RentPrice,
        Self::RoomType,
        Self::NumberOfRooms,
        Self::NumberOfBathrooms,
        Self::Available,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "Zip Code",
            Self::RentPrice => "Rent Price",
            Self::RoomType => "Room Type",
            Self::NumberOfRooms => "Number of Rooms",
            Self::NumberOfBathrooms => "Number of Bathrooms",
            Self::Available => "Available",
        }
    }

    /// Fields edited by typing; the rest are toggled or cycled.
    pub const fn is_text(self) -> bool {
        !matches!(self, Self::RoomType | Self::Available)
    }

    pub fn current_text(self, room: &Room) -> String {
        match self {
            Self::Street => room.address.street.clone(),
            Self::City => room.address.city.clone(),
            Self::State => room.address.state.clone(),
            Self::ZipCode => room.address.zip_code.clone(),
            Self::RentPrice => crate::format_amount(room.rent_price),
            Self::RoomType => room.room_type.as_str().to_owned(),
            Self::NumberOfRooms => room.number_of_rooms.to_string(),
            Self::NumberOfBathrooms => room.number_of_bathrooms.to_string(),
            Self::Available => room.is_available.to_string(),
        }
    }

    pub fn parse_input(self, raw: &str) -> Result<FieldEdit> {
        let trimmed = raw.trim();
        let edit = match self {
            Self::Street => FieldEdit::Street(raw.to_owned()),
            Self::City => FieldEdit::City(raw.to_owned()),
            Self::State => FieldEdit::State(raw.to_owned()),
            Self::ZipCode => FieldEdit::ZipCode(raw.to_owned()),
            Self::RentPrice => {
                let Ok(value) = trimmed.parse::<f64>() else {
                    bail!("rent price must be a number -- for example 4500 or 4500.50");
                };
                if !value.is_finite() || value < 0.0 {
                    bail!("rent price cannot be negative");
                }
                FieldEdit::RentPrice(value)
            }
            Self::RoomType => match RoomType::parse(trimmed) {
                Some(kind) => FieldEdit::RoomType(kind),
                None => bail!("room type must be one of single, shared, studio, apartment, house"),
            },
            Self::NumberOfRooms => FieldEdit::NumberOfRooms(parse_count(self, trimmed)?),
            Self::NumberOfBathrooms => FieldEdit::NumberOfBathrooms(parse_count(self, trimmed)?),
            Self::Available => match trimmed.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => FieldEdit::Available(true),
                "0" | "false" | "off" | "no" => FieldEdit::Available(false),
                _ => bail!("availability must be yes or no"),
            },
        };
        Ok(edit)
    }
}

fn parse_count(field: RoomField, raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(value) => Ok(value),
        Err(_) => bail!(
            "{} must be a whole number of zero or more",
            field.label().to_ascii_lowercase()
        ),
    }
}

/// A single typed change to a room.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Street(String),
    City(String),
    State(String),
    ZipCode(String),
    RentPrice(f64),
    RoomType(RoomType),
    NumberOfRooms(u32),
    NumberOfBathrooms(u32),
    Available(bool),
}

impl FieldEdit {
    pub const fn field(&self) -> RoomField {
        match self {
            Self::Street(_) => RoomField::Street,
            Self::City(_) => RoomField::City,
            Self::State(_) => RoomField::State,
            Self::ZipCode(_) => RoomField::ZipCode,
            Self::RentPrice(_) => RoomField::RentPrice,
            Self::RoomType(_) => RoomField::RoomType,
            Self::NumberOfRooms(_) => RoomField::NumberOfRooms,
            Self::NumberOfBathrooms(_) => RoomField::NumberOfBathrooms,
            Self::Available(_) => RoomField::Available,
        }
    }

    /// Returns a copy of `room` with this change merged in.
    pub fn applied_to(&self, room: &Room) -> Room {
        let mut updated = room.clone();
        match self {
            Self::Street(value) => updated.address.street = value.clone(),
            Self::City(value) => updated.address.city = value.clone(),
            Self::State(value) => updated.address.state = value.clone(),
            Self::ZipCode(value) => updated.address.zip_code = value.clone(),
            Self::RentPrice(value) => updated.rent_price = *value,
            Self::RoomType(value) => updated.room_type = *value,
            Self::NumberOfRooms(value) => updated.number_of_rooms = *value,
            Self::NumberOfBathrooms(value) => updated.number_of_bathrooms = *value,
            Self::Available(value) => updated.is_available = *value,
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldEdit, RoomField};
    use crate::{Address, Room, RoomId, RoomType};
    use serde_json::Map;

    fn room() -> Room {
        Room {
            id: RoomId::new("r1"),
            room_number: None,
            room_type: RoomType::Single,
            address: Address {
                street: "1 Main".to_owned(),
                city: "Pune".to_owned(),
                state: "MH".to_owned(),
                zip_code: "411001".to_owned(),
            },
            rent_price: 3000.0,
            number_of_rooms: 1,
            number_of_bathrooms: 1,
            is_available: true,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn rent_price_rejects_text_and_negatives() {
        assert!(RoomField::RentPrice.parse_input("abc").is_err());
        assert!(RoomField::RentPrice.parse_input("-5").is_err());
        assert_eq!(
            RoomField::RentPrice.parse_input(" 4200.5 ").ok(),
            Some(FieldEdit::RentPrice(4200.5))
        );
    }

    #[test]
    fn counts_require_whole_numbers() {
        let error = RoomField::NumberOfBathrooms
            .parse_input("1.5")
            .expect_err("fractional count should fail");
        assert!(error.to_string().contains("number of bathrooms"));
        assert_eq!(
            RoomField::NumberOfRooms.parse_input("3").ok(),
            Some(FieldEdit::NumberOfRooms(3))
        );
    }

    #[test]
    fn address_edit_only_touches_its_sub_field() {
        let original = room();
        let updated = FieldEdit::City("Mumbai".to_owned()).applied_to(&original);
        assert_eq!(updated.address.city, "Mumbai");
        assert_eq!(updated.address.street, original.address.street);
        assert_eq!(updated.rent_price, original.rent_price);
        assert_eq!(original.address.city, "Pune");
    }

    #[test]
    fn current_text_reflects_room_values() {
        let room = room();
        assert_eq!(RoomField::RentPrice.current_text(&room), "3000");
        assert_eq!(RoomField::ZipCode.current_text(&room), "411001");
        assert!(!RoomField::Available.is_text());
        assert!(RoomField::Street.is_text());
    }
}
