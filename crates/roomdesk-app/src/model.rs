// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use time::OffsetDateTime;

use crate::ids::RoomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Shared,
    Studio,
    Apartment,
    House,
}

impl RoomType {
    pub const ALL: [Self; 5] = [
        Self::Single,
        Self::Shared,
        Self::Studio,
        Self::Apartment,
        Self::House,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Shared => "shared",
            Self::Studio => "studio",
            Self::Apartment => "apartment",
            Self::House => "house",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Shared => "Shared",
            Self::Studio => "Studio",
            Self::Apartment => "Apartment",
            Self::House => "House",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "shared" => Some(Self::Shared),
            "studio" => Some(Self::Studio),
            "apartment" => Some(Self::Apartment),
            "house" => Some(Self::House),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Room number in the JSON form it arrived in, so a full replace writes a
/// numeric number back as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomNumber {
    Number(Number),
    Text(String),
}

impl RoomNumber {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl Address {
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.street, self.city, self.state, self.zip_code
        )
    }
}

/// A landlord's room as the backend reports it.
///
/// Fields this client does not model are kept in `extra` and written back
/// unchanged, because the update endpoint replaces the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: RoomId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<RoomNumber>,
    #[serde(deserialize_with = "lenient_room_type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub address: Address,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rent_price: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub number_of_rooms: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub number_of_bathrooms: u32,
    #[serde(default)]
    pub is_available: bool,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    pub fn room_number_label(&self) -> String {
        match &self.room_number {
            Some(RoomNumber::Text(text)) if text.trim().is_empty() => "N/A".to_owned(),
            Some(number) => number.to_string(),
            None => "N/A".to_owned(),
        }
    }

    pub fn rent_label(&self) -> String {
        format!("₹{}", format_amount(self.rent_price))
    }

    pub fn availability_label(&self) -> &'static str {
        if self.is_available {
            "Available"
        } else {
            "Not Available"
        }
    }
}

pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrText::Number(value)) => Ok(value),
        Some(NumberOrText::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| de::Error::custom(format!("invalid number {raw:?}")))
        }
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrText::Number(value)) => {
            if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
                return Err(de::Error::custom(format!("invalid count {value}")));
            }
            Ok(value as u32)
        }
        Some(NumberOrText::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<u32>()
                .map_err(|_| de::Error::custom(format!("invalid count {raw:?}")))
        }
    }
}

/// Stored rooms carry `"Single"` as well as `"single"`.
fn lenient_room_type<'de, D>(deserializer: D) -> Result<RoomType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    RoomType::parse(&raw).ok_or_else(|| {
        let expected: Vec<&str> = RoomType::ALL.iter().map(|kind| kind.as_str()).collect();
        de::Error::custom(format!(
            "unknown room type {raw:?}, expected one of {}",
            expected.join(", ")
        ))
    })
}
