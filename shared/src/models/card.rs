//! Card Model

use crate::serde_helpers;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque card identifier assigned by the remote store on create
///
/// The server may send ids as JSON numbers or strings; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_helpers::text(deserializer).map(CardId)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Card rarity, a fixed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    #[serde(rename = "Ultra Rare")]
    UltraRare,
    #[serde(rename = "Secret Rare")]
    SecretRare,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::UltraRare,
        Rarity::SecretRare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::UltraRare => "Ultra Rare",
            Rarity::SecretRare => "Secret Rare",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = String;

    /// Accepts the wire form ("Ultra Rare") as well as compact spellings
    /// ("ultra-rare", "ultrarare"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Rarity::ALL
            .into_iter()
            .find(|r| r.as_str().replace(' ', "").to_ascii_lowercase() == folded)
            .ok_or_else(|| format!("unknown rarity: {s}"))
    }
}

/// Stock state derived from quantities, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockState {
    /// More than one copy remains
    Available,
    /// Exactly one copy remains
    LowStock,
    /// Every copy is checked out
    OutOfStock,
}

fn default_total_quantity() -> u32 {
    1
}

/// Collectible card entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(
        rename = "pokemon_name",
        default,
        deserialize_with = "serde_helpers::option_text"
    )]
    pub subject_name: Option<String>,
    #[serde(
        rename = "energy_type",
        default,
        deserialize_with = "serde_helpers::option_text"
    )]
    pub category: Option<String>,
    #[serde(
        rename = "card_rarity",
        default,
        deserialize_with = "serde_helpers::option_parsed"
    )]
    pub rarity: Option<Rarity>,
    #[serde(default, deserialize_with = "serde_helpers::option_text")]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::option_text")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::option_text")]
    pub card_number: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::option_text")]
    pub description: Option<String>,
    /// Remote image URL, if one was uploaded
    #[serde(default, deserialize_with = "serde_helpers::option_text")]
    pub card_image: Option<String>,
    #[serde(
        default = "default_total_quantity",
        deserialize_with = "serde_helpers::quantity"
    )]
    pub total_quantity: u32,
    #[serde(default, deserialize_with = "serde_helpers::quantity")]
    pub checked_out_quantity: u32,
}

impl Card {
    /// Minimal card with no copies checked out
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, total_quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject_name: None,
            category: None,
            rarity: None,
            length: None,
            weight: None,
            card_number: None,
            description: None,
            card_image: None,
            total_quantity,
            checked_out_quantity: 0,
        }
    }

    pub fn with_checked_out(mut self, checked_out_quantity: u32) -> Self {
        self.checked_out_quantity = checked_out_quantity;
        self
    }

    /// Copies not currently checked out
    pub fn remaining(&self) -> u32 {
        self.total_quantity.saturating_sub(self.checked_out_quantity)
    }

    pub fn stock_state(&self) -> StockState {
        match self.remaining() {
            0 => StockState::OutOfStock,
            1 => StockState::LowStock,
            _ => StockState::Available,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.checked_out_quantity >= self.total_quantity
    }

    /// Exactly one unit remains
    pub fn is_low_stock(&self) -> bool {
        self.remaining() == 1
    }

    /// `0 <= checked_out_quantity <= total_quantity`
    pub fn is_consistent(&self) -> bool {
        self.checked_out_quantity <= self.total_quantity
    }
}
