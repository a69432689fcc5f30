//! Data models for traditional liquor entries and the saved document

use serde::{Deserialize, Serialize};

/// One traditional liquor entry scraped from the encyclopedia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liquor {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "ABV")]
    pub abv: String,
    pub volume: String,
    pub price: String,
    pub ingredients: Vec<String>,
    pub manufacturer: String,
    pub owner: String,
    pub address: Address,
    pub phone: String,
    pub source: String,
    pub image: String,
}

/// Canonical beverage class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "탁주")]
    Takju,
    #[serde(rename = "약주")]
    Yakju,
    #[serde(rename = "소주/증류주")]
    Soju,
    #[serde(rename = "과실주")]
    FruitWine,
    #[serde(rename = "리큐르")]
    Liqueur,
    #[serde(rename = "기타")]
    Other,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Takju => "탁주",
            Self::Yakju => "약주",
            Self::Soju => "소주/증류주",
            Self::FruitWine => "과실주",
            Self::Liqueur => "리큐르",
            Self::Other => "기타",
        }
    }
}

/// Address of the manufacturer.
///
/// Older runs stored the profile text as-is; geocoded runs store a
/// [`Location`]. Untagged so both shapes load from the same file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Geocoded(Location),
    Raw(String),
}

/// Coordinates and administrative regions resolved by the geocoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub province: String,
    pub city: String,
}

/// Canonical field names a profile row can translate into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Category,
    Abv,
    Volume,
    Price,
    Ingredients,
    Manufacturer,
    Owner,
    Address,
    Phone,
}

impl Field {
    /// Key used for this field in the saved JSON
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "type",
            Self::Abv => "ABV",
            Self::Volume => "volume",
            Self::Price => "price",
            Self::Ingredients => "ingredients",
            Self::Manufacturer => "manufacturer",
            Self::Owner => "owner",
            Self::Address => "address",
            Self::Phone => "phone",
        }
    }
}

/// Top-level object written to `<name>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: Vec<Liquor>,
}
