//! Housing form fields and the request payload built from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::number::{coerce_number, serialize_number};
use crate::error::FormError;

/// Square feet in one square meter.
pub const SQFT_PER_SQM: f64 = 10.7639;

/// Convert square meters to whole square feet.
pub fn sqm_to_sqft(area_m2: f64) -> f64 {
    round_half_up(area_m2 * SQFT_PER_SQM)
}

/// Nearest integer, halves toward positive infinity (`-2.5` becomes `-2`).
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Furnishing level of the property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnishingStatus {
    #[default]
    Furnished,
    SemiFurnished,
    Unfurnished,
}

impl FurnishingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FurnishingStatus::Furnished => "furnished",
            FurnishingStatus::SemiFurnished => "semi-furnished",
            FurnishingStatus::Unfurnished => "unfurnished",
        }
    }
}

impl fmt::Display for FurnishingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FurnishingStatus {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "furnished" => Ok(Self::Furnished),
            "semi-furnished" => Ok(Self::SemiFurnished),
            "unfurnished" => Ok(Self::Unfurnished),
            other => Err(FormError::InvalidValue {
                field: "furnishingstatus".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Yes/no features of the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amenity {
    MainRoad,
    GuestRoom,
    Basement,
    HotWaterHeating,
    AirConditioning,
    PreferredArea,
}

impl Amenity {
    pub const ALL: [Amenity; 6] = [
        Amenity::MainRoad,
        Amenity::GuestRoom,
        Amenity::Basement,
        Amenity::HotWaterHeating,
        Amenity::AirConditioning,
        Amenity::PreferredArea,
    ];

    /// Wire name of the flag.
    pub fn field_name(&self) -> &'static str {
        match self {
            Amenity::MainRoad => "mainroad",
            Amenity::GuestRoom => "guestroom",
            Amenity::Basement => "basement",
            Amenity::HotWaterHeating => "hotwaterheating",
            Amenity::AirConditioning => "airconditioning",
            Amenity::PreferredArea => "prefarea",
        }
    }

    fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.field_name() == name)
    }
}

/// A single edit to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Area(String),
    Bedrooms(String),
    Bathrooms(String),
    Stories(String),
    Parking(String),
    Amenity(Amenity, bool),
    Furnishing(FurnishingStatus),
}

/// Current form values. Numeric fields keep the raw entered text;
/// conversion happens only when a payload is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    /// Square meters.
    pub area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub stories: String,
    pub parking: String,
    pub mainroad: bool,
    pub guestroom: bool,
    pub basement: bool,
    pub hotwaterheating: bool,
    pub airconditioning: bool,
    pub prefarea: bool,
    pub furnishingstatus: FurnishingStatus,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            area: "100".to_string(),
            bedrooms: "3".to_string(),
            bathrooms: "1".to_string(),
            stories: "1".to_string(),
            parking: "1".to_string(),
            mainroad: true,
            guestroom: false,
            basement: false,
            hotwaterheating: false,
            airconditioning: false,
            prefarea: false,
            furnishingstatus: FurnishingStatus::Furnished,
        }
    }
}

impl FormData {
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Area(v) => self.area = v,
            FieldEdit::Bedrooms(v) => self.bedrooms = v,
            FieldEdit::Bathrooms(v) => self.bathrooms = v,
            FieldEdit::Stories(v) => self.stories = v,
            FieldEdit::Parking(v) => self.parking = v,
            FieldEdit::Amenity(amenity, on) => *self.amenity_mut(amenity) = on,
            FieldEdit::Furnishing(status) => self.furnishingstatus = status,
        }
    }

    /// Edit a field by its wire name.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let edit = FieldEdit::parse(name, value)?;
        self.apply(edit);
        Ok(())
    }

    pub fn amenity(&self, amenity: Amenity) -> bool {
        match amenity {
            Amenity::MainRoad => self.mainroad,
            Amenity::GuestRoom => self.guestroom,
            Amenity::Basement => self.basement,
            Amenity::HotWaterHeating => self.hotwaterheating,
            Amenity::AirConditioning => self.airconditioning,
            Amenity::PreferredArea => self.prefarea,
        }
    }

    fn amenity_mut(&mut self, amenity: Amenity) -> &mut bool {
        match amenity {
            Amenity::MainRoad => &mut self.mainroad,
            Amenity::GuestRoom => &mut self.guestroom,
            Amenity::Basement => &mut self.basement,
            Amenity::HotWaterHeating => &mut self.hotwaterheating,
            Amenity::AirConditioning => &mut self.airconditioning,
            Amenity::PreferredArea => &mut self.prefarea,
        }
    }

    /// Build the payload sent to the prediction service.
    pub fn to_payload(&self) -> RequestPayload {
        RequestPayload {
            area: sqm_to_sqft(coerce_number(&self.area)),
            bedrooms: coerce_number(&self.bedrooms),
            bathrooms: coerce_number(&self.bathrooms),
            stories: coerce_number(&self.stories),
            mainroad: self.mainroad,
            guestroom: self.guestroom,
            basement: self.basement,
            hotwaterheating: self.hotwaterheating,
            airconditioning: self.airconditioning,
            parking: coerce_number(&self.parking),
            prefarea: self.prefarea,
            furnishingstatus: self.furnishingstatus,
        }
    }
}

impl FieldEdit {
    pub fn parse(name: &str, value: &str) -> Result<Self, FormError> {
        let edit = match name {
            "area" => FieldEdit::Area(value.to_string()),
            "bedrooms" => FieldEdit::Bedrooms(value.to_string()),
            "bathrooms" => FieldEdit::Bathrooms(value.to_string()),
            "stories" => FieldEdit::Stories(value.to_string()),
            "parking" => FieldEdit::Parking(value.to_string()),
            "furnishingstatus" => FieldEdit::Furnishing(value.parse()?),
            other => {
                let amenity = Amenity::from_field_name(other)
                    .ok_or_else(|| FormError::UnknownField(other.to_string()))?;
                FieldEdit::Amenity(amenity, parse_flag(other, value)?)
            }
        };
        Ok(edit)
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool, FormError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(FormError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Body of `POST /predict`. Area is in square feet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPayload {
    #[serde(serialize_with = "serialize_number")]
    pub area: f64,
    #[serde(serialize_with = "serialize_number")]
    pub bedrooms: f64,
    #[serde(serialize_with = "serialize_number")]
    pub bathrooms: f64,
    #[serde(serialize_with = "serialize_number")]
    pub stories: f64,
    pub mainroad: bool,
    pub guestroom: bool,
    pub basement: bool,
    pub hotwaterheating: bool,
    pub airconditioning: bool,
    #[serde(serialize_with = "serialize_number")]
    pub parking: f64,
    pub prefarea: bool,
    pub furnishingstatus: FurnishingStatus,
}
