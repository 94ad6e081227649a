//! Material, color and support options for a print.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShopError;

/// Filament material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Pla,
    Abs,
    Petg,
    Tpu,
}

impl Material {
    /// All materials in catalogue order.
    pub const ALL: [Material; 4] = [Material::Pla, Material::Abs, Material::Petg, Material::Tpu];

    /// Material cost per cm³.
    pub fn cost_per_cm3(&self) -> f64 {
        match self {
            Material::Pla => 0.05,
            Material::Abs => 0.06,
            Material::Petg => 0.07,
            Material::Tpu => 0.09,
        }
    }

    /// Whether the material can be ordered. Only PLA is stocked.
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Material::Pla)
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Pla => "pla",
            Material::Abs => "abs",
            Material::Petg => "petg",
            Material::Tpu => "tpu",
        }
    }

    /// Short catalogue description.
    pub fn description(&self) -> &'static str {
        match self {
            Material::Pla => "Standard material, good for most prints. Biodegradable and easy to print.",
            Material::Abs => "Durable and heat-resistant. Good for functional parts.",
            Material::Petg => "Combines strength of ABS with ease of printing like PLA.",
            Material::Tpu => "Flexible material, good for parts that need to bend.",
        }
    }

    /// Printing temperature and strength note.
    pub fn print_note(&self) -> &'static str {
        match self {
            Material::Pla => "Printing temp: 190-220°C, Medium strength",
            Material::Abs => "Printing temp: 220-250°C, High strength",
            Material::Petg => "Printing temp: 230-250°C, High strength, Flexible",
            Material::Tpu => "Printing temp: 210-230°C, Medium strength, Very flexible",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Material {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pla" => Ok(Material::Pla),
            "abs" => Ok(Material::Abs),
            "petg" => Ok(Material::Petg),
            "tpu" => Ok(Material::Tpu),
            _ => Err(invalid("material", "pla|abs|petg|tpu", s)),
        }
    }
}

/// Filament color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Black,
    Red,
    Blue,
    Gray,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Gray => "gray",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "blue" => Ok(Color::Blue),
            "gray" | "grey" => Ok(Color::Gray),
            _ => Err(invalid("color", "white|black|red|blue|gray", s)),
        }
    }
}

/// Support scaffolding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportStructure {
    None,
    #[default]
    Auto,
    Everywhere,
    Buildplate,
}

impl SupportStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStructure::None => "none",
            SupportStructure::Auto => "auto",
            SupportStructure::Everywhere => "everywhere",
            SupportStructure::Buildplate => "buildplate",
        }
    }
}

impl fmt::Display for SupportStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportStructure {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(SupportStructure::None),
            "auto" => Ok(SupportStructure::Auto),
            "everywhere" => Ok(SupportStructure::Everywhere),
            "buildplate" => Ok(SupportStructure::Buildplate),
            _ => Err(invalid("support", "none|auto|everywhere|buildplate", s)),
        }
    }
}

fn invalid(field: &str, expected: &str, value: &str) -> ShopError {
    ShopError::InvalidValue {
        field: field.to_string(),
        expected: expected.to_string(),
        value: value.to_string(),
    }
}
