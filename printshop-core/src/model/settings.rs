//! Print parameters with clamped numeric domains.

use serde::{Deserialize, Serialize};

use super::material::{Color, Material, SupportStructure};

/// Snap `value` into `[min, max]` on a grid of `step`, rounding to nearest.
fn snap(value: i64, min: i64, max: i64, step: i64) -> i64 {
    let clamped = value.clamp(min, max);
    let offset = clamped - min;
    let snapped = min + ((offset + step / 2) / step) * step;
    snapped.min(max)
}

/// Layer height, held in hundredths of a millimetre (10 to 30, step 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct LayerHeight(u8);

impl LayerHeight {
    pub const MIN_HUNDREDTHS: u8 = 10;
    pub const MAX_HUNDREDTHS: u8 = 30;
    pub const STEP_HUNDREDTHS: u8 = 5;

    /// Build from millimetres, clamping to 0.10..=0.30 and snapping to 0.05.
    pub fn from_mm(mm: f64) -> Self {
        Self::from_hundredths((mm * 100.0).round() as i64)
    }

    /// Build from slider hundredths, clamping and snapping.
    pub fn from_hundredths(hundredths: i64) -> Self {
        let v = snap(
            hundredths,
            Self::MIN_HUNDREDTHS as i64,
            Self::MAX_HUNDREDTHS as i64,
            Self::STEP_HUNDREDTHS as i64,
        );
        LayerHeight(v as u8)
    }

    /// Value in millimetres.
    pub fn mm(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn hundredths(&self) -> u8 {
        self.0
    }

    /// Every selectable layer height, finest first.
    pub fn all() -> impl Iterator<Item = LayerHeight> {
        (Self::MIN_HUNDREDTHS..=Self::MAX_HUNDREDTHS)
            .step_by(Self::STEP_HUNDREDTHS as usize)
            .map(LayerHeight)
    }
}

impl Default for LayerHeight {
    fn default() -> Self {
        LayerHeight(20)
    }
}

impl From<f64> for LayerHeight {
    fn from(mm: f64) -> Self {
        LayerHeight::from_mm(mm)
    }
}

impl From<LayerHeight> for f64 {
    fn from(lh: LayerHeight) -> Self {
        lh.mm()
    }
}

/// Infill density in percent (10 to 100, step 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Infill(u8);

impl Infill {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 100;
    pub const STEP: u8 = 5;

    /// Build from a percentage, clamping and snapping.
    pub fn new(percent: i64) -> Self {
        let v = snap(percent, Self::MIN as i64, Self::MAX as i64, Self::STEP as i64);
        Infill(v as u8)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Every selectable infill, lightest first.
    pub fn all() -> impl Iterator<Item = Infill> {
        (Self::MIN..=Self::MAX).step_by(Self::STEP as usize).map(Infill)
    }
}

impl Default for Infill {
    fn default() -> Self {
        Infill(20)
    }
}

impl From<i64> for Infill {
    fn from(percent: i64) -> Self {
        Infill::new(percent)
    }
}

impl From<Infill> for i64 {
    fn from(infill: Infill) -> Self {
        infill.0 as i64
    }
}

/// The configurable print parameters of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettings {
    pub material: Material,
    pub color: Color,
    pub layer_height: LayerHeight,
    pub infill: Infill,
    pub support_structure: SupportStructure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layer_height_clamp_and_snap() {
        assert_eq!(LayerHeight::from_mm(0.05).hundredths(), 10);
        assert_eq!(LayerHeight::from_mm(0.5).hundredths(), 30);
        assert_eq!(LayerHeight::from_mm(0.12).hundredths(), 10);
        assert_eq!(LayerHeight::from_mm(0.13).hundredths(), 15);
        assert_eq!(LayerHeight::from_mm(f64::NAN).hundredths(), 10);
        assert_eq!(LayerHeight::default().mm(), 0.2);
    }

    #[test]
    fn test_layer_height_domain() {
        let all: Vec<u8> = LayerHeight::all().map(|l| l.hundredths()).collect();
        assert_eq!(all, vec![10, 15, 20, 25, 30]);
    }

    #[test]
    fn test_infill_clamp_and_snap() {
        assert_eq!(Infill::new(0).percent(), 10);
        assert_eq!(Infill::new(250).percent(), 100);
        assert_eq!(Infill::new(22).percent(), 20);
        assert_eq!(Infill::new(23).percent(), 25);
        assert_eq!(Infill::all().count(), 19);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = PrintSettings::default();
        assert_eq!(settings.material, Material::Pla);
        assert_eq!(settings.color, Color::White);
        assert_eq!(settings.layer_height.hundredths(), 20);
        assert_eq!(settings.infill.percent(), 20);
        assert_eq!(settings.support_structure, SupportStructure::Auto);
    }

    #[test]
    fn test_settings_json_clamps() {
        let json = r#"{"material":"pla","color":"red","layerHeight":0.9,"infill":3,"supportStructure":"none"}"#;
        let settings: PrintSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.layer_height.hundredths(), 30);
        assert_eq!(settings.infill.percent(), 10);
        assert_eq!(settings.color, Color::Red);
    }
}
