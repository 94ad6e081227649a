//! Price estimation for a print order.
//!
//! The volume is a stand-in: it scales the file size in MiB by a constant
//! instead of measuring the mesh. Mesh size and file size are only loosely
//! related (binary vs ASCII STL, compression in 3MF), so quotes are rough.
//! Keep the proxy until geometry analysis is an actual requirement.

use serde::Serialize;

use crate::config::{
    BASE_FEE, BYTES_PER_MIB, MACHINE_COST_PER_HOUR, MINUTES_PER_CM3, REFERENCE_INFILL_PERCENT,
    REFERENCE_LAYER_HEIGHT_MM, SHIPPING_COST, VOLUME_CM3_PER_MIB,
};
use crate::model::{OrderState, PrintSettings};

/// Cost breakdown derived from the current file and settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub volume_estimate_cm3: f64,
    pub print_time_minutes: u64,
    pub material_cost: f64,
    pub machine_cost: f64,
    pub base_fee: f64,
    pub total: f64,
}

/// Pricing view of an order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Quote {
    /// No file yet; nothing to price.
    #[default]
    AwaitingUpload,
    Priced(PriceBreakdown),
}

impl Quote {
    /// Breakdown when priced.
    pub fn breakdown(&self) -> Option<&PriceBreakdown> {
        match self {
            Quote::AwaitingUpload => None,
            Quote::Priced(b) => Some(b),
        }
    }

    /// Total, zero while awaiting upload.
    pub fn total(&self) -> f64 {
        self.breakdown().map(|b| b.total).unwrap_or(0.0)
    }
}

/// Volume proxy in cm³ from the file size.
pub fn estimate_volume_cm3(file_size_bytes: u64) -> f64 {
    (file_size_bytes as f64 / BYTES_PER_MIB) * VOLUME_CM3_PER_MIB
}

/// Print time in whole minutes. Thinner layers and denser infill take longer.
pub fn estimate_print_time(volume_cm3: f64, settings: &PrintSettings) -> u64 {
    let base_time = volume_cm3 * MINUTES_PER_CM3;
    let layer_factor = REFERENCE_LAYER_HEIGHT_MM / settings.layer_height.mm();
    let infill_factor = settings.infill.percent() as f64 / REFERENCE_INFILL_PERCENT;
    (base_time * layer_factor * infill_factor).round() as u64
}

/// Price a file of `file_size_bytes` with `settings`.
pub fn estimate(file_size_bytes: u64, settings: &PrintSettings) -> PriceBreakdown {
    let volume = estimate_volume_cm3(file_size_bytes);
    let print_time = estimate_print_time(volume, settings);
    let material_cost = volume * settings.material.cost_per_cm3();
    let machine_cost = (print_time as f64 / 60.0) * MACHINE_COST_PER_HOUR;

    PriceBreakdown {
        volume_estimate_cm3: volume,
        print_time_minutes: print_time,
        material_cost,
        machine_cost,
        base_fee: BASE_FEE,
        total: material_cost + machine_cost + BASE_FEE,
    }
}

/// Price the order as it stands.
pub fn quote(order: &OrderState) -> Quote {
    match order.file_size() {
        Some(size) => Quote::Priced(estimate(size, &order.settings)),
        None => Quote::AwaitingUpload,
    }
}

/// Format minutes as `"{h}h {m}m"` above an hour, else `"{m}m"`.
pub fn format_print_time(minutes: u64) -> String {
    if minutes > 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Totals shown on the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl CheckoutSummary {
    pub fn from_quote(quote: &Quote) -> Option<Self> {
        quote.breakdown().map(|b| Self {
            subtotal: b.total,
            shipping: SHIPPING_COST,
            total: b.total + SHIPPING_COST,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::approx_eq;
    use crate::model::{Infill, LayerHeight, Material, ModelFile};
    use pretty_assertions::assert_eq;

    const TEN_MIB: u64 = 10_485_760;

    fn settings(layer_mm: f64, infill: i64) -> PrintSettings {
        PrintSettings {
            layer_height: LayerHeight::from_mm(layer_mm),
            infill: Infill::new(infill),
            ..Default::default()
        }
    }

    #[test]
    fn test_ten_mib_volume() {
        assert_eq!(estimate_volume_cm3(TEN_MIB), 100.0);
    }

    #[test]
    fn test_reference_print_time() {
        let breakdown = estimate(TEN_MIB, &settings(0.2, 20));
        assert_eq!(breakdown.print_time_minutes, 500);
        assert!(approx_eq(breakdown.material_cost, 5.0));
        assert!(approx_eq(breakdown.machine_cost, 500.0 / 60.0 * 2.5));
        assert_eq!(breakdown.base_fee, 5.0);
    }

    #[test]
    fn test_material_rates() {
        for (material, rate) in [
            (Material::Pla, 0.05),
            (Material::Abs, 0.06),
            (Material::Petg, 0.07),
            (Material::Tpu, 0.09),
        ] {
            let s = PrintSettings {
                material,
                ..Default::default()
            };
            let breakdown = estimate(TEN_MIB, &s);
            assert!(approx_eq(breakdown.material_cost, 100.0 * rate), "{material}");
        }
    }

    #[test]
    fn test_total_is_exact_sum() {
        for size in [0, 1, 123_456, TEN_MIB, 99_999_999] {
            for lh in LayerHeight::all() {
                for infill in Infill::all() {
                    let s = PrintSettings {
                        layer_height: lh,
                        infill,
                        ..Default::default()
                    };
                    let b = estimate(size, &s);
                    assert_eq!(b.total, b.material_cost + b.machine_cost + b.base_fee);
                }
            }
        }
    }

    #[test]
    fn test_print_time_monotonic_in_infill() {
        for lh in LayerHeight::all() {
            let mut last = 0;
            for infill in Infill::all() {
                let s = PrintSettings {
                    layer_height: lh,
                    infill,
                    ..Default::default()
                };
                let t = estimate(3_000_000, &s).print_time_minutes;
                assert!(t >= last, "infill {} at {} mm", infill.percent(), lh.mm());
                last = t;
            }
        }
    }

    #[test]
    fn test_print_time_non_increasing_in_layer_height() {
        for infill in Infill::all() {
            let mut last = u64::MAX;
            for lh in LayerHeight::all() {
                let s = PrintSettings {
                    layer_height: lh,
                    infill,
                    ..Default::default()
                };
                let t = estimate(3_000_000, &s).print_time_minutes;
                assert!(t <= last, "layer {} mm at {}%", lh.mm(), infill.percent());
                last = t;
            }
        }
    }

    #[test]
    fn test_quote_without_file() {
        let order = OrderState::default();
        assert_eq!(quote(&order), Quote::AwaitingUpload);
        assert_eq!(quote(&order).total(), 0.0);
        assert!(CheckoutSummary::from_quote(&quote(&order)).is_none());
    }

    #[test]
    fn test_quote_with_file() {
        let order = OrderState {
            uploaded_file: Some(ModelFile::from_bytes("a.stl", vec![0u8; TEN_MIB as usize])),
            ..Default::default()
        };
        let q = quote(&order);
        assert_eq!(q.breakdown().map(|b| b.print_time_minutes), Some(500));

        let summary = CheckoutSummary::from_quote(&q).unwrap();
        assert_eq!(summary.shipping, 5.0);
        assert_eq!(summary.total, summary.subtotal + 5.0);
    }

    #[test]
    fn test_format_print_time() {
        assert_eq!(format_print_time(0), "0m");
        assert_eq!(format_print_time(60), "60m");
        assert_eq!(format_print_time(61), "1h 1m");
        assert_eq!(format_print_time(500), "8h 20m");
    }
}
