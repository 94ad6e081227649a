//! Plain-text rendering of quotes and checkout totals.

use printshop_core::{format_print_time, CheckoutSummary, PrintSettings, Quote};

fn line(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<18}{}", format!("{}:", label), value)
}

/// Render the price panel for `file_name` with `settings`.
pub fn render_quote(file_name: Option<&str>, settings: &PrintSettings, quote: &Quote) -> String {
    let (Some(file_name), Some(b)) = (file_name, quote.breakdown()) else {
        return ["Price Calculation", "  Upload a file to see pricing"].join("\n");
    };

    let mut lines = vec![
        "Price Calculation".to_string(),
        line("File Name", file_name),
        line("Estimated Volume", format!("{:.2} cm³", b.volume_estimate_cm3)),
        line("Material", settings.material),
        line("Color", settings.color),
        line("Layer Height", format!("{} mm", settings.layer_height.mm())),
        line("Infill", format!("{}%", settings.infill.percent())),
        line("Support", settings.support_structure),
        String::new(),
        line("Material Cost", format!("${:.2}", b.material_cost)),
        line("Machine Cost", format!("${:.2}", b.machine_cost)),
        line("Base Fee", format!("${:.2}", b.base_fee)),
        line("Print Time", format_print_time(b.print_time_minutes)),
        String::new(),
        line("Total", format!("${:.2}", b.total)),
    ];
    if !settings.material.is_purchasable() {
        lines.push(format!("  Note: {} is coming soon and cannot be ordered yet", settings.material));
    }
    lines.join("\n")
}

/// Render the payment step totals.
pub fn render_checkout(summary: &CheckoutSummary) -> String {
    [
        "Order Summary".to_string(),
        line("Subtotal", format!("${:.2}", summary.subtotal)),
        line("Shipping", format!("${:.2}", summary.shipping)),
        line("Total", format!("${:.2}", summary.total)),
    ]
    .join("\n")
}
