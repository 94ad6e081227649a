//! printshop-core - Core library for ordering 3D prints.
//!
//! This library holds the order-building workflow of the storefront: the
//! shared order state, the step controller, the price estimator, the model
//! upload transport and the shipping form validation.
//!
//! # Example
//!
//! ```no_run
//! use printshop_core::{quote_model_file, FileLimits, PrintSettings};
//! use std::path::Path;
//!
//! let breakdown = quote_model_file(
//!     Path::new("bracket.stl"),
//!     &PrintSettings::default(),
//!     &FileLimits::default(),
//! )
//! .unwrap();
//! println!("Total: {:.2}", breakdown.total);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod pricing;
pub mod session;
pub mod store;
pub mod upload;
pub mod validation;
pub mod workflow;

// Re-exports for convenience
pub use config::{FileLimits, ShopConfig, UploadConfig};
pub use error::{ErrorCode, Result, ShopError};
pub use model::{
    Color, Infill, LayerHeight, Material, ModelFile, OrderPatch, OrderState, OrderStatus,
    OrderSubmission, PrintSettings, ShippingDetails, ShippingForm, SupportStructure,
};
pub use pricing::{estimate, format_print_time, CheckoutSummary, PriceBreakdown, Quote};
pub use session::OrderSession;
pub use store::{OrderStore, StoreChange};
pub use upload::{UploadEvent, UploadFailure, UploadResponse, UploadStatus, UploadTicket, Uploader};
pub use validation::{check_model_file, validate_shipping, FieldErrors};
pub use workflow::{PaymentState, Step, Workflow};

/// Price a model file on disk.
///
/// Loads the file, applies the selection rules, then runs the estimator with
/// `settings`.
pub fn quote_model_file(
    path: &std::path::Path,
    settings: &PrintSettings,
    limits: &FileLimits,
) -> Result<PriceBreakdown> {
    let file = ModelFile::from_path(path)?;
    check_model_file(&file, limits)?;

    let breakdown = estimate(file.size, settings);
    tracing::debug!(
        file = %file.name,
        volume = breakdown.volume_estimate_cm3,
        minutes = breakdown.print_time_minutes,
        "Quoted"
    );
    Ok(breakdown)
}
