//! Data model for print orders.

mod file;
mod material;
mod order;
mod settings;
mod shipping;

pub use file::ModelFile;
pub use material::{Color, Material, SupportStructure};
pub use order::{OrderPatch, OrderState, OrderStatus, OrderSubmission};
pub use settings::{Infill, LayerHeight, PrintSettings};
pub use shipping::{ShippingDetails, ShippingForm, SHIPPING_FIELDS};
