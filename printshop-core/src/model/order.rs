//! In-progress order record, merge patches and the submitted order.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::file::ModelFile;
use super::material::{Color, Material, SupportStructure};
use super::settings::{Infill, LayerHeight, PrintSettings};
use super::shipping::ShippingDetails;
use crate::pricing::PriceBreakdown;

/// The order being built on the page. One instance per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderState {
    pub uploaded_file: Option<ModelFile>,
    #[serde(flatten)]
    pub settings: PrintSettings,
}

impl OrderState {
    /// Check if a model file is present.
    pub fn has_file(&self) -> bool {
        self.uploaded_file.is_some()
    }

    /// Size of the uploaded file, if any.
    pub fn file_size(&self) -> Option<u64> {
        self.uploaded_file.as_ref().map(|f| f.size)
    }
}

/// Partial update for [`OrderState`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    /// `Some(None)` clears the file.
    pub uploaded_file: Option<Option<ModelFile>>,
    pub material: Option<Material>,
    pub color: Option<Color>,
    pub layer_height: Option<LayerHeight>,
    pub infill: Option<Infill>,
    pub support_structure: Option<SupportStructure>,
}

impl OrderPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: ModelFile) -> Self {
        self.uploaded_file = Some(Some(file));
        self
    }

    pub fn clear_file(mut self) -> Self {
        self.uploaded_file = Some(None);
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn layer_height(mut self, layer_height: LayerHeight) -> Self {
        self.layer_height = Some(layer_height);
        self
    }

    pub fn infill(mut self, infill: Infill) -> Self {
        self.infill = Some(infill);
        self
    }

    pub fn support_structure(mut self, support: SupportStructure) -> Self {
        self.support_structure = Some(support);
        self
    }

    /// Patch that sets every print setting from `settings`.
    pub fn settings(settings: PrintSettings) -> Self {
        Self {
            material: Some(settings.material),
            color: Some(settings.color),
            layer_height: Some(settings.layer_height),
            infill: Some(settings.infill),
            support_structure: Some(settings.support_structure),
            ..Default::default()
        }
    }

    /// Check if the patch names no field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fulfilment status of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Delivered,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Delivered => write!(f, "delivered"),
        }
    }
}

/// Finished order handed to the backend for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub user_id: i64,
    /// Server file URL when the upload returned one, else the content fingerprint.
    pub model_ref: String,
    pub model_name: String,
    pub quantity: u32,
    pub status: OrderStatus,
    pub settings: PrintSettings,
    pub shipping: ShippingDetails,
    pub price: PriceBreakdown,
}
