//! Page-level owner of one order in progress.
//!
//! [`OrderSession`] holds the single [`OrderStore`] together with the state
//! derived from it (step position, upload status, quote). Every step reads and
//! writes through the same session, so there is no per-step copy of the order.

use tracing::{debug, info, warn};

use crate::config::FileLimits;
use crate::error::{Result, ShopError};
use crate::model::{
    ModelFile, OrderPatch, OrderState, OrderStatus, OrderSubmission, ShippingDetails, ShippingForm,
};
use crate::pricing::{self, CheckoutSummary, Quote};
use crate::store::{OrderStore, StoreChange};
use crate::upload::{UploadEvent, UploadStatus, UploadTicket, UploadTracker};
use crate::validation::{check_model_file, validate_shipping};
use crate::workflow::{Step, Workflow};

/// One customer's order-building session.
#[derive(Debug, Default)]
pub struct OrderSession {
    limits: FileLimits,
    store: OrderStore,
    workflow: Workflow,
    upload: UploadTracker,
    /// File being uploaded; committed to the store on success.
    pending_file: Option<ModelFile>,
    /// Server URL of the committed file, when the endpoint returned one.
    file_url: Option<String>,
    quote: Quote,
    shipping: Option<ShippingDetails>,
}

impl OrderSession {
    pub fn new(limits: FileLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &OrderState {
        self.store.state()
    }

    pub fn step(&self) -> Step {
        self.workflow.current()
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn upload_status(&self) -> &UploadStatus {
        self.upload.status()
    }

    pub fn pending_file(&self) -> Option<&ModelFile> {
        self.pending_file.as_ref()
    }

    pub fn shipping(&self) -> Option<&ShippingDetails> {
        self.shipping.as_ref()
    }

    pub fn checkout_summary(&self) -> Option<CheckoutSummary> {
        CheckoutSummary::from_quote(&self.quote)
    }

    /// Check if `step` can be selected right now.
    pub fn is_enabled(&self, step: Step) -> bool {
        Workflow::is_enabled(step, self.state())
    }

    /// Accept a selected file and open a new upload attempt for it.
    ///
    /// A rejected file leaves the order and any running upload untouched.
    /// Once the order is placed no new file is accepted.
    pub fn select_file(&mut self, file: ModelFile) -> Result<UploadTicket> {
        self.ensure_open()?;
        check_model_file(&file, &self.limits)?;
        let ticket = self.upload.begin();
        info!(upload = ticket.id(), file = %file.name, size = file.size, "File selected");
        self.pending_file = Some(file);
        Ok(ticket)
    }

    /// Feed an event from upload `id`. Returns whether it was applied.
    pub fn apply_upload_event(&mut self, id: u64, event: UploadEvent) -> bool {
        let file_url = match &event {
            UploadEvent::Succeeded(response) => Some(response.file_url.clone()),
            _ => None,
        };
        let terminal = event.is_terminal();

        if !self.upload.apply(id, event) {
            return false;
        }

        if let Some(file_url) = file_url {
            if self.workflow.is_complete() {
                if let Some(file) = self.pending_file.take() {
                    warn!(upload = id, file = %file.name, "Order already placed, upload not committed");
                }
            } else if let Some(file) = self.pending_file.take() {
                self.apply_patch(OrderPatch::new().file(file));
                self.file_url = file_url;
                if self.workflow.current() == Step::Upload {
                    self.workflow.advance(self.store.state());
                }
            }
        } else if terminal {
            self.pending_file = None;
        }
        true
    }

    /// Cancel the upload in flight and discard its file.
    pub fn cancel_upload(&mut self) -> bool {
        let cancelled = self.upload.cancel();
        if cancelled {
            self.pending_file = None;
        }
        cancelled
    }

    /// Merge `patch` into the order and refresh derived state.
    pub fn update(&mut self, patch: OrderPatch) -> Result<StoreChange> {
        self.ensure_open()?;
        if let Some(material) = patch.material {
            if !material.is_purchasable() {
                return Err(ShopError::MaterialUnavailable(material));
            }
        }
        Ok(self.apply_patch(patch))
    }

    /// Remove the model file from the order.
    pub fn clear_file(&mut self) -> Result<StoreChange> {
        self.update(OrderPatch::new().clear_file())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.workflow.is_complete() {
            return Err(ShopError::StepLocked {
                step: Step::Payment,
                reason: "order already placed".to_string(),
            });
        }
        Ok(())
    }

    fn apply_patch(&mut self, patch: OrderPatch) -> StoreChange {
        let change = self.store.update(patch);
        if change.file_changed {
            self.file_url = None;
        }
        if change.file_cleared {
            self.upload.reset();
            self.pending_file = None;
            self.shipping = None;
            self.workflow.on_file_cleared();
        }
        if change.affects_price() {
            self.quote = pricing::quote(self.store.state());
            debug!(total = self.quote.total(), "Quote recomputed");
        }
        change
    }

    pub fn advance(&mut self) -> Step {
        self.workflow.advance(self.store.state())
    }

    pub fn retreat(&mut self) -> Step {
        self.workflow.retreat()
    }

    pub fn navigate_to(&mut self, step: Step) -> Result<Step> {
        self.workflow.navigate_to(step, self.store.state())
    }

    /// Validate and accept the shipping form at the payment step.
    pub fn submit_shipping(&mut self, form: &ShippingForm) -> Result<&ShippingDetails> {
        if self.workflow.current() != Step::Payment {
            return Err(ShopError::StepLocked {
                step: Step::Payment,
                reason: format!("current step is {}", self.workflow.current()),
            });
        }
        self.ensure_open()?;
        let details = validate_shipping(form).map_err(ShopError::Validation)?;
        self.workflow.complete_payment()?;
        info!(email = %details.email, "Shipping accepted");
        Ok(&*self.shipping.insert(details))
    }

    /// Build the order record once payment is submitted. `price` is per unit.
    pub fn place_order(&self, user_id: i64, quantity: u32) -> Result<OrderSubmission> {
        if quantity == 0 {
            return Err(ShopError::InvalidValue {
                field: "quantity".to_string(),
                expected: "at least 1".to_string(),
                value: quantity.to_string(),
            });
        }
        let (Some(shipping), Some(file), Some(price)) = (
            self.shipping.as_ref(),
            self.state().uploaded_file.as_ref(),
            self.quote.breakdown(),
        ) else {
            return Err(ShopError::StepLocked {
                step: Step::Payment,
                reason: "shipping details not submitted".to_string(),
            });
        };

        Ok(OrderSubmission {
            user_id,
            model_ref: self
                .file_url
                .clone()
                .unwrap_or_else(|| file.fingerprint()),
            model_name: file.name.clone(),
            quantity,
            status: OrderStatus::Pending,
            settings: self.state().settings,
            shipping: shipping.clone(),
            price: *price,
        })
    }
}
