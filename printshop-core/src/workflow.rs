//! Linear step workflow for building an order.
//!
//! Steps run `upload -> preview -> settings -> checkout -> payment`. Every step
//! after `upload` is locked while the order has no model file, whether it is
//! reached by [`Workflow::advance`] or by direct navigation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShopError};
use crate::model::OrderState;

/// A workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Upload,
    Preview,
    Settings,
    Checkout,
    Payment,
}

impl Step {
    /// All steps in order.
    pub const ALL: [Step; 5] = [
        Step::Upload,
        Step::Preview,
        Step::Settings,
        Step::Checkout,
        Step::Payment,
    ];

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Upload => Some(Step::Preview),
            Step::Preview => Some(Step::Settings),
            Step::Settings => Some(Step::Checkout),
            Step::Checkout => Some(Step::Payment),
            Step::Payment => None,
        }
    }

    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::Upload => None,
            Step::Preview => Some(Step::Upload),
            Step::Settings => Some(Step::Preview),
            Step::Checkout => Some(Step::Settings),
            Step::Payment => Some(Step::Checkout),
        }
    }

    /// Check if entering this step needs a model file.
    pub fn requires_file(&self) -> bool {
        !matches!(self, Step::Upload)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Upload => "upload",
            Step::Preview => "preview",
            Step::Settings => "settings",
            Step::Checkout => "checkout",
            Step::Payment => "payment",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-state of the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Shipping form not yet accepted.
    #[default]
    Collecting,
    /// Shipping form accepted, order placed.
    Submitted,
}

/// Step controller. Holds only the current position; gating reads the
/// order state passed in.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    current: Step,
    payment: PaymentState,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn payment_state(&self) -> PaymentState {
        self.payment
    }

    /// Check if the workflow reached its terminal success state.
    pub fn is_complete(&self) -> bool {
        self.current == Step::Payment && self.payment == PaymentState::Submitted
    }

    /// Check if `step` can be entered given the order state.
    pub fn is_enabled(step: Step, order: &OrderState) -> bool {
        !step.requires_file() || order.has_file()
    }

    /// Move to the next step. Returns the step after the call; blocked moves
    /// and moves past the last step leave the position unchanged.
    pub fn advance(&mut self, order: &OrderState) -> Step {
        if let Some(next) = self.current.next() {
            if Self::is_enabled(next, order) && !self.is_complete() {
                self.go(next);
            } else {
                debug!(from = %self.current, to = %next, "Advance blocked");
            }
        }
        self.current
    }

    /// Move to the previous step. No-op at `upload`.
    pub fn retreat(&mut self) -> Step {
        if let Some(previous) = self.current.previous() {
            if !self.is_complete() {
                self.go(previous);
            }
        }
        self.current
    }

    /// Jump directly to `step`, as a tab click would.
    pub fn navigate_to(&mut self, step: Step, order: &OrderState) -> Result<Step> {
        if !Self::is_enabled(step, order) {
            return Err(ShopError::StepLocked {
                step,
                reason: "upload a model file first".to_string(),
            });
        }
        if self.is_complete() && step != Step::Payment {
            return Err(ShopError::StepLocked {
                step,
                reason: "order already placed".to_string(),
            });
        }
        self.go(step);
        Ok(self.current)
    }

    /// Mark the payment step as successfully submitted.
    pub fn complete_payment(&mut self) -> Result<()> {
        if self.current != Step::Payment {
            return Err(ShopError::StepLocked {
                step: Step::Payment,
                reason: format!("current step is {}", self.current),
            });
        }
        self.payment = PaymentState::Submitted;
        debug!("Payment submitted");
        Ok(())
    }

    /// Fall back to `upload` when the file disappears under a later step.
    pub fn on_file_cleared(&mut self) {
        if self.current.requires_file() && !self.is_complete() {
            self.go(Step::Upload);
        }
    }

    fn go(&mut self, step: Step) {
        if step != self.current {
            debug!(from = %self.current, to = %step, "Step changed");
            self.current = step;
        }
    }
}
