//! Checkout/return workflow
//!
//! Pure decisions from a card's current quantities. Nothing here is
//! terminal: a card can go out of stock and back any number of times.

use shared::models::{Card, StockState};

/// Whether the user confirmed taking the last copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confirmation {
    #[default]
    Unconfirmed,
    Confirmed,
}

impl Confirmation {
    pub fn is_confirmed(self) -> bool {
        self == Confirmation::Confirmed
    }
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Unconfirmed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPlan {
    Proceed,
    /// Exactly one copy left, ask first
    ConfirmLastCopy,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnPlan {
    Proceed,
    NothingCheckedOut,
}

pub fn plan_checkout(card: &Card) -> CheckoutPlan {
    match card.stock_state() {
        StockState::Available => CheckoutPlan::Proceed,
        StockState::LowStock => CheckoutPlan::ConfirmLastCopy,
        StockState::OutOfStock => CheckoutPlan::Unavailable,
    }
}

pub fn plan_return(card: &Card) -> ReturnPlan {
    if card.checked_out_quantity > 0 {
        ReturnPlan::Proceed
    } else {
        ReturnPlan::NothingCheckedOut
    }
}
