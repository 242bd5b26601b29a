// External payment-widget contract. The booking workflow hands a checkout
// descriptor to the gateway and moves on; the widget's completion arrives
// later, outside this core's ordering guarantees.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutTheme {
    pub color: String,
}

// The options object handed to the widget's `open()` entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: CheckoutPrefill,
    pub theme: CheckoutTheme,
}

pub trait PaymentGateway: Send + Sync {
    // One-way hand-off; must not block.
    fn open(&self, options: CheckoutOptions);
}

// Completion signal delivered by the widget, observed but never awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    Completed { payment_id: String },
    Cancelled,
    Failed { reason: String },
}
