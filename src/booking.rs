// Booking workflow. One `BookingForm` models one form instance, taking a
// validated booking request through order creation and the hand-off to the
// external payment widget. The hand-off is fire-and-forget; the widget's
// completion is observed only.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::CatalogStore;
use crate::notify::Notifier;
use crate::payment::{CheckoutOptions, CheckoutPrefill, CheckoutTheme, PaymentEvent, PaymentGateway};
use crate::service::{ClientConfig, CreateOrderRequest, ServiceError, TourService};
use crate::validation::{
    validate_companions, validate_email, validate_mobile_no, validate_name, FieldError,
};

const BOOKING_FAILED_MESSAGE: &str =
    "An error occurred while creating the order. Please try again.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("invalid booking input")]
    Validation(Vec<FieldError>),

    // An order is already in flight (or awaiting payment) on this form.
    #[error("a booking is already in flight")]
    BookingInFlight,

    #[error("form disposed before the order settled")]
    FormDisposed,

    #[error("tour {0} is not in the catalog")]
    UnknownTour(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPhase {
    Idle,
    Validating,
    RequestingOrder,
    AwaitingPayment,
}

// Contact details for one booking attempt. Lives only for the duration of
// the submission; on success the relevant parts are copied into the
// checkout prefill.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingInput {
    pub name: String,
    pub email: String,
    pub mobile_no: String,
    pub companions: u32,
}

// Transient payment-intent descriptor. Never persisted; discarded after
// the hand-off to the payment widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub currency: String,
    pub amount: u64,
}

pub fn validate_booking_input(
    input: &BookingInput,
    traveller_limit: u32,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if let Err(err) = validate_name(&input.name) {
        errors.push(err);
    }
    if let Err(err) = validate_email(&input.email) {
        errors.push(err);
    }
    if let Err(err) = validate_mobile_no(&input.mobile_no) {
        errors.push(err);
    }
    if let Err(err) = validate_companions(input.companions, traveller_limit) {
        errors.push(err);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub struct BookingForm {
    service: Arc<dyn TourService>,
    store: Arc<CatalogStore>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
    config: ClientConfig,
    phase: Mutex<BookingPhase>,
    disposed: AtomicBool,
}

impl BookingForm {
    pub fn new(
        service: Arc<dyn TourService>,
        store: Arc<CatalogStore>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
        config: ClientConfig,
    ) -> Self {
        Self {
            service,
            store,
            gateway,
            notifier,
            config,
            phase: Mutex::new(BookingPhase::Idle),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn phase(&self) -> BookingPhase {
        *self.phase.lock()
    }

    // Marks the form's view as torn down. An in-flight order request
    // settles as a no-op: no hand-off, no notification.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    // Submits a booking for the given tour. Only one order may be in
    // flight per form instance; while an order is being requested or is
    // awaiting payment, further submits are rejected.
    pub async fn submit(
        &self,
        tour_id: &str,
        input: BookingInput,
    ) -> Result<Order, BookingError> {
        {
            let mut phase = self.phase.lock();
            if *phase != BookingPhase::Idle {
                return Err(BookingError::BookingInFlight);
            }
            *phase = BookingPhase::Validating;
        }

        let Some(tour) = self.store.tour(tour_id) else {
            *self.phase.lock() = BookingPhase::Idle;
            return Err(BookingError::UnknownTour(tour_id.to_string()));
        };

        if let Err(errors) = validate_booking_input(&input, tour.traveller_limit) {
            *self.phase.lock() = BookingPhase::Idle;
            return Err(BookingError::Validation(errors));
        }

        *self.phase.lock() = BookingPhase::RequestingOrder;
        tracing::debug!("requesting order for tour {} at {}", tour.id, tour.price);

        let outcome = self
            .service
            .create_order(CreateOrderRequest { amount: tour.price })
            .await;

        if self.disposed.load(Ordering::SeqCst) {
            *self.phase.lock() = BookingPhase::Idle;
            tracing::debug!(
                "booking form disposed mid-flight, dropping order for tour {}",
                tour.id
            );
            return Err(BookingError::FormDisposed);
        }

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                *self.phase.lock() = BookingPhase::Idle;
                tracing::warn!("order creation failed: {}", err);
                self.notifier.error(BOOKING_FAILED_MESSAGE);
                return Err(err.into());
            }
        };

        let order = Order {
            id: response.id,
            currency: response.currency,
            amount: response.amount,
        };
        let options = CheckoutOptions {
            key: self.config.checkout_key.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            name: self.config.merchant_name.clone(),
            description: self.config.booking_description.clone(),
            order_id: order.id.clone(),
            prefill: CheckoutPrefill {
                name: input.name,
                email: input.email,
                contact: input.mobile_no,
            },
            theme: CheckoutTheme {
                color: self.config.theme_color.clone(),
            },
        };

        *self.phase.lock() = BookingPhase::AwaitingPayment;
        tracing::info!("handing order {} to the payment gateway", order.id);
        self.gateway.open(options);

        Ok(order)
    }

    // Observe-only: the widget reports completion on its own schedule and
    // with no ordering guarantees relative to this workflow. Observing an
    // event releases the form for the next submission.
    pub fn observe_payment(&self, event: PaymentEvent) {
        match &event {
            PaymentEvent::Completed { payment_id } => {
                tracing::info!("payment completed: {}", payment_id);
            }
            PaymentEvent::Cancelled => {
                tracing::warn!("payment cancelled by user");
            }
            PaymentEvent::Failed { reason } => {
                tracing::warn!("payment failed: {}", reason);
            }
        }

        let mut phase = self.phase.lock();
        if *phase == BookingPhase::AwaitingPayment {
            *phase = BookingPhase::Idle;
        }
    }
}
