// Client-side core for the WildLens Tours catalog: search/filtering over
// the tour list, review submission, and booking hand-off to the payment
// provider.

pub mod booking;
pub mod catalog;
pub mod filter;
pub mod notify;
pub mod payment;
pub mod review;
pub mod service;
pub mod validation;

// Re-export key types for convenience
pub use booking::{
    validate_booking_input, BookingError, BookingForm, BookingInput, BookingPhase, Order,
};
pub use catalog::{CatalogStore, Review, Tour};
pub use filter::{
    distinct_countries, distinct_durations, distinct_prices, filtered_view, TourFilter,
};
pub use notify::{LogNotifier, Notifier};
pub use payment::{CheckoutOptions, CheckoutPrefill, CheckoutTheme, PaymentEvent, PaymentGateway};
pub use review::{validate_review_input, ReviewError, ReviewForm, ReviewInput, ReviewPhase};
pub use service::{
    AddReviewRequest, AddReviewResponse, ClientConfig, CreateOrderRequest, HttpTourService,
    NewReview, OrderResponse, ServiceError, TourService, REVIEW_ADDED,
};
pub use validation::FieldError;
