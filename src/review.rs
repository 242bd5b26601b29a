// Review submission workflow. One `ReviewForm` models one form instance.
// Local catalog state never changes ahead of the server's explicit
// acknowledgement; the committed record is the one the server returns.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::{CatalogStore, Review};
use crate::notify::Notifier;
use crate::service::{AddReviewRequest, AddReviewResponse, ServiceError, TourService, REVIEW_ADDED};
use crate::validation::{validate_rating, validate_review_content, FieldError};

const REVIEW_FAILED_MESSAGE: &str = "Failed to add review. Please try again later.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("invalid review input")]
    Validation(Vec<FieldError>),

    // A submission is already in flight on this form instance.
    #[error("a review submission is already in flight")]
    SubmissionInFlight,

    // The form was disposed while the request was in flight; the result
    // was dropped without touching any state.
    #[error("form disposed before the submission settled")]
    FormDisposed,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewInput {
    pub tour_id: String,
    pub rating: u8,
    pub content: String,
}

pub fn validate_review_input(input: &ReviewInput) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if let Err(err) = validate_rating(input.rating) {
        errors.push(err);
    }
    if let Err(err) = validate_review_content(&input.content) {
        errors.push(err);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub struct ReviewForm {
    service: Arc<dyn TourService>,
    store: Arc<CatalogStore>,
    notifier: Arc<dyn Notifier>,
    phase: Mutex<ReviewPhase>,
    disposed: AtomicBool,
}

impl ReviewForm {
    pub fn new(
        service: Arc<dyn TourService>,
        store: Arc<CatalogStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            service,
            store,
            notifier,
            phase: Mutex::new(ReviewPhase::Idle),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn phase(&self) -> ReviewPhase {
        *self.phase.lock()
    }

    // Marks the form's view as torn down. An in-flight submission settles
    // as a no-op: no store mutation, no notification.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    // Submits a review. The caller guarantees a non-empty bearer credential;
    // unauthenticated users are redirected to login before this point.
    //
    // Only one submission may be in flight per form instance; a concurrent
    // second call is rejected with `SubmissionInFlight`.
    pub async fn submit(
        &self,
        credential: &str,
        input: ReviewInput,
    ) -> Result<Review, ReviewError> {
        {
            let mut phase = self.phase.lock();
            if *phase != ReviewPhase::Idle {
                return Err(ReviewError::SubmissionInFlight);
            }
            *phase = ReviewPhase::Validating;
        }

        if let Err(errors) = validate_review_input(&input) {
            *self.phase.lock() = ReviewPhase::Idle;
            return Err(ReviewError::Validation(errors));
        }

        *self.phase.lock() = ReviewPhase::Submitting;
        tracing::debug!("submitting review for tour {}", input.tour_id);

        let request = AddReviewRequest {
            tour_id: input.tour_id.clone(),
            rating: input.rating,
            content: input.content.clone(),
        };
        let outcome = self.service.add_review(credential, request).await;

        let result = self.settle(&input, outcome);
        *self.phase.lock() = ReviewPhase::Idle;
        result
    }

    // Reconciles the server's response with local state. Runs after the
    // suspension point, so the disposal flag is checked first.
    fn settle(
        &self,
        input: &ReviewInput,
        outcome: Result<AddReviewResponse, ServiceError>,
    ) -> Result<Review, ReviewError> {
        if self.disposed.load(Ordering::SeqCst) {
            tracing::debug!(
                "review form disposed mid-flight, dropping result for tour {}",
                input.tour_id
            );
            return Err(ReviewError::FormDisposed);
        }

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("review submission failed: {}", err);
                self.notifier.error(REVIEW_FAILED_MESSAGE);
                return Err(err.into());
            }
        };

        if response.message != REVIEW_ADDED {
            let detail = if response.message.trim().is_empty() {
                "review was not accepted".to_string()
            } else {
                response.message
            };
            tracing::warn!("review rejected by service: {}", detail);
            self.notifier.error(&detail);
            return Err(ReviewError::Service(ServiceError::Rejected(detail)));
        }

        let Some(new_review) = response.new_review else {
            let err = ServiceError::Protocol("acknowledgement without review payload".to_string());
            tracing::warn!("{}", err);
            self.notifier.error(REVIEW_FAILED_MESSAGE);
            return Err(err.into());
        };

        let review = Review {
            author: new_review.author,
            rating: new_review.rating,
            content: new_review.content,
            likes: 0,
            dislikes: 0,
        };
        if !self.store.commit_review(&input.tour_id, review.clone()) {
            let err = ServiceError::Protocol(format!("tour {} not in catalog", input.tour_id));
            self.notifier.error(REVIEW_FAILED_MESSAGE);
            return Err(err.into());
        }

        self.notifier.success("Review added");
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Tour;
    use crate::notify::mock::RecordingNotifier;
    use crate::service::mock::MockTourService;
    use crate::service::NewReview;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn store_with_tour() -> Arc<CatalogStore> {
        let store = Arc::new(CatalogStore::new());
        store.load_tours(vec![Tour {
            id: "t1".to_string(),
            title: "Masai Mara Safari".to_string(),
            price: 500.0,
            country: "Kenya".to_string(),
            duration: "5 days".to_string(),
            traveller_limit: 8,
            sections: vec![],
            reviews: vec![],
        }]);
        store
    }

    fn form(
        service: MockTourService,
        store: &Arc<CatalogStore>,
        notifier: &Arc<RecordingNotifier>,
    ) -> ReviewForm {
        ReviewForm::new(
            Arc::new(service),
            Arc::clone(store),
            Arc::clone(notifier) as Arc<dyn Notifier>,
        )
    }

    fn input() -> ReviewInput {
        ReviewInput {
            tour_id: "t1".to_string(),
            rating: 4,
            content: "Great trip".to_string(),
        }
    }

    #[tokio::test]
    async fn test_committed_submission_appends_exactly_one_review() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let form = form(MockTourService::new(), &store, &notifier);

        let review = form.submit("session-token", input()).await.unwrap();
        assert_eq!(review.likes, 0);
        assert_eq!(review.dislikes, 0);

        let tour = store.tour("t1").unwrap();
        assert_eq!(tour.reviews.len(), 1);
        assert_eq!(tour.reviews[0].rating, 4);

        assert_eq!(notifier.successes.lock().len(), 1);
        assert!(notifier.errors.lock().is_empty());
        assert_eq!(form.phase(), ReviewPhase::Idle);
    }

    #[tokio::test]
    async fn test_invalid_rating_fails_locally_without_network() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = MockTourService::new();
        let form = ReviewForm::new(
            Arc::new(service),
            Arc::clone(&store),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );

        let err = form
            .submit(
                "session-token",
                ReviewInput {
                    tour_id: "t1".to_string(),
                    rating: 0,
                    content: "Great trip".to_string(),
                },
            )
            .await
            .unwrap_err();

        let ReviewError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert!(errors.iter().any(|e| e.field == "rating"));
        assert!(store.tour("t1").unwrap().reviews.is_empty());
        assert_eq!(form.phase(), ReviewPhase::Idle);
    }

    #[tokio::test]
    async fn test_empty_content_is_a_field_error() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let form = form(MockTourService::new(), &store, &notifier);

        let err = form
            .submit(
                "session-token",
                ReviewInput {
                    tour_id: "t1".to_string(),
                    rating: 3,
                    content: "  ".to_string(),
                },
            )
            .await
            .unwrap_err();

        let ReviewError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert!(errors.iter().any(|e| e.field == "content"));
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_store_untouched() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = MockTourService::new()
            .with_review_response(Err(ServiceError::Transport("connection refused".to_string())));
        let form = form(service, &store, &notifier);

        let err = form.submit("session-token", input()).await.unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Service(ServiceError::Transport(_))
        ));

        assert!(store.tour("t1").unwrap().reviews.is_empty());
        assert_eq!(notifier.errors.lock().len(), 1);
        assert!(notifier.successes.lock().is_empty());
        assert_eq!(form.phase(), ReviewPhase::Idle);
    }

    #[tokio::test]
    async fn test_non_affirmative_message_is_a_rejection() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = MockTourService::new().with_review_response(Ok(AddReviewResponse {
            message: "already reviewed".to_string(),
            new_review: Some(NewReview {
                author: "u1".to_string(),
                rating: 4,
                content: "Great trip".to_string(),
            }),
        }));
        let form = form(service, &store, &notifier);

        let err = form.submit("session-token", input()).await.unwrap_err();
        assert_eq!(
            err,
            ReviewError::Service(ServiceError::Rejected("already reviewed".to_string()))
        );

        // A 2xx without the affirmative message commits nothing.
        assert!(store.tour("t1").unwrap().reviews.is_empty());
        assert_eq!(notifier.errors.lock()[0], "already reviewed");
    }

    #[tokio::test]
    async fn test_ack_without_review_payload_is_a_protocol_error() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = MockTourService::new().with_review_response(Ok(AddReviewResponse {
            message: REVIEW_ADDED.to_string(),
            new_review: None,
        }));
        let form = form(service, &store, &notifier);

        let err = form.submit("session-token", input()).await.unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Service(ServiceError::Protocol(_))
        ));
        assert!(store.tour("t1").unwrap().reviews.is_empty());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_rejected() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = MockTourService::new().with_delay(Duration::from_millis(50));
        let form = Arc::new(form(service, &store, &notifier));

        let first = {
            let form = Arc::clone(&form);
            tokio::spawn(async move { form.submit("session-token", input()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(form.phase(), ReviewPhase::Submitting);
        let second = form.submit("session-token", input()).await;
        assert_eq!(second.unwrap_err(), ReviewError::SubmissionInFlight);

        first.await.unwrap().unwrap();
        assert_eq!(form.phase(), ReviewPhase::Idle);

        // Exactly one review landed despite the duplicate submit attempt.
        assert_eq!(store.tour("t1").unwrap().reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_disposed_form_drops_the_result_silently() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = MockTourService::new().with_delay(Duration::from_millis(50));
        let form = Arc::new(form(service, &store, &notifier));

        let pending = {
            let form = Arc::clone(&form);
            tokio::spawn(async move { form.submit("session-token", input()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        form.dispose();

        let err = pending.await.unwrap().unwrap_err();
        assert_eq!(err, ReviewError::FormDisposed);

        // No mutation, no notification for a torn-down view.
        assert!(store.tour("t1").unwrap().reviews.is_empty());
        assert!(notifier.successes.lock().is_empty());
        assert!(notifier.errors.lock().is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_service_call() {
        let store = store_with_tour();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = Arc::new(MockTourService::new());
        let form = ReviewForm::new(
            Arc::clone(&service) as Arc<dyn TourService>,
            Arc::clone(&store),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );

        let _ = form
            .submit(
                "session-token",
                ReviewInput {
                    tour_id: "t1".to_string(),
                    rating: 0,
                    content: String::new(),
                },
            )
            .await;

        assert_eq!(service.review_calls.load(Ordering::SeqCst), 0);
    }
}
