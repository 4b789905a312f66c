use std::time::Instant;

use super::delivery::EmailDelivery;
use super::form::ContactForm;
use crate::Result;

/// Validate, deliver and record the outcome of one submission.
///
/// Validation failures return before the delivery is touched. Delivery
/// failures are recorded on the form (error banner, values kept) and also
/// returned so non-interactive callers can report them.
pub async fn submit(form: &mut ContactForm, delivery: &dyn EmailDelivery) -> Result<()> {
    let payload = form.begin_submit()?;
    tracing::debug!(email = %payload.email, "Submitting contact form");

    let outcome = delivery.send(&payload).await;
    if let Err(ref e) = outcome {
        tracing::warn!(error = %e, "Contact submission failed");
    }

    form.finish_submit(&outcome, Instant::now());
    outcome
}
