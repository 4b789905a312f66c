//! The contact form: state, validation, payload and delivery.

mod delivery;
mod form;
mod payload;
mod submission;
mod validate;

pub use delivery::{EmailDelivery, EmailJsClient};
pub use form::{ContactForm, Field, FormStep, SubmitStatus};
pub use payload::ContactPayload;
pub use submission::submit;
pub use validate::{is_valid_email, FieldError, ValidationErrors};
