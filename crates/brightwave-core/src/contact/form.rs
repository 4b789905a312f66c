//! Contact form state: values, steps, submission status and its timers.
//!
//! The form is a plain state machine. Time never comes from the clock inside
//! this module; callers pass `now` so dismiss/close deadlines are testable.

use std::time::Instant;

use chrono::Utc;

use super::payload::ContactPayload;
use super::validate::{self, FieldError, ValidationErrors};
use crate::config::FormConfig;
use crate::{Error, Result};

/// Every field of the form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    ServiceInterest,
    Budget,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Company,
        Field::ServiceInterest,
        Field::Budget,
    ];

    /// Human-readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "first name",
            Field::LastName => "last name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Company => "company",
            Field::ServiceInterest => "service interest",
            Field::Budget => "budget",
        }
    }

    /// Step of the multi-step form this field belongs to
    pub fn step(&self) -> FormStep {
        match self {
            Field::FirstName | Field::LastName => FormStep::AboutYou,
            Field::Email | Field::Phone | Field::Company => FormStep::ContactDetails,
            Field::ServiceInterest | Field::Budget => FormStep::Project,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStep {
    #[default]
    AboutYou,
    ContactDetails,
    Project,
}

impl FormStep {
    pub const ALL: [FormStep; 3] = [FormStep::AboutYou, FormStep::ContactDetails, FormStep::Project];

    pub fn fields(&self) -> &'static [Field] {
        match self {
            FormStep::AboutYou => &[Field::FirstName, Field::LastName],
            FormStep::ContactDetails => &[Field::Email, Field::Phone, Field::Company],
            FormStep::Project => &[Field::ServiceInterest, Field::Budget],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormStep::AboutYou => "About you",
            FormStep::ContactDetails => "How to reach you",
            FormStep::Project => "Your project",
        }
    }

    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    pub fn next(&self) -> Option<FormStep> {
        match self {
            FormStep::AboutYou => Some(FormStep::ContactDetails),
            FormStep::ContactDetails => Some(FormStep::Project),
            FormStep::Project => None,
        }
    }

    pub fn prev(&self) -> Option<FormStep> {
        match self {
            FormStep::AboutYou => None,
            FormStep::ContactDetails => Some(FormStep::AboutYou),
            FormStep::Project => Some(FormStep::ContactDetails),
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

/// Submission status of the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    /// Delivery failed; the message is shown until the banner is dismissed
    Error(String),
}

/// Contact form state
#[derive(Debug, Clone)]
pub struct ContactForm {
    values: [String; 7],
    step: FormStep,
    status: SubmitStatus,
    errors: ValidationErrors,
    open: bool,
    /// When the delivery error banner disappears
    banner_until: Option<Instant>,
    /// When the form closes after a confirmed submission
    close_at: Option<Instant>,
    config: FormConfig,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl ContactForm {
    /// Create an open, empty form
    pub fn new(config: FormConfig) -> Self {
        Self {
            values: Default::default(),
            step: FormStep::default(),
            status: SubmitStatus::Idle,
            errors: ValidationErrors::default(),
            open: true,
            banner_until: None,
            close_at: None,
            config,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Set a field from user input; clears that field's error
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
        self.errors.clear_field(field);
    }

    pub fn push_char(&mut self, field: Field, c: char) {
        self.values[field.index()].push(c);
        self.errors.clear_field(field);
    }

    pub fn pop_char(&mut self, field: Field) {
        self.values[field.index()].pop();
        self.errors.clear_field(field);
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn field_error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(field)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_empty())
    }

    /// The submit control is disabled while a submission is pending
    pub fn is_submit_enabled(&self) -> bool {
        self.status != SubmitStatus::Submitting
    }

    /// Visible delivery error banner, if any
    pub fn error_banner(&self) -> Option<&str> {
        match &self.status {
            SubmitStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Re-open a closed form from a clean state
    pub fn open(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Close the form, discarding everything typed so far
    pub fn close(&mut self) {
        self.reset();
        self.open = false;
    }

    fn reset(&mut self) {
        self.values = Default::default();
        self.step = FormStep::default();
        self.status = SubmitStatus::Idle;
        self.errors = ValidationErrors::default();
        self.banner_until = None;
        self.close_at = None;
    }

    /// Advance to the next step, validating only the current step's fields
    pub fn next_step(&mut self) -> std::result::Result<FormStep, ValidationErrors> {
        let fields = self.step.fields();
        if let Err(errors) = validate::validate(fields, |f| self.value(f)) {
            for (field, error) in errors.iter() {
                self.errors.push(*field, *error);
            }
            return Err(errors);
        }

        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn prev_step(&mut self) -> FormStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Validate everything and move to `Submitting`.
    ///
    /// Returns the payload to deliver. Validation failures are stored on the
    /// form (and the form jumps to the step of the first failing field); they
    /// never produce a payload, so nothing reaches the network.
    pub fn begin_submit(&mut self) -> Result<ContactPayload> {
        if self.status == SubmitStatus::Submitting {
            return Err(Error::SubmissionInProgress);
        }

        if let Err(errors) = validate::validate(&Field::ALL, |f| self.value(f)) {
            if let Some(first) = errors.fields().next() {
                self.step = first.step();
            }
            self.errors = errors.clone();
            tracing::debug!(errors = %errors, "Contact form failed validation");
            return Err(Error::Validation(errors));
        }

        self.errors = ValidationErrors::default();
        self.status = SubmitStatus::Submitting;
        self.banner_until = None;
        self.close_at = None;

        Ok(ContactPayload::from_form(self, Utc::now()))
    }

    /// Record the outcome of the delivery started by [`begin_submit`].
    ///
    /// [`begin_submit`]: ContactForm::begin_submit
    pub fn finish_submit(&mut self, outcome: &Result<()>, now: Instant) {
        if self.status != SubmitStatus::Submitting {
            tracing::warn!("Ignoring submission result: no submission in flight");
            return;
        }

        match outcome {
            Ok(()) => {
                self.values = Default::default();
                self.step = FormStep::default();
                self.status = SubmitStatus::Success;
                self.close_at = Some(now + self.config.close_delay());
            }
            Err(e) => {
                self.status = SubmitStatus::Error(e.to_string());
                self.banner_until = Some(now + self.config.error_dismiss());
            }
        }
    }

    /// Advance timers: dismiss an expired error banner, close after success
    pub fn tick(&mut self, now: Instant) {
        if let Some(until) = self.banner_until {
            if now >= until {
                self.banner_until = None;
                if matches!(self.status, SubmitStatus::Error(_)) {
                    self.status = SubmitStatus::Idle;
                }
            }
        }

        if let Some(at) = self.close_at {
            if now >= at && self.status != SubmitStatus::Submitting {
                self.close();
            }
        }
    }

    /// Whether a timer is pending, so the UI keeps ticking
    pub fn has_pending_timer(&self) -> bool {
        self.banner_until.is_some() || self.close_at.is_some()
    }
}
