use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::form::{ContactForm, Field};

/// Structured record sent to the email delivery service.
///
/// Field names double as the template variables of the email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub service_interest: String,
    pub budget: String,
    pub timestamp: DateTime<Utc>,
}

impl ContactPayload {
    /// Snapshot a (validated) form; values are trimmed
    pub fn from_form(form: &ContactForm, timestamp: DateTime<Utc>) -> Self {
        let get = |field: Field| form.value(field).trim().to_string();
        Self {
            first_name: get(Field::FirstName),
            last_name: get(Field::LastName),
            email: get(Field::Email),
            phone: get(Field::Phone),
            company: get(Field::Company),
            service_interest: get(Field::ServiceInterest),
            budget: get(Field::Budget),
            timestamp,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_template_params_shape() {
        let mut form = ContactForm::default();
        form.set(Field::FirstName, "  Ada ");
        form.set(Field::Budget, "$100k+");
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let payload = ContactPayload::from_form(&form, ts);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["first_name"], "Ada");
        assert_eq!(json["budget"], "$100k+");
        assert_eq!(json["service_interest"], "");
        assert_eq!(json["timestamp"], "2026-03-01T12:00:00Z");
    }
}
