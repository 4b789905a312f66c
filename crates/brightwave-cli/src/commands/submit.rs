use anyhow::{anyhow, Result};

use brightwave_core::contact::{self, ContactForm, EmailJsClient, Field};
use brightwave_core::{content, AppConfig, Error};

/// Values for every contact form field
pub struct SubmitFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub service: String,
    pub budget: String,
}

pub async fn run(config: &AppConfig, fields: SubmitFields) -> Result<()> {
    if !fields.service.is_empty() && !content::SERVICES.contains(&fields.service.as_str()) {
        println!("Note: \"{}\" is not one of: {}", fields.service, content::SERVICES.join(", "));
    }

    let mut form = ContactForm::new(config.form.clone());
    form.set(Field::FirstName, fields.first_name);
    form.set(Field::LastName, fields.last_name);
    form.set(Field::Email, fields.email);
    form.set(Field::Phone, fields.phone);
    form.set(Field::Company, fields.company);
    form.set(Field::ServiceInterest, fields.service);
    form.set(Field::Budget, fields.budget);

    let client = EmailJsClient::new(&config.email)?;

    match contact::submit(&mut form, &client).await {
        Ok(()) => {
            println!("Message sent. We'll be in touch within two working days.");
            Ok(())
        }
        Err(Error::Validation(errors)) => {
            println!("Please fix the following:");
            for (field, error) in errors.iter() {
                println!("  {} {}", field.label(), error.message());
            }
            Err(anyhow!("{} field(s) need attention", errors.len()))
        }
        Err(e) => Err(anyhow!("Could not send your message: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> SubmitFields {
        SubmitFields {
            first_name: String::new(),
            last_name: String::new(),
            email: "nope".into(),
            phone: String::new(),
            company: String::new(),
            service: String::new(),
            budget: String::new(),
        }
    }

    #[tokio::test]
    async fn test_invalid_fields_reported_before_endpoint() {
        let mut config = AppConfig::default();
        config.email.endpoint = String::new();

        let err = run(&config, blank()).await.unwrap_err();
        assert_eq!(err.to_string(), "7 field(s) need attention");
    }
}
