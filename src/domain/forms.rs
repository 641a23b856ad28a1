//! Submitted form payloads and their field-level validation.

use serde::Deserialize;
use std::fmt;

const MIN_PASSWORD_LEN: usize = 8;
const MIN_MESSAGE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Form: Default {
    const NAME: &'static str;

    fn fields() -> &'static [&'static str];

    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[derive(Default)]
struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.fail(field, "This field is required.");
            return false;
        }
        true
    }

    fn email(&mut self, field: &'static str, value: &str) {
        if !self.required(field, value) {
            return;
        }
        let valid = value
            .trim()
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
            });
        if !valid {
            self.fail(field, "Invalid email address.");
        }
    }

    fn min_len(&mut self, field: &'static str, value: &str, min: usize) {
        if self.required(field, value) && value.chars().count() < min {
            self.fail(field, format!("Field must be at least {min} characters long."));
        }
    }

    fn equal_to(&mut self, field: &'static str, value: &str, other: &str) {
        if value != other {
            self.fail(field, "Passwords must match.");
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

impl Form for LoginForm {
    const NAME: &'static str = "LoginForm";

    fn fields() -> &'static [&'static str] {
        &["email", "password", "remember"]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::default();
        v.email("email", &self.email);
        v.required("password", &self.password);
        v.finish()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Form for SignupForm {
    const NAME: &'static str = "SignupForm";

    fn fields() -> &'static [&'static str] {
        &["name", "email", "password", "confirm_password"]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::default();
        v.required("name", &self.name);
        v.email("email", &self.email);
        v.min_len("password", &self.password, MIN_PASSWORD_LEN);
        v.equal_to("confirm_password", &self.confirm_password, &self.password);
        v.finish()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

impl Form for ContactForm {
    const NAME: &'static str = "ContactForm";

    fn fields() -> &'static [&'static str] {
        &["name", "email", "subject", "message"]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::default();
        v.required("name", &self.name);
        v.email("email", &self.email);
        v.min_len("message", &self.message, MIN_MESSAGE_LEN);
        v.finish()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ServiceRequestForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub service_type: String,
    pub details: String,
}

impl Form for ServiceRequestForm {
    const NAME: &'static str = "ServiceRequestForm";

    fn fields() -> &'static [&'static str] {
        &["name", "email", "phone", "service_type", "details"]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::default();
        v.required("name", &self.name);
        v.email("email", &self.email);
        v.required("service_type", &self.service_type);
        v.min_len("details", &self.details, MIN_MESSAGE_LEN);
        v.finish()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NewsletterForm {
    pub email: String,
}

impl Form for NewsletterForm {
    const NAME: &'static str = "NewsletterForm";

    fn fields() -> &'static [&'static str] {
        &["email"]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::default();
        v.email("email", &self.email);
        v.finish()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl Form for ForgotPasswordForm {
    const NAME: &'static str = "ForgotPasswordForm";

    fn fields() -> &'static [&'static str] {
        &["email"]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::default();
        v.email("email", &self.email);
        v.finish()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl Form for ResetPasswordForm {
    const NAME: &'static str = "ResetPasswordForm";

    fn fields() -> &'static [&'static str] {
        &["password", "confirm_password"]
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::default();
        v.min_len("password", &self.password, MIN_PASSWORD_LEN);
        v.equal_to("confirm_password", &self.confirm_password, &self.password);
        v.finish()
    }
}

/// Static description of a form type, used by the diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct FormInfo {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    /// Whether a blank submission is rejected by `validate`.
    pub rejects_blank: fn() -> bool,
}

fn describe<F: Form>() -> FormInfo {
    FormInfo {
        name: F::NAME,
        fields: F::fields(),
        rejects_blank: rejects_blank::<F>,
    }
}

fn rejects_blank<F: Form>() -> bool {
    F::default().validate().is_err()
}

#[must_use]
pub fn registered_forms() -> [FormInfo; 7] {
    [
        describe::<LoginForm>(),
        describe::<SignupForm>(),
        describe::<ContactForm>(),
        describe::<ServiceRequestForm>(),
        describe::<NewsletterForm>(),
        describe::<ForgotPasswordForm>(),
        describe::<ResetPasswordForm>(),
    ]
}
