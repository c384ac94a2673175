use std::sync::LazyLock;

use regex::Regex;

use super::controller::{ContactForm, FieldError, FieldKey};

pub const NAME_MISSING: &str = "But... what should I call you?";
pub const EMAIL_MISSING: &str = "How about an email?";
pub const EMAIL_MALFORMED: &str = "I don't think that one will work.";
pub const MESSAGE_MISSING: &str = "Ok I'll guess. You want to talk about...";
pub const CAPTCHA_MISSING: &str = "Please check the captcha";

// ASCII-only case folding: with Unicode on, `[A-Z]` would also match 'ſ' and
// the Kelvin sign.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$")
        .expect("email pattern must compile")
});

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Field keys in declaration order.
    fn keys() -> &'static [FieldKey];
}

/// Checks a whole model and reports at most one failing field.
pub trait FormValidator<T>: Send + Sync {
    fn validate(&self, model: &T) -> Option<FieldError>;
}

impl<T, F> FormValidator<T> for F
where
    F: Fn(&T) -> Option<FieldError> + Send + Sync,
{
    fn validate(&self, model: &T) -> Option<FieldError> {
        (self)(model)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ContactValidator;

impl FormValidator<ContactForm> for ContactValidator {
    fn validate(&self, model: &ContactForm) -> Option<FieldError> {
        validate_contact(&model.name, &model.email, &model.message)
    }
}

/// Validates the contact fields in order: name, email presence, email shape,
/// message. The first failing rule wins.
pub fn validate_contact(name: &str, email: &str, message: &str) -> Option<FieldError> {
    if is_blank(name) {
        return Some(FieldError::new(FieldKey::NAME, NAME_MISSING));
    }
    if is_blank(email) {
        return Some(FieldError::new(FieldKey::EMAIL, EMAIL_MISSING));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Some(FieldError::new(FieldKey::EMAIL, EMAIL_MALFORMED));
    }
    if is_blank(message) {
        return Some(FieldError::new(FieldKey::MESSAGE, MESSAGE_MISSING));
    }
    None
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
