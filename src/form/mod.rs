mod binding;
mod controller;
mod submit;
mod validation;


pub use binding::{
    ContactView, FieldView, ResponseTone, ResponseView, SEND_LABEL, SENDING_LABEL,
};
pub use contactform_derive::FormModel;
pub use controller::{
    ContactController, ContactForm, ContactFormEmailLens, ContactFormFields,
    ContactFormMessageLens, ContactFormNameLens, ContactSnapshot, FieldError, FieldKey, FormError,
    FormResult, ResetTicket, SubmissionOutcome, SubmitPhase,
};
pub use submit::{DELIVERY_FAILED, ScheduledReset, SubmitReport};
pub use validation::{
    CAPTCHA_MISSING, ContactValidator, EMAIL_MALFORMED, EMAIL_MISSING, FieldLens, FormModel,
    FormValidator, MESSAGE_MISSING, NAME_MISSING, validate_contact,
};
