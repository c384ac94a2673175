pub use crate::challenge::{ChallengeProvider, InMemoryChallenge};
pub use crate::config::{ConfigError, ContactOptions};
pub use crate::delivery::{
    DeliveryError, DeliveryResponse, HttpMailTransport, MailPayload, MailTransport,
};
pub use crate::form::{
    ContactController, ContactForm, ContactView, FieldError, FieldKey, FieldLens, FormError,
    FormModel, FormResult, ResponseTone, ScheduledReset, SubmissionOutcome, SubmitPhase,
    SubmitReport,
};
