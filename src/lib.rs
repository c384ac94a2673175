pub mod challenge;
pub mod config;
pub mod delivery;
pub mod form;
pub mod prelude;

pub use challenge::{ChallengeProvider, InMemoryChallenge};
pub use config::{ConfigError, ContactOptions};
pub use form::{ContactController, ContactForm, SubmissionOutcome, SubmitReport};
