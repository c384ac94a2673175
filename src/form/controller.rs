use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::debug;

use super::FormModel;
use super::validation::{CAPTCHA_MISSING, ContactValidator, FieldLens, FormValidator};
use crate::challenge::ChallengeProvider;
use crate::config::ContactOptions;
use crate::delivery::MailTransport;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const NAME: Self = Self("name");
    pub const EMAIL: Self = Self("email");
    pub const MESSAGE: Self = Self("message");
    pub const CAPTCHA: Self = Self("captcha");

    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldError {
    pub field: FieldKey,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FieldKey, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn captcha() -> Self {
        Self::new(FieldKey::CAPTCHA, CAPTCHA_MISSING)
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum SubmissionOutcome {
    #[default]
    Idle,
    Success(String),
    Failure(String),
}

impl SubmissionOutcome {
    pub fn is_idle(&self) -> bool {
        matches!(self, SubmissionOutcome::Idle)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Idle => None,
            SubmissionOutcome::Success(message) | SubmissionOutcome::Failure(message) => {
                Some(message)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmitPhase {
    #[default]
    Editing,
    Validating,
    Submitting,
    Resolved,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ResetTicket(pub u64);

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContactSnapshot {
    pub model: ContactForm,
    pub field_error: Option<FieldError>,
    pub outcome: SubmissionOutcome,
    pub in_flight: bool,
    pub phase: SubmitPhase,
    pub submit_count: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit phase transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitPhase, to: SubmitPhase },
    #[error("a contact message is already being delivered")]
    AlreadySubmitting,
    #[error("unknown form field `{0}`")]
    UnknownField(String),
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct ContactState {
    pub(super) model: ContactForm,
    pub(super) field_error: Option<FieldError>,
    pub(super) outcome: SubmissionOutcome,
    pub(super) in_flight: bool,
    pub(super) phase: SubmitPhase,
    pub(super) submit_count: u32,
    pub(super) last_ticket: ResetTicket,
    pub(super) pending_reset: Option<ResetTicket>,
}

impl ContactState {
    pub(super) fn issue_ticket(&mut self) -> ResetTicket {
        self.last_ticket = ResetTicket(self.last_ticket.0.wrapping_add(1));
        self.last_ticket
    }
}

/// Owns the contact form state and drives submissions.
///
/// Clones share the same state, so a rendering surface and a spawned delayed
/// reset can both hold one.
#[derive(Clone)]
pub struct ContactController {
    pub(super) options: ContactOptions,
    pub(super) state: Arc<RwLock<ContactState>>,
    pub(super) validator: Arc<dyn FormValidator<ContactForm>>,
    pub(super) transport: Arc<dyn MailTransport>,
    pub(super) challenge: Arc<dyn ChallengeProvider>,
}

impl ContactController {
    pub fn new(
        options: ContactOptions,
        transport: impl MailTransport,
        challenge: impl ChallengeProvider,
    ) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(ContactState {
                model: ContactForm::default(),
                field_error: None,
                outcome: SubmissionOutcome::Idle,
                in_flight: false,
                phase: SubmitPhase::Editing,
                submit_count: 0,
                last_ticket: ResetTicket(0),
                pending_reset: None,
            })),
            validator: Arc::new(ContactValidator),
            transport: Arc::new(transport),
            challenge: Arc::new(challenge),
        }
    }

    pub fn with_validator(mut self, validator: impl FormValidator<ContactForm> + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn options(&self) -> &ContactOptions {
        &self.options
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<ContactForm>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "writing contact field")?;
        lens.set(&mut state.model, value);
        if state.field_error.take().is_some() {
            debug!(field = %key, "field edit cleared the active field error");
        }
        Ok(())
    }

    pub fn set_field(&self, key: &str, value: impl Into<String>) -> FormResult<()> {
        let fields = ContactForm::fields();
        match resolve_key(key)? {
            FieldKey::NAME => self.set(fields.name(), value.into()),
            FieldKey::EMAIL => self.set(fields.email(), value.into()),
            FieldKey::MESSAGE => self.set(fields.message(), value.into()),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }

    pub fn clear_field(&self, key: &str) -> FormResult<()> {
        self.set_field(key, String::new())
    }

    pub fn clear_error(&self) -> FormResult<()> {
        write_lock(&self.state, "clearing field error")?.field_error = None;
        Ok(())
    }

    pub fn field_error(&self) -> FormResult<Option<FieldError>> {
        Ok(read_lock(&self.state, "reading field error")?
            .field_error
            .clone())
    }

    pub fn outcome(&self) -> FormResult<SubmissionOutcome> {
        Ok(read_lock(&self.state, "reading submission outcome")?
            .outcome
            .clone())
    }

    pub fn is_in_flight(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading in-flight flag")?.in_flight)
    }

    pub fn snapshot(&self) -> FormResult<ContactSnapshot> {
        let state = read_lock(&self.state, "creating contact snapshot")?;
        Ok(ContactSnapshot {
            model: state.model.clone(),
            field_error: state.field_error.clone(),
            outcome: state.outcome.clone(),
            in_flight: state.in_flight,
            phase: state.phase,
            submit_count: state.submit_count,
        })
    }
}

fn resolve_key(key: &str) -> FormResult<FieldKey> {
    ContactForm::keys()
        .iter()
        .copied()
        .find(|candidate| candidate.as_str() == key)
        .ok_or_else(|| FormError::UnknownField(key.to_string()))
}

pub(super) fn transition_phase(state: &mut ContactState, next: SubmitPhase) -> FormResult<()> {
    let current = state.phase;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitPhase::Editing, SubmitPhase::Validating)
            | (SubmitPhase::Resolved, SubmitPhase::Validating)
            | (SubmitPhase::Validating, SubmitPhase::Editing)
            | (SubmitPhase::Validating, SubmitPhase::Submitting)
            | (SubmitPhase::Submitting, SubmitPhase::Resolved)
            | (SubmitPhase::Resolved, SubmitPhase::Editing)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    debug!(from = ?current, to = ?next, "contact form phase change");
    state.phase = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
