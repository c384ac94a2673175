use super::controller::{
    ContactController, ContactForm, ContactSnapshot, FieldError, FieldKey, FormResult,
    SubmissionOutcome, read_lock,
};
use super::validation::FieldLens;

pub const SEND_LABEL: &str = "Send";
pub const SENDING_LABEL: &str = "Sending...";

/// Everything a rendering surface needs to draw one input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldView {
    pub key: FieldKey,
    pub value: String,
    pub error: Option<String>,
    /// Whether the input should be drawn with the error border.
    pub highlighted: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseTone {
    Success,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResponseView {
    pub tone: ResponseTone,
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContactView {
    pub name: FieldView,
    pub email: FieldView,
    pub message: FieldView,
    pub button_label: &'static str,
    pub submit_disabled: bool,
    pub response: Option<ResponseView>,
}

impl ContactView {
    pub fn from_snapshot(snapshot: &ContactSnapshot) -> Self {
        let error = snapshot.field_error.as_ref();
        let model = &snapshot.model;
        Self {
            name: field_view(FieldKey::NAME, &model.name, error),
            email: field_view(FieldKey::EMAIL, &model.email, error),
            message: field_view(FieldKey::MESSAGE, &model.message, error),
            button_label: if snapshot.in_flight {
                SENDING_LABEL
            } else {
                SEND_LABEL
            },
            submit_disabled: snapshot.in_flight,
            response: response_view(&snapshot.outcome),
        }
    }

    pub fn field(&self, key: FieldKey) -> Option<&FieldView> {
        match key {
            FieldKey::NAME => Some(&self.name),
            FieldKey::EMAIL => Some(&self.email),
            FieldKey::MESSAGE => Some(&self.message),
            _ => None,
        }
    }
}

impl ContactController {
    pub fn view(&self) -> FormResult<ContactView> {
        Ok(ContactView::from_snapshot(&self.snapshot()?))
    }

    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<ContactForm>,
    {
        let key = lens.key();
        let state = read_lock(&self.state, "reading display error message")?;
        Ok(state
            .field_error
            .as_ref()
            .filter(|error| error.field == key)
            .map(|error| error.message.clone()))
    }
}

fn field_view(key: FieldKey, value: &str, error: Option<&FieldError>) -> FieldView {
    let error = error
        .filter(|error| error.field == key)
        .map(|error| error.message.clone());
    FieldView {
        key,
        value: value.to_string(),
        highlighted: error.is_some(),
        error,
    }
}

fn response_view(outcome: &SubmissionOutcome) -> Option<ResponseView> {
    match outcome {
        SubmissionOutcome::Idle => None,
        SubmissionOutcome::Success(message) => Some(ResponseView {
            tone: ResponseTone::Success,
            message: message.clone(),
        }),
        SubmissionOutcome::Failure(message) => Some(ResponseView {
            tone: ResponseTone::Error,
            message: message.clone(),
        }),
    }
}
