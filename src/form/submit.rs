use std::fmt::{Debug, Formatter};
use std::time::Duration;

use futures_timer::Delay;
use tracing::{debug, info, warn};

use super::controller::{
    ContactController, ContactForm, FieldError, FormError, FormResult, ResetTicket,
    SubmissionOutcome, SubmitPhase, transition_phase, write_lock,
};
use crate::delivery::{DeliveryError, DeliveryReceipt, MailPayload};

pub const DELIVERY_FAILED: &str = "Oops! We broke it. Please try again later.";

#[derive(Debug)]
pub enum SubmitReport {
    Invalid(FieldError),
    ChallengeMissing,
    Delivered {
        outcome: SubmissionOutcome,
        reset: ScheduledReset,
    },
}

enum AttemptStart {
    Invalid(FieldError),
    ChallengeMissing,
    Dispatch {
        payload: MailPayload,
        ticket: ResetTicket,
    },
}

/// Delayed return to `Editing`. A no-op once a newer attempt has started.
#[must_use = "the outcome is only cleared when the reset is run"]
pub struct ScheduledReset {
    controller: ContactController,
    ticket: ResetTicket,
    delay: Duration,
}

impl ScheduledReset {
    pub fn ticket(&self) -> ResetTicket {
        self.ticket
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay, then clears the outcome and the form if no newer
    /// attempt has started. Returns whether anything was cleared.
    pub async fn run(self) -> FormResult<bool> {
        if !self.delay.is_zero() {
            Delay::new(self.delay).await;
        }
        self.controller.finish_reset(self.ticket)
    }
}

impl Debug for ScheduledReset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledReset")
            .field("ticket", &self.ticket)
            .field("delay", &self.delay)
            .finish()
    }
}

impl ContactController {
    /// Fails with [`FormError::AlreadySubmitting`] while another attempt is
    /// running. Delivery failures end up in the returned outcome.
    pub async fn submit(&self) -> FormResult<SubmitReport> {
        let (payload, ticket) = match self.begin_attempt()? {
            AttemptStart::Invalid(error) => return Ok(SubmitReport::Invalid(error)),
            AttemptStart::ChallengeMissing => return Ok(SubmitReport::ChallengeMissing),
            AttemptStart::Dispatch { payload, ticket } => (payload, ticket),
        };

        info!(
            ticket = ticket.0,
            message_len = payload.message.len(),
            "dispatching contact message"
        );
        let result = self
            .transport
            .deliver(&payload)
            .await
            .and_then(|response| response.into_receipt());
        let outcome = outcome_for(result);

        self.challenge.reset();
        self.settle(ticket, outcome.clone())?;

        Ok(SubmitReport::Delivered {
            outcome,
            reset: ScheduledReset {
                controller: self.clone(),
                ticket,
                delay: self.options.reset_delay(),
            },
        })
    }

    fn begin_attempt(&self) -> FormResult<AttemptStart> {
        let (model, ticket) = {
            let mut state = write_lock(&self.state, "starting submit attempt")?;
            if state.in_flight || state.phase == SubmitPhase::Validating {
                warn!("submit ignored while another attempt is running");
                return Err(FormError::AlreadySubmitting);
            }
            transition_phase(&mut state, SubmitPhase::Validating)?;
            state.submit_count = state.submit_count.saturating_add(1);
            let ticket = state.issue_ticket();
            state.pending_reset = None;
            state.outcome = SubmissionOutcome::Idle;
            state.field_error = None;
            (state.model.clone(), ticket)
        };

        // Validator and challenge run unlocked; they may read the controller.
        let verdict = self.validator.validate(&model);
        let token = match verdict {
            Some(_) => None,
            None => self
                .challenge
                .value()
                .filter(|token| !token.trim().is_empty()),
        };

        let mut state = write_lock(&self.state, "finishing submit validation")?;
        if let Some(error) = verdict {
            debug!(field = %error.field, "contact form failed validation");
            state.field_error = Some(error.clone());
            transition_phase(&mut state, SubmitPhase::Editing)?;
            return Ok(AttemptStart::Invalid(error));
        }
        let Some(token) = token else {
            debug!("challenge token missing, submission blocked");
            state.outcome = SubmissionOutcome::Failure(FieldError::captcha().message);
            transition_phase(&mut state, SubmitPhase::Editing)?;
            return Ok(AttemptStart::ChallengeMissing);
        };

        let payload = MailPayload::new(&model, token);
        state.in_flight = true;
        transition_phase(&mut state, SubmitPhase::Submitting)?;
        Ok(AttemptStart::Dispatch { payload, ticket })
    }

    fn settle(&self, ticket: ResetTicket, outcome: SubmissionOutcome) -> FormResult<()> {
        let mut state = write_lock(&self.state, "settling delivery call")?;
        state.in_flight = false;
        state.model = ContactForm::default();
        state.outcome = outcome;
        transition_phase(&mut state, SubmitPhase::Resolved)?;
        state.pending_reset = Some(ticket);
        Ok(())
    }

    pub(super) fn finish_reset(&self, ticket: ResetTicket) -> FormResult<bool> {
        let mut state = write_lock(&self.state, "applying delayed reset")?;
        if state.pending_reset != Some(ticket) {
            debug!(ticket = ticket.0, "skipping superseded delayed reset");
            return Ok(false);
        }
        state.pending_reset = None;
        state.outcome = SubmissionOutcome::Idle;
        state.model = ContactForm::default();
        transition_phase(&mut state, SubmitPhase::Editing)?;
        Ok(true)
    }
}

fn outcome_for(result: Result<DeliveryReceipt, DeliveryError>) -> SubmissionOutcome {
    match result {
        Ok(receipt) => {
            info!("contact message delivered");
            SubmissionOutcome::Success(receipt.message)
        }
        Err(DeliveryError::Rejected { kind, message }) => {
            warn!(kind = %kind, "mail endpoint reported a failure");
            SubmissionOutcome::Failure(message)
        }
        Err(error) => {
            warn!(%error, "contact message delivery failed");
            SubmissionOutcome::Failure(DELIVERY_FAILED.to_string())
        }
    }
}
