use super::{
    message,
    types::{Field, FieldErrors, OutboundMessage, ReservationInput},
    validator::{AcceptedReservation, DATE_FORMAT, RuleSet},
};
use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    handoff::{Handoff, LinkOpener},
    notice::NoticeBoard,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

// Form states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Editing,
    SubmittedSuccess,
}

// Form events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    SubmitRejected,
    SubmitAccepted,
    FieldEdited,
    Reset,
}

impl FormState {
    /// Every (state, event) pair is defined; only an accepted submit leaves `Editing`.
    pub fn next(self, event: FormEvent) -> FormState {
        match (self, event) {
            (_, FormEvent::SubmitAccepted) => FormState::SubmittedSuccess,
            (_, FormEvent::SubmitRejected | FormEvent::FieldEdited | FormEvent::Reset) => {
                FormState::Editing
            }
        }
    }
}

/// User actions the form reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Edit { field: Field, value: String },
    Submit,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Edited,
    Sent(OutboundMessage),
    Rejected(FieldErrors),
    Cleared,
}

/// The reservation form: current control values, inline errors and state.
pub struct ReservationForm {
    rules: RuleSet,
    handoff: Handoff,
    opener: Arc<dyn LinkOpener>,
    notices: NoticeBoard,
    notice_text: String,
    clock: Arc<dyn Clock>,
    values: ReservationInput,
    errors: FieldErrors,
    state: FormState,
}

impl ReservationForm {
    pub fn new(config: &Config, opener: Arc<dyn LinkOpener>) -> Self {
        Self::with_clock(config, opener, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, opener: Arc<dyn LinkOpener>, clock: Arc<dyn Clock>) -> Self {
        debug!(
            "Creating reservation form for recipient {}",
            config.handoff.recipient
        );
        Self {
            rules: RuleSet::new(&config.form),
            handoff: Handoff::new(&config.handoff),
            opener,
            notices: NoticeBoard::new(&config.notice),
            notice_text: config.notice.text.clone(),
            clock,
            values: ReservationInput::default(),
            errors: FieldErrors::new(),
            state: FormState::Editing,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &ReservationInput {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Inline message shown next to `field`, if it is in error.
    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Earliest selectable date, as the date control expects it.
    pub fn min_date(&self) -> String {
        self.clock.today().format(DATE_FORMAT).to_string()
    }

    pub fn dispatch(&mut self, action: FormAction) -> FormOutcome {
        match action {
            FormAction::Edit { field, value } => {
                self.edit(field, value);
                FormOutcome::Edited
            }
            FormAction::Submit => match self.submit_current() {
                Ok(message) => FormOutcome::Sent(message),
                Err(errors) => FormOutcome::Rejected(errors),
            },
            FormAction::Reset => {
                self.reset();
                FormOutcome::Cleared
            }
        }
    }

    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value);
        self.transition(FormEvent::FieldEdited);
    }

    pub fn fill(&mut self, input: ReservationInput) {
        self.values = input;
        self.transition(FormEvent::FieldEdited);
    }

    /// Clears every control and every inline error.
    pub fn reset(&mut self) {
        self.values = ReservationInput::default();
        self.errors.clear();
        self.transition(FormEvent::Reset);
    }

    /// Replaces the control values with `input` and submits them.
    pub fn submit(&mut self, input: ReservationInput) -> Result<OutboundMessage, FieldErrors> {
        self.values = input;
        self.submit_current()
    }

    /// Validates the current values and, when all pass, hands the reservation off.
    ///
    /// On rejection the values are kept for correction and every failing field
    /// carries its message. On success the form is cleared and a confirmation
    /// notice is shown.
    pub fn submit_current(&mut self) -> Result<OutboundMessage, FieldErrors> {
        self.errors.clear();

        let today = self.clock.today();
        let AcceptedReservation { input, date } = match self.rules.accept(&self.values, today) {
            Ok(accepted) => accepted,
            Err(errors) => {
                info!("📝 Reservation rejected: {}", errors);
                self.errors = errors.clone();
                self.transition(FormEvent::SubmitRejected);
                return Err(errors);
            }
        };

        let text = message::compose(&input, date);
        let link = self.handoff.link(&text);
        self.handoff.dispatch(&*self.opener, &link);

        self.values = ReservationInput::default();
        self.notices.show(self.notice_text.clone());
        self.transition(FormEvent::SubmitAccepted);

        info!(
            "🍽️ Reservation on {} at {} ({} guests) handed off",
            input.date, input.time, input.guests
        );
        Ok(OutboundMessage { text, link })
    }

    fn transition(&mut self, event: FormEvent) {
        let old_state = self.state;
        let new_state = old_state.next(event);

        if old_state != new_state {
            info!(
                "🎯 Form state transition: {:?} -> {:?} (event: {:?})",
                old_state, new_state, event
            );
        } else {
            debug!("🔄 Form staying in state {:?} after event {:?}", old_state, event);
        }

        self.state = new_state;
    }
}
