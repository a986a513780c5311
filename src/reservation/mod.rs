pub mod form;
pub mod message;
pub mod types;
pub mod validator;

pub use form::{FormAction, FormEvent, FormOutcome, FormState, ReservationForm};
pub use types::{Field, FieldErrors, OutboundMessage, ReservationInput};
pub use validator::{AcceptedReservation, Rule, RuleSet};
