use super::types::{Field, FieldErrors, ReservationInput};
use crate::config::FormConfig;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s+\-()]+$").expect("valid phone regex"));

pub const NAME_MIN_LEN: usize = 2;
pub const PHONE_MIN_LEN: usize = 8;

pub const MSG_NAME: &str = "Inserisci un nome valido";
pub const MSG_EMAIL: &str = "Inserisci un'email valida";
pub const MSG_PHONE: &str = "Inserisci un numero di telefono valido";
pub const MSG_DATE_EMPTY: &str = "Seleziona una data";
pub const MSG_DATE_INVALID: &str = "Seleziona una data valida";
pub const MSG_DATE_PAST: &str = "Seleziona una data futura";
pub const MSG_TIME: &str = "Seleziona un orario";
pub const MSG_GUESTS: &str = "Seleziona il numero di ospiti";

/// Date format of the date control's value.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A check applied to one field's trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// At least `min_len` characters.
    Name { min_len: usize },
    Email,
    /// ASCII digits, whitespace, `+ - ( )` only, at least `min_len` characters.
    Phone { min_len: usize },
    /// ISO date not before today.
    NotBeforeToday,
    /// Required; when `options` is non-empty the value must be one of them.
    Choice {
        options: Vec<String>,
        message: &'static str,
    },
    Optional,
}

impl Rule {
    /// Returns the failure message, or `None` when `value` passes.
    pub fn check(&self, value: &str, today: NaiveDate) -> Option<&'static str> {
        match self {
            Rule::Name { min_len } => (value.chars().count() < *min_len).then_some(MSG_NAME),
            Rule::Email => (!EMAIL_RE.is_match(value)).then_some(MSG_EMAIL),
            Rule::Phone { min_len } => {
                let ok = PHONE_RE.is_match(value) && value.chars().count() >= *min_len;
                (!ok).then_some(MSG_PHONE)
            }
            Rule::NotBeforeToday => {
                if value.is_empty() {
                    return Some(MSG_DATE_EMPTY);
                }
                match parse_date(value) {
                    Some(date) if date < today => Some(MSG_DATE_PAST),
                    Some(_) => None,
                    None => Some(MSG_DATE_INVALID),
                }
            }
            Rule::Choice { options, message } => {
                let missing = value.is_empty()
                    || (!options.is_empty() && !options.iter().any(|o| o == value));
                missing.then_some(*message)
            }
            Rule::Optional => None,
        }
    }
}

/// Field-to-rule mapping used by the reservation form.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: BTreeMap<Field, Rule>,
}

impl RuleSet {
    pub fn new(config: &FormConfig) -> Self {
        let rules = BTreeMap::from([
            (Field::Name, Rule::Name { min_len: NAME_MIN_LEN }),
            (Field::Email, Rule::Email),
            (Field::Phone, Rule::Phone { min_len: PHONE_MIN_LEN }),
            (Field::Date, Rule::NotBeforeToday),
            (
                Field::Time,
                Rule::Choice {
                    options: config.time_slots.clone(),
                    message: MSG_TIME,
                },
            ),
            (
                Field::Guests,
                Rule::Choice {
                    options: config.guest_options.clone(),
                    message: MSG_GUESTS,
                },
            ),
            (Field::Message, Rule::Optional),
        ]);
        Self { rules }
    }

    /// Checks one field's raw text. Surrounding whitespace is ignored.
    pub fn check_field(&self, field: Field, raw: &str, today: NaiveDate) -> Option<&'static str> {
        self.rules
            .get(&field)
            .and_then(|rule| rule.check(raw.trim(), today))
    }

    /// Runs every rule, without short-circuiting, and collects all failures.
    pub fn validate(&self, input: &ReservationInput, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in Field::ALL {
            if let Some(msg) = self.check_field(field, input.get(field), today) {
                debug!("Field '{}' rejected: {}", field, msg);
                errors.insert(field, msg);
            }
        }
        errors
    }

    /// Validates `input` and, when every field passes, returns it trimmed
    /// together with its parsed date.
    pub fn accept(
        &self,
        input: &ReservationInput,
        today: NaiveDate,
    ) -> Result<AcceptedReservation, FieldErrors> {
        let input = input.trimmed();
        let mut errors = self.validate(&input, today);

        match parse_date(&input.date) {
            Some(date) if errors.is_empty() => Ok(AcceptedReservation { input, date }),
            Some(_) => Err(errors),
            None => {
                if !errors.contains(Field::Date) {
                    errors.insert(Field::Date, MSG_DATE_INVALID);
                }
                Err(errors)
            }
        }
    }
}

/// A reservation whose every field passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedReservation {
    pub input: ReservationInput,
    pub date: NaiveDate,
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(&FormConfig::default())
    }
}
