use super::types::ReservationInput;
use chrono::{Locale, NaiveDate, NaiveTime};

const DATE_LOCALE: Locale = Locale::it_IT;

/// Long Italian date, e.g. "domenica 18 ottobre 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized("%A %-d %B %Y", DATE_LOCALE)
        .to_string()
}

/// Builds the reservation text sent to the restaurant.
///
/// `input` must already be trimmed and validated; `date` is its parsed date.
pub fn compose(input: &ReservationInput, date: NaiveDate) -> String {
    let mut text = String::from("🍽️ *NUOVA PRENOTAZIONE*\n\n");
    text.push_str(&format!("👤 *Nome:* {}\n", input.name));
    text.push_str(&format!("📧 *Email:* {}\n", input.email));
    text.push_str(&format!("📱 *Telefono:* {}\n", input.phone));
    text.push_str(&format!("📅 *Data:* {}\n", format_long_date(date)));
    text.push_str(&format!("🕐 *Ora:* {}\n", input.time));
    text.push_str(&format!("👥 *Ospiti:* {}\n", input.guests));
    if !input.notes.is_empty() {
        text.push_str(&format!("\n💬 *Note:*\n{}", input.notes));
    }
    text
}
