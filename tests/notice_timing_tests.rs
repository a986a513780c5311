use aria_reservations::notice::NoticePhase;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{RecordingOpener, create_test_form, valid_input};

#[tokio::test(start_paused = true)]
async fn test_confirmation_notice_self_dismisses() {
    let opener = Arc::new(RecordingOpener::new());
    let mut form = create_test_form(opener);

    form.submit(valid_input()).unwrap();
    let active = form.notices().active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].text, "✅ Prenotazione inviata! Conferma su WhatsApp.");
    assert_eq!(active[0].phase, NoticePhase::Visible);

    tokio::time::sleep(Duration::from_millis(4200)).await;
    assert_eq!(form.notices().active()[0].phase, NoticePhase::FadingOut);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(form.notices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_notice_does_not_gate_next_submission() {
    let opener = Arc::new(RecordingOpener::new());
    let mut form = create_test_form(opener.clone());

    form.submit(valid_input()).unwrap();
    form.submit(valid_input()).unwrap();

    assert_eq!(form.notices().active().len(), 2);
    assert_eq!(opener.get_requests().len(), 2);

    tokio::time::sleep(form.notices().lifetime() + Duration::from_millis(1)).await;
    assert!(form.notices().is_empty());
}
