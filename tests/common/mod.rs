#![allow(dead_code)]

use aria_reservations::{
    Error, Result,
    clock::FixedClock,
    config::Config,
    handoff::{LinkOpener, OpenRequest},
    reservation::{ReservationForm, ReservationInput},
};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// Records every open request instead of launching anything.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    pub requests: Mutex<Vec<OpenRequest>>,
    pub fail: bool,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a blocked popup.
    pub fn blocked() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn get_requests(&self) -> Vec<OpenRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, request: &OpenRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(Error::handoff("popup blocked"));
        }
        Ok(())
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub fn create_test_form(opener: Arc<RecordingOpener>) -> ReservationForm {
    ReservationForm::with_clock(&Config::default(), opener, Arc::new(FixedClock(today())))
}

pub fn valid_input() -> ReservationInput {
    ReservationInput {
        name: "Mario Rossi".to_string(),
        email: "mario@test.com".to_string(),
        phone: "+39 333 1234567".to_string(),
        date: "2026-10-18".to_string(),
        time: "20:00".to_string(),
        guests: "2".to_string(),
        notes: String::new(),
    }
}

/// In-memory log sink for asserting on formatted tracing output.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with INFO-level logs written to the returned sink.
pub fn capture_info_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}
