pub mod clock;
pub mod config;
pub mod error;
pub mod handoff;
pub mod notice;
pub mod reservation;

pub use error::{Error, Result};
