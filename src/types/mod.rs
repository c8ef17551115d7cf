//! Type definitions for the log anomaly pipeline

pub mod record;

pub use record::LogRecord;
