//! Live adapters that perform real network calls.

pub mod openai;
