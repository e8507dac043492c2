//! Intel Module - threat-intelligence sample acquisition
//!
//! Sits entirely outside the analysis pipeline: nothing here runs
//! during triage. It exists to stock the training corpus.

pub mod client;

pub use client::{BazaarClient, IntelError, SampleInfo};
