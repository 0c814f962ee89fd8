//! JSONL sync trail.
//!
//! Per-day JSONL files record every committed mutation of the local store.

pub mod writer;
