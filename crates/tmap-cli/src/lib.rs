//! CLI library components for the thematic map pipeline.

pub mod logging;
