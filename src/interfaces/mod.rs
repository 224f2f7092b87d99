//! Outer surfaces that feed the orchestrator: CSV inputs and reports.

pub mod csv;
