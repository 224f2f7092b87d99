//! Application layer containing the settlement orchestration.
//!
//! `SettlementOrchestrator` is the entry point: it resolves providers through
//! the `ProviderRegistry`, keeps the in-flight transaction index and commits the
//! `Pending` to `Paid` transition through the folio store's compare-and-set.

pub mod loyalty;
pub mod orchestrator;
pub mod registry;
