//! Service layer: orchestration of core rules over the repositories.
//!
//! Handlers stay thin; these services own the operation flows
//! (validate → resolve → settle → allocate → persist) and are directly
//! testable against an in-memory database.

pub mod ledger;
pub mod reports;
