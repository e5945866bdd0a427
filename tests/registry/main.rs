//! Registry integration test suite.
//!
//! Runs against an in-memory SQLite database with the real migrations and a
//! recording queue in place of NSQ.
//!
//! Run with: cargo test --test registry

mod test_helpers;

mod test_api;
mod test_deletion_preconditions;
mod test_deletion_workflow;
mod test_institutions;
mod test_pending_guard;
mod test_premis_events;
mod test_requeue;
mod test_spot_tests;
