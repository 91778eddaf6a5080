//! Integration test entry point.
//!
//! Drives the full orchestration core (real scheduler, real phase
//! machine, real baseline store) against mock sensor/storage/sink
//! adapters.

mod mock_hw;
mod service_tests;
