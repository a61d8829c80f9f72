//! Host-based integration tests for the shot clock core
//!
//! Scenarios run on the virtual clock of
//! [`Harness`](shotclock_core::test_utils::harness::Harness); the async tests
//! drive the same harness from tokio tasks with paused time, and the embassy
//! task bodies run on the embassy-time mock driver.

#[cfg(test)]
mod match_flow_tests;
#[cfg(test)]
mod rules_table_tests;
#[cfg(test)]
mod async_scheduling_tests;
#[cfg(test)]
mod task_loop_tests;
