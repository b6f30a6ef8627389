//! Integration tests for the Attesta workspace.
//!
//! The tests live in `tests/` and exercise the registry crates together,
//! end to end. This library target is intentionally empty.
