//! Headless end-to-end tests across forgeplan-core and forgeplan-data.
//!
//! Everything lives under `tests/`; this crate has no public API.
