//! Unit tests for nevera modules
//!
//! These tests exercise the public API. Network tests only talk to
//! servers bound on 127.0.0.1 inside the test.

mod test_animator;
mod test_config;
mod test_server;
mod test_snippets;
