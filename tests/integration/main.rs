//! Integration tests driving the full router against the in-memory store

mod api_tests;
