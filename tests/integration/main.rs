//! Integration test suite

mod cli_tests;
mod crawl_tests;
