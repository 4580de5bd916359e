mod common;
mod fetcher_tests;
