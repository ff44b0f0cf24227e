//! Tests for the relay pipeline.




#[cfg(test)]
mod logging_tests;
