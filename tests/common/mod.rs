#![allow(dead_code)]

pub use edi_test_utils::builders;
pub use edi_test_utils::{init_tracing, with_timeout, RecordingSink, SinkCall};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
