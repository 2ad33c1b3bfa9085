//! REST API and gateway integration tests.

mod gateway_tests;
