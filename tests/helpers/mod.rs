//! Test helpers module
//!
//! Mock backend server, canned payloads and a test context that wires
//! settings, session and data source against the mock.

pub mod backend_mock;
pub mod test_context;
pub mod test_data;

pub use backend_mock::*;
pub use test_context::*;
pub use test_data::*;
