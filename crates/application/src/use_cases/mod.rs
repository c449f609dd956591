//! Application use cases (business logic orchestration).

mod execute_test;
mod normalize_tests;

pub use execute_test::ExecuteTest;
pub use normalize_tests::NormalizeTests;
pub use run_tests::RunTests;
