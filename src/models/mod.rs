pub mod enums;
pub mod report;
pub mod test_result;

pub use enums::{Flag, Sex};
pub use report::{ReportData, ReportId};
pub use test_result::TestResult;
