//! Verification tools for built array models.
//!
//! # Key Components
//!
//! - [`oracle`]: verification functions returning pass/fail verdicts
//! - [`report`]: structured text model descriptions
//! - [`assertions`]: assertion helpers that collect every failing verdict

pub mod assertions;
pub mod oracle;
pub mod report;

pub use assertions::HarnessError;
pub use oracle::OracleVerdict;
pub use report::ModelReport;
