pub mod loan;
pub mod report;
