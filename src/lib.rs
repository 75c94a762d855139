pub mod corpus;
pub mod diff;
pub mod filter;
pub mod generate;
pub mod options;
pub mod oracle;
pub mod report;
pub mod run;
