pub mod context;
pub mod issuers;
