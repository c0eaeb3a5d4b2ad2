pub mod address;
pub mod ingest;
pub mod reputation;
pub mod reviews;
pub mod top;
pub mod validate;
