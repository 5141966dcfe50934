pub mod migrate;
pub mod notify;
pub mod serve;
