// Optipix - on-the-fly image optimization with an S3 read-through cache

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod optimizer;
pub mod pipeline;
pub mod server;
pub mod storage;
