//! Utilities shared by the watch party relay server and client.

pub mod logger;
pub mod time;
