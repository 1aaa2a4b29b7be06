// src/services/mod.rs
pub mod forwarder;
pub mod query_log;

pub use forwarder::{Forwarder, HttpForwarder, UpstreamReply};
pub use query_log::{QueryLog, SqliteQueryLog};
