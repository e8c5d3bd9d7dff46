//! obs-websocket connection data and constants

pub mod constants;
mod connection;

pub use connection::{parse_connection_url, ConnectionConfig};
