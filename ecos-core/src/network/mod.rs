pub mod connection;

pub use connection::{Connection, ConnectionInfo, DEFAULT_CONNECT_TIMEOUT, EcosConnection};
