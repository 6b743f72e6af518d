//! Remote control over a Unix domain socket.

pub mod server;
