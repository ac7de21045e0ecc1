pub mod cli;
pub mod config;
pub mod intent;
pub mod logging;
pub mod server;
pub mod transport;
