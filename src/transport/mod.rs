pub mod http;
pub mod proto;
pub mod rpc;
