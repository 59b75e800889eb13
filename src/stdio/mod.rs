pub mod server;

pub use server::{BrowserMcpServer, build_tools, into_call_result};
