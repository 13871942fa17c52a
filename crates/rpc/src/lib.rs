pub mod protocol;
pub mod server;

pub use protocol::{is_notification, RequestId};
pub use server::{DispatchError, McpServer};
