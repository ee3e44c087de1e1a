mod dispatch;
mod service;
mod template;

pub use dispatch::*;
pub use service::*;
pub use template::*;
