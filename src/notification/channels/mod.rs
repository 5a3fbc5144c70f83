//! 具体渠道实现

pub mod console;
pub mod email;

pub use console::ConsoleChannel;
pub use email::EmailChannel;
