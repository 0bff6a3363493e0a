pub mod chat;
pub mod console;

pub use chat::{run_chat, ChatCommand};
pub use console::Console;
