pub mod commands;
pub mod config;
pub mod console;
pub mod content;
pub mod error;
pub mod history;
pub mod manual;
pub mod neofetch;
pub mod rescue;
pub mod services;
pub mod shell;
pub mod storage;
pub mod system;
pub mod terminal;
pub mod vfs;

pub use system::System;
pub use terminal::{Output, Terminal};
