pub mod chat;
pub mod files;
pub mod plugins;
pub mod themes;
pub mod wire;
