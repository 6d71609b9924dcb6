pub mod batteries;
pub mod chat;
pub mod config;
pub mod error;
pub mod matching;
pub mod output;
pub mod profile;
pub mod programs;
pub mod region;
pub mod server;
