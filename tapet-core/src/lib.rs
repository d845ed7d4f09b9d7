pub mod autostart;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod http;
pub mod interval;
pub mod ipc;
pub mod json_path;
pub mod models;
pub mod notify;
pub mod paths;
pub mod refresh;
pub mod sources;
pub mod state;
