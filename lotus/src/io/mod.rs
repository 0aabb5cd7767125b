//! Side-effecting pieces: config files, stderr banners, the stdio transport.

pub mod config;
pub mod render;
pub mod stdio;
