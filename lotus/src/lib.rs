//! Stateful step-sequence server for contemplative reasoning journeys.
//!
//! A client submits labelled steps one at a time; the server validates each
//! step against a fixed taxonomy, keeps the ordered history of the current
//! journey, and answers with one of four response shapes.
//!
//! - **[`core`]**: Pure, deterministic logic (taxonomy, validation, reset
//!   policy, response selection, summaries). No I/O.
//! - **[`io`]**: Side-effecting pieces (config files, stderr banners, stdio
//!   transport).
//!
//! [`server`] ties the two together behind the MCP JSON-RPC surface described
//! in [`protocol`] and [`tools`].

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod protocol;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tools;
