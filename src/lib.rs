//! Storefront: a terminal client for a small shop
//!
//! - `storage`/`session`: the persisted login session
//! - `notification`: one transient message at a time, auto-dismissed
//! - `auth`: the login/registration HTTP contract and form controllers
//! - `catalog`/`router`: static product data and the route table
//! - `app`: the composition root tying them together
//! - `tui`/`cli`: the two front-ends

pub mod app;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod notification;
pub mod router;
pub mod session;
pub mod storage;
pub mod tui;
