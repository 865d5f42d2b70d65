//! Google Workspace REST access.
//!
//! `client` owns the HTTP plumbing, `pager` the continuation-token loop,
//! and the remaining modules implement the service traits for
//! `GoogleClient`, one resource area each.

pub mod client;
pub mod directory;
pub mod drive;
pub mod pager;
pub mod reports;

pub use client::GoogleClient;
