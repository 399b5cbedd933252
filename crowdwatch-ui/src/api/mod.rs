//! Browser Transports
//!
//! gloo-net implementation of the request contract and the `localStorage`
//! token store.

pub mod client;
pub mod storage;

pub use client::HttpApi;
pub use storage::{get_api_base, LocalStorageTokenStore};
