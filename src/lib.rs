//! git-chain: visualize and maintain chains of stacked pull requests
//!
//! The library builds a forest of branches from pull request head/base
//! pairs, renders it as a tree, prunes closed leaves and plans the rebases
//! that propagate a change down a stack. Remote and local state are reached
//! through the [`platform::PlatformService`] and [`repo::VersionControl`]
//! ports.

pub mod auth;
pub mod config;
pub mod error;
pub mod graph;
pub mod platform;
pub mod rebase;
pub mod render;
pub mod repo;
pub mod types;

pub use error::{Error, Result};
