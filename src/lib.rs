//! addr-watch: interface address watcher
//!
//! A library for receiving the kernel's interface-address change
//! notifications over rtnetlink and turning them into typed events.

pub mod cancel;
pub mod config;
pub mod event;
pub mod monitor;
pub mod netlink;
pub mod output;
