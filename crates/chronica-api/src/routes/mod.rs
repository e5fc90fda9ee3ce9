//! HTTP routes outside the hub.

pub mod health;
