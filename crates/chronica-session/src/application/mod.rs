//! Application layer for the Session context: read models and the outbound
//! notification vocabulary.

pub mod notifications;
pub mod snapshot;
