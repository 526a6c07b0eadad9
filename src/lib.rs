//! MacroScope email relay — forwards stored inbound emails to a fixed recipient.

pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod event;
pub mod handler;
pub mod message;
pub mod store;
