//! Core types for HomeoWare.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod chat;
pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use chat::{ChatMessage, Sender};
pub use email::{Email, EmailError};
pub use id::RecordId;
pub use price::Price;
pub use role::UserRole;
