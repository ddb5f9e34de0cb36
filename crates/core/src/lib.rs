//! HomeoWare Core - Shared types library.
//!
//! This crate provides the types used across all HomeoWare components:
//! - `admin` - API client, submit orchestration, and the livestock chatbot
//! - `cli` - Command-line front end for registration and stock management
//!
//! # Architecture
//!
//! The core crate contains only types, validation rules, and pure list
//! queries - no I/O and no HTTP clients. Every function here can be called
//! repeatedly (on every field blur) without side effects.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, roles, prices, and chat messages
//! - [`records`] - Entity records as transmitted by the remote API
//! - [`validation`] - Per-kind field rules producing field-path error maps
//! - [`form`] - Tagged unions over the form inputs and validated drafts
//! - [`listing`] - Case-insensitive filtering and stable sorting of lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form;
pub mod listing;
pub mod records;
pub mod types;
pub mod validation;

pub use form::{FormInput, FormPayload, RecordKind};
pub use listing::{Searchable, SortKey, Sortable};
pub use records::*;
pub use types::*;
pub use validation::{FieldErrors, Validate};
