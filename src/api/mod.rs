//! # API Layer
//!
//! External interfaces. Only the REST API is provided.

pub mod rest;
