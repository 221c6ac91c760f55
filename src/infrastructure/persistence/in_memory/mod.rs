//! # In-Memory Stores
//!
//! - [`InMemoryTradeStore`]: trade records and status history
//!
//! ## Thread Safety
//!
//! Implementations guard their state with a `parking_lot::RwLock`.

pub mod trade_store;

pub use trade_store::InMemoryTradeStore;
