//! # Persistence Layer
//!
//! ## Store Traits (Ports)
//!
//! - [`TradeStore`]: exclusive owner of trade records
//!
//! ## Implementations
//!
//! - `in_memory`: [`InMemoryTradeStore`]

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryTradeStore;
pub use traits::TradeStore;
