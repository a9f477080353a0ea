//! # pungo-store
//!
//! `DataStore` adapters for the Pungo backend.
//!
//! - [`SupabaseStore`] talks to the hosted backend's PostgREST API with the
//!   service-role key.
//! - [`MemoryStore`] keeps everything in process for development and tests.

mod memory;
mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;
