//! Session authorization capability
//!
//! The token service resolves a subject from a request; establishing the
//! session for that subject belongs to whatever framework embeds it, behind
//! the `SessionAuthority` trait.

mod authority;
mod memory;

pub use authority::SessionAuthority;
pub use memory::InMemorySessionAuthority;
