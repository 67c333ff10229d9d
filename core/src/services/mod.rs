//! Business services containing domain logic and use cases.

pub mod session;
pub mod token;

// Re-export commonly used types
pub use session::{InMemorySessionAuthority, SessionAuthority};
pub use token::{Clock, SigningAlgorithm, SystemClock, TokenService, TokenServiceConfig};
#[cfg(any(test, feature = "test-util"))]
pub use token::FixedClock;
