//! External ASN resolvers.

pub mod cymru;
pub mod mock;

pub use cymru::CymruResolver;
pub use mock::MockResolver;
