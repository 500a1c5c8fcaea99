mod json_identity_cache;

pub use json_identity_cache::{CachedIdentity, JsonIdentityCache};
