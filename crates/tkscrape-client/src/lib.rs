pub mod client;
pub mod error;
pub mod limiter;
pub mod normalize;
pub mod types;

pub use client::ProfileClient;
pub use error::FetchError;
pub use limiter::ConcurrencyLimiter;
pub use normalize::{normalize_profile, FetchOutcome};
pub use types::{FetchedProfile, ProfileEnvelope, UserProfile};
