pub mod crack;
pub mod lcg;

pub use crack::{recover, CancelToken, Match, RecoverError, Search, MAX_BOUND};
pub use lcg::{Constants, Lcg};
