#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod config;
mod context;
mod error;
mod host;
mod navigator;
mod snapshot;
mod store;

pub use config::{LocationConfig, DEFAULT_INITIAL_URL};
pub use context::LocationContext;
pub use error::NavigationError;
pub use host::*;
pub use navigator::Navigator;
pub use snapshot::LocationSnapshot;
pub use store::{LocationStore, Subscription};

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::{
        LocationConfig, LocationContext, LocationSnapshot, LocationStore, NavigationError,
        Navigator, Subscription,
    };
}
