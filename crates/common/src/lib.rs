//! Common types shared by the X-Booker delegated client and its sample binary

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
