//! Domain models for the API.
//!
//! These types sit between the document store and the HTTP surface:
//! stored fields come in as plain JSON, get validated or shaped here, and
//! go out as response bodies.

pub mod identity;
pub mod order;
pub mod profile;

pub use identity::IdentityClaim;
pub use order::{Order, OrderFields};
pub use profile::{ProfileFieldError, ProfileFields, UserProfile};
