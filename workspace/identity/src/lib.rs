//! Identity layer of the microblog: the rules a user record must satisfy
//! before it is persisted, secret hashing and verification, and the user and
//! micropost operations built on top of them.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`validation`] | field rules for users and microposts |
//! | [`password`] | Argon2id hashing of passwords and tokens |
//! | [`auth`] | digest lookup and token authentication |
//! | [`users`] | create, update, reload, destroy, remember, activate, reset |
//! | [`microposts`] | create, feed, delete, counts |

pub mod auth;
pub mod error;
pub mod microposts;
pub mod password;
pub mod users;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{authenticate, authenticated, DigestKind};
pub use error::{IdentityError, Result};
pub use validation::{FieldMessage, NewMicropost, NewUser, UserChanges};
