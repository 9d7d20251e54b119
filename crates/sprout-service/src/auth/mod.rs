//! Accounts and bearer-token authentication.
//!
//! ## Module Organization
//!
//! - `account`: registration and login
//! - `authenticate`: resolves the user behind a request's bearer token
//! - `depot`: helpers for the authenticated user stored in the Salvo depot
//! - `password`: password hashing and verification with Argon2
//! - `token`: session token generation, hashing and issuance

pub mod account;
pub mod authenticate;
pub mod depot;
pub mod password;
pub mod token;

pub use account::{LoginRequest, RegisterRequest, Session, login, register};
pub use authenticate::{authenticate, bearer_token};
pub use depot::get_user_from_depot;
