//! Account lifecycle: signup, email verification, login and sessions,
//! password recovery, and profile preferences.
//!
//! Flow state lives in two places only: account/session rows in Postgres and
//! the signed tokens carried by verification and reset links. Handlers stay
//! thin; persistence is in [`storage`], shared helpers in [`utils`].

mod storage;
mod utils;

pub mod login;
pub mod password;
pub mod principal;
pub mod profile;
pub mod session;
pub mod signup;
pub mod types;
pub mod verification;
