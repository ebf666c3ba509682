//! Desktop client for Choosee, a group restaurant picker.
//!
//! One person creates a voting session for an area; everyone invited swipes
//! yes or no on nearby restaurants until the server finds a match.

pub mod api;
pub mod config;
pub mod error;
pub mod gui;
pub mod models;
pub mod voting;

pub use error::{ChooseeError, Result};
