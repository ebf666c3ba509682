pub mod decision;
pub mod patch;
pub mod place;
pub mod session;
pub mod status;
pub mod user;
