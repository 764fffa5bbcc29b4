//! Password reset handlers

pub(crate) mod request;
pub(crate) mod reset;
pub(crate) mod verify;
