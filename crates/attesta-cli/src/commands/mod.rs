pub mod add_verifier;
pub mod check;
pub mod common;
pub mod events;
pub mod init;
pub mod register;
pub mod remove_verifier;
pub mod revoke;
pub mod start;
pub mod status;
pub mod verifiers;
pub mod verify;
