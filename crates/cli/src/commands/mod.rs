pub mod basic;
pub mod control;
pub mod deploy;
pub mod env_check;
pub mod security;
pub mod setup;
