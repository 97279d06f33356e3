pub mod common;
pub mod participation;
pub mod prize;
pub mod ranking;
pub mod registration;
pub mod statistics;
