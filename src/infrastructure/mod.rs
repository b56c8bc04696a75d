//! Infrastructure layer - services, persistence adapters and external providers

pub mod admin;
pub mod auth;
pub mod image;
pub mod logging;
pub mod object_storage;
pub mod payment;
pub mod storage;
pub mod team;
pub mod user;
