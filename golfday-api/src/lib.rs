//! # golfday-api
//!
//! The shared type definitions of the golf day HTTP API. Both the server
//! and any client bind against these types; they define the JSON wire
//! format of every endpoint.

pub mod auth;
pub mod id;
pub mod photos;
pub mod records;
pub mod teams;
pub mod tournaments;
pub mod users;
