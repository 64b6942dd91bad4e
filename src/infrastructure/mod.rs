//! Infrastructure layer - collaborator implementations and services

pub mod chunkers;
pub mod embedding;
pub mod http;
pub mod logging;
pub mod memory;
pub mod services;
