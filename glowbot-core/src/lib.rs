// src/lib.rs

pub mod actions;
pub mod eventbus;
pub mod platforms;
pub mod repositories;
pub mod services;

pub use glowbot_common::error::Error;
