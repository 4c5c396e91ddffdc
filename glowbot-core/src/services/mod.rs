// File: src/services/mod.rs

pub mod action_dispatcher;
pub mod command_router;
pub mod command_service;
pub mod message_service;

pub use action_dispatcher::ActionDispatcher;
pub use command_router::route_message;
pub use command_service::{CommandService, CooldownTracker};
pub use message_service::MessageService;
