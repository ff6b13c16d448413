//! Core UI functionality for the console.
//!
//! - [`actions`] - Action definitions and UI state transitions
//! - [`component`] - Base component trait
//! - [`event_handler`] - Terminal input polling
//! - [`task_manager`] - Background backend calls reporting back as actions
//!
//! Components turn key events into [`Action`]s, pass actions through
//! [`Component::update`], and anything left over is handled by the app.
//! Backend calls never block the loop: the [`TaskManager`] spawns them and
//! their results come back on a channel as more actions.

pub mod actions;
pub mod component;
pub mod event_handler;
pub mod task_manager;

pub use actions::{Action, DialogType, FormMode};
pub use component::Component;
pub use event_handler::{EventHandler, EventType};
pub use task_manager::{TaskId, TaskManager};
