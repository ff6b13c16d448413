//! schooldesk - a terminal administration console for a multi-tenant
//! school-management platform
//!
//! The console talks to the platform's REST API over an authenticated
//! HTTP client, turns every failure into a user-facing alert, and shows
//! users, roles, tenants, staff, students and their billing and
//! attendance in a set of table views driven by one generic fetch helper.
//!
//! # Modules
//!
//! * [`api`] - HTTP client wrapper, alert extraction and resource paths
//! * [`backend`] - The backend seam the UI talks to
//! * [`config`] - Application configuration management
//! * [`fetch`] - Generic view loading and mutations
//! * [`notify`] - Global alerts and session-expiry signals
//! * [`storage`] - Persisted session token
//! * [`ui`] - Terminal user interface components
//! * [`views`] - Catalogue of admin views

/// HTTP client, alert extraction and REST resource paths
pub mod api;

/// Attendance month summaries for the calendar view
pub mod attendance;

/// Backend abstraction the UI talks to
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Generic data loading for every view
pub mod fetch;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Notification channel for alerts and session expiry
pub mod notify;

/// Untyped backend records
pub mod record;

/// Session token persistence
pub mod storage;

/// Terminal user interface components and rendering
pub mod ui;

/// Utility functions for date handling
pub mod utils;

/// Admin view catalogue
pub mod views;
