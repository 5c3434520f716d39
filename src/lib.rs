//! Taskdeck: personal task-management service.
//!
//! Owner-scoped task CRUD over a relational table, with day/week/month
//! view composition and optional machine-generated task instructions.
//!
//! # Architecture
//!
//! The service is a thin pipeline around one domain entity:
//! - **Store**: [`store::TaskStore`] is the persistence contract;
//!   [`store::SqliteTaskStore`] backs it locally and
//!   [`client::HttpTaskStore`] backs it against a remote instance
//! - **Server**: axum HTTP surface exposing the four task operations,
//!   the composed views, and instruction generation
//! - **Controller**: per-session collection state machine that reloads
//!   on identity change and refetches after every mutation
//! - **Views**: pure today/week/month projections built on the
//!   calendar and classification helpers

pub mod classify;
pub mod client;
pub mod config;
pub mod controller;
pub mod dates;
pub mod error;
pub mod server;
pub mod store;
pub mod task;
pub mod textgen;
pub mod views;

pub use client::HttpTaskStore;
pub use config::AppConfig;
pub use controller::{ActionOutcome, LoadPhase, TaskController};
pub use error::{Result, TaskError};
pub use server::{ApiServer, AppState};
pub use store::{SqliteTaskStore, TaskStore};
pub use task::{Task, TaskDraft, TaskStatus};
pub use textgen::InstructionGenerator;
