//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweeper: Counts down entry TTLs and evicts expired entries

mod sweeper;

pub use sweeper::spawn_sweeper_task;
