//! API Module
//!
//! HTTP handlers and routing for the key-value server.
//!
//! # Endpoints
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /getall` - List every entry
//! - `POST /set/:key/:value` - Store a value with the default TTL
//! - `POST /set/:key/:value/:ttl` - Store a value with an explicit TTL
//! - `PUT /remove/:key` - Clear a value
//! - `GET /dump` - Write the snapshot file and return it
//! - `POST /load` - Replace the store with the snapshot file
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
