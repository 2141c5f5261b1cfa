//! API Module
//!
//! PokeAPI client that consults the response cache before going to the network.
//!
//! # Endpoints
//! - `GET /location-area` - Paginated list of location areas
//! - `GET /location-area/{name}` - Details of one area
//! - `GET /pokemon/{name}` - Details of one pokemon

pub mod client;

pub use client::PokeClient;
