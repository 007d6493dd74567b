//! Two-player word chain game server.
//!
//! Each word has to start with the last letter of the previous one, be new
//! to the game and at least four letters long, and exist in the dictionary.
//! The turn engine lives in [`game`]; everything else exposes it over HTTP
//! and WebSocket.

pub mod app_state;
pub mod cleanup;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod routes;
pub mod session;
pub mod ws_socket;
