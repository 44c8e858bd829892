//! HTTP Handlers

pub mod game;
