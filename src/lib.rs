//! Pokémon Finder - search the PokeAPI catalog from the terminal
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod catalog;
pub mod components;
pub mod config;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod sprite;
pub mod state;
pub mod ui;
