// ABOUTME: Library crate for dockdeck exposing the backend client, table and terminal layers for testing

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod manifest;
pub mod models;
pub mod table;
pub mod terminal;
