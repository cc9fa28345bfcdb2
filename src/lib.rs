// ABOUTME: Library crate for template-wizard exposing the wizard core, API client and terminal host

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod wizard;
