//! Preservation registry library.
//!
//! Records institutions, intellectual objects, files and their PREMIS
//! events, tracks the work items that move bags through ingest, restoration
//! and deletion, and runs the deletion approval workflow.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
