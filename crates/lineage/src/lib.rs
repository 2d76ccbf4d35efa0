//! Lineage - an in-memory lineage graph engine.
//!
//! This crate loads a pre-computed cache of database objects and their
//! dependencies, indexes it once per generation and answers bounded
//! upstream/downstream lineage queries. It provides both a library and the
//! `lineage` CLI.
//!
//! The usual entry point is [`service::LineageService`], which publishes an
//! immutable [`snapshot::Snapshot`] and swaps it atomically on reload.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod analysis;
pub mod catalog;
pub mod columns;
pub mod domain;
pub mod engine;
pub mod error;
pub mod index;
pub mod loader;
pub mod service;
pub mod snapshot;
pub mod store;

// Configuration and application context
pub mod app;
pub mod config;

// Public CLI module (needed by binary)
pub mod cli;

// Output formatting
pub mod output;
