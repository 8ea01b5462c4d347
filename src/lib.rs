//! InternLink - Internship Matching Platform Client Core
//!
//! This crate implements the session lifecycle, protected navigation, and
//! listing-catalog state for the InternLink client. Persistence and
//! credential verification are delegated to an external managed backend,
//! reached only through the ports defined here.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
