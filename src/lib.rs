//! # ReachScope
//!
//! Population-weighted accessibility ("x-minute city") analysis engine.
//!
//! This crate computes how much of a city's population reaches selected
//! facility categories (schools, healthcare, supermarkets, ...) within a
//! travel-time threshold, for the base dataset and for user-edited what-if
//! scenarios that add or remove points of interest. Travel times themselves
//! come from an external computation service; this crate owns the
//! aggregation math and the state that keeps user edits coherent with
//! asynchronous backend calls.
//!
//! ## Features
//!
//! - **Aggregation**: coverage share and population-weighted median travel
//!   time at grid level, per-category weighted means at district level
//! - **Scenario editing**: hypothetical POI additions and removals layered
//!   over the backend inventory
//! - **Orchestration**: token-guarded computation lifecycle where a stale
//!   response can never overwrite a newer one
//! - **Single-origin reach**: one isochrone and the POIs inside it
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: public surface, id newtypes and DTO re-exports
//! - [`models`]: domain models (categories, region, geodata, POIs, scenario)
//! - [`services`]: pure aggregation over geodata responses
//! - [`gateway`]: external collaborators behind the [`gateway::CityGateway`]
//!   trait, with HTTP and in-memory implementations
//! - [`session`]: per-screen orchestrators owning all mutable state
//!
//! ## Concurrency model
//!
//! Every session is owned by exactly one controller and mutated through
//! `&mut self`; gateway calls are the only suspend points. There are no
//! locks and no concurrent writers, only sequencing: network flows are
//! split into `begin_*`/`apply_*` phases carrying monotone request tokens,
//! and an outcome whose token is no longer the latest is discarded.

pub mod api;

pub mod gateway;
pub mod models;

pub mod services;

pub mod session;
