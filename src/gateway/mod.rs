//! Backend access for computations, POI lookups and district geometry.
//!
//! This module abstracts the computation backend behind the
//! [`CityGateway`] trait, allowing different backends to be swapped
//! easily:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Session Layer (orchestrator, POI listing, reach)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  CityGateway Trait - Abstract Interface                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │                               │
//! ┌───▼───────────────┐   ┌───────────▼───────────┐
//! │   HttpGateway     │   │     LocalGateway      │
//! │ (reqwest client)  │   │ (in-memory, testing)  │
//! └───────────────────┘   └───────────────────────┘
//! ```
//!
//! All trait methods take a fully-assembled request value. Sessions build
//! those from snapshots of their inputs, so nothing behind this trait ever
//! reads live UI state.

#[cfg(not(any(feature = "http-backend", feature = "local-backend")))]
compile_error!("Enable at least one gateway backend feature.");

use async_trait::async_trait;

use crate::models::{FeatureCollection, Poi};

pub mod config;
pub mod error;
pub mod wire;

#[cfg(feature = "http-backend")]
pub mod http;
#[cfg(feature = "local-backend")]
pub mod local;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use wire::{
    ComputationRequest, IsochroneRequest, PoiLookupRequest, PoiLookupResponse, UserPoiPayload,
};

#[cfg(feature = "http-backend")]
pub use http::HttpGateway;
#[cfg(feature = "local-backend")]
pub use local::{GridCell, LocalGateway};

/// Access to the computation backend.
#[async_trait]
pub trait CityGateway: Send + Sync {
    /// Run a travel-time computation and return the grid geodata.
    async fn compute(&self, request: &ComputationRequest) -> GatewayResult<FeatureCollection>;

    /// List the real POIs within a region, filtered by category.
    async fn list_pois(&self, request: &PoiLookupRequest) -> GatewayResult<Vec<Poi>>;

    /// Fetch the static district polygons.
    async fn districts(&self) -> GatewayResult<FeatureCollection>;

    /// Compute a single-origin isochrone polygon.
    async fn isochrone(&self, request: &IsochroneRequest) -> GatewayResult<serde_json::Value>;
}
