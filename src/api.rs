//! Public API surface of the engine.
//!
//! This file consolidates the types a consumer of the crate works with:
//! the id newtypes and the DTOs crossing the gateway boundary. Everything
//! re-exported here derives Serialize/Deserialize for JSON.

pub use crate::gateway::{
    CityGateway, ComputationRequest, GatewayConfig, GatewayError, GatewayResult, IsochroneRequest,
    PoiLookupRequest, PoiLookupResponse, UserPoiPayload,
};
pub use crate::models::{
    AnalysisLevel, Category, CategorySet, DistrictKey, DistrictStats, Feature, FeatureCollection,
    FeatureProperties, GridStats, Poi, PoiId, Region, RegionError, ScenarioMode, ScenarioState,
    TransportMode, UserPoi, ALL_CATEGORIES,
};
pub use crate::session::{
    CityScopeSession, ComputationState, ComputationTicket, PoiListing, PoiRefreshTicket,
    ReachSession, RequestToken,
};

#[cfg(feature = "http-backend")]
pub use crate::gateway::HttpGateway;
#[cfg(feature = "local-backend")]
pub use crate::gateway::LocalGateway;
