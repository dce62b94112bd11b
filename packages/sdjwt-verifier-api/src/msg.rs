use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

use crate::types::{
    InitRegistration, RegisterRouteRequest, RouteId, RouteVerificationRequirements,
    UpdateRevocationListRequest, VerifiablePresentation,
};

#[cw_serde]
pub struct InstantiateMsg {
    /// Maximum accepted length of a serialized presentation, in bytes.
    pub max_presentation_len: usize,
    /// Apps (and their routes) registered at instantiation.
    pub init_registrations: Vec<InitRegistration>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Moves revocation indices for one of the app's routes.
    /// Callable by the app admin.
    UpdateRevocationList {
        app_addr: String,
        request: UpdateRevocationListRequest,
    },
    /// Registers an app with the routes it wants presentations verified for.
    Register {
        app_addr: String,
        requests: Vec<RegisterRouteRequest>,
    },
    /// Verifies a presentation against the requirements of the given route.
    Verify {
        presentation: VerifiablePresentation,
        route_id: RouteId,
        /// Defaults to the sender when not set.
        app_addr: Option<String>,
        /// Extra criteria merged into the route's requirements for this
        /// verification only.
        additional_requirements: Option<Binary>,
    },
    /// Replaces (or, when `None`, clears) the requirements of a route.
    /// Callable by the app admin.
    Update {
        app_addr: String,
        route_id: RouteId,
        route_criteria: Option<RouteVerificationRequirements>,
    },
    /// Removes the app and all of its routes. Callable by the app admin.
    Deregister { app_addr: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Option<String>)]
    GetRouteVerificationKey { app_addr: String, route_id: RouteId },
    #[returns(String)]
    GetAppAdmin { app_addr: String },
    #[returns(Vec<RouteId>)]
    GetRoutes { app_addr: String },
    #[returns(RouteVerificationRequirements)]
    GetRouteRequirements { app_addr: String, route_id: RouteId },
}
