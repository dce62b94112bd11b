use cosmwasm_schema::cw_serde;
use cosmwasm_std::Binary;

/// Claim name the verifier checks when a route carries `Criterion::Expires`.
/// The value is a serialized `cw_utils::Expiration`.
pub const CW_EXPIRATION: &str = "cw_exp";

/// Claim name carrying the credential's revocation index, checked against
/// `Criterion::NotContainedIn` on routes with a revocation list.
pub const IDX: &str = "idx";

pub type RouteId = u64;

/// A verifiable presentation travels on chain as raw bytes in the base64
/// `Binary` envelope (compact SD-JWT serialization, not JSON-quoted).
pub type VerifiablePresentation = Binary;

/// The json key for a disclosed claim.
pub type CriterionKey = String;

/// The criteria a route requires of disclosed claims, in registration order.
pub type PresentationReq = Vec<(CriterionKey, Criterion)>;

/// Route requirements used in registration (and instantiation).
#[cw_serde]
pub struct RegisterRouteRequest {
    pub route_id: RouteId,
    pub requirements: RouteVerificationRequirements,
}

/// Verification requirements for a single route.
#[cw_serde]
pub struct RouteVerificationRequirements {
    /// Where the issuer verification data comes from.
    pub issuer_source_or_data: IssuerSourceOrData,
    /// The serialized `PresentationReq` the route enforces, in the base64
    /// `Binary` envelope.
    pub presentation_required: Binary,
}

#[cw_serde]
pub enum TrustRegistry {
    Cheqd = 1,
}

/// Issuer verification data, either inline or resolvable from a registry.
#[cw_serde]
pub struct IssuerSourceOrData {
    /// If `None`, the data is provided directly.
    pub source: Option<TrustRegistry>,
    /// The verification data, or its location at the trust registry.
    /// The verifier expects an issuer JWK when provided directly.
    pub data_or_location: Binary,
}

/// An app registration provided at contract instantiation.
#[cw_serde]
pub struct InitRegistration {
    pub app_addr: String,
    pub app_admin: String,
    pub routes: Vec<RegisterRouteRequest>,
}

/// Moves revocation indices between the revoked and unrevoked sets of a
/// route's revocation list.
#[cw_serde]
pub struct UpdateRevocationListRequest {
    pub route_id: RouteId,
    pub revoke: Vec<u64>,
    pub unrevoke: Vec<u64>,
}

#[cw_serde]
pub enum Criterion {
    String(String),
    Number(u64, MathsOperator),
    Boolean(bool),
    Expires(bool),
    NotContainedIn(Vec<u64>),
}

#[cw_serde]
pub enum MathsOperator {
    GreaterThan,
    LessThan,
    EqualTo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_wire_format_is_snake_case() {
        let criterion = Criterion::Number(18, MathsOperator::GreaterThan);

        assert_eq!(
            serde_json::to_string(&criterion).unwrap(),
            r#"{"number":[18,"greater_than"]}"#
        );
    }

    #[test]
    fn presentation_req_serializes_as_pairs() {
        let req: PresentationReq = vec![
            ("age".to_string(), Criterion::Number(18, MathsOperator::GreaterThan)),
            ("active".to_string(), Criterion::Boolean(true)),
        ];

        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"[["age",{"number":[18,"greater_than"]}],["active",{"boolean":true}]]"#
        );
    }

    #[test]
    fn revocation_list_criterion_round_trips() {
        let req: PresentationReq =
            vec![(IDX.to_string(), Criterion::NotContainedIn(vec![1, 2, 3]))];

        let json = serde_json::to_string(&req).unwrap();
        let parsed: PresentationReq = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, req);
    }
}
