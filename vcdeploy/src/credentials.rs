use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use error_stack::{report, Result, ResultExt};
use josekit::jwk::alg::ed::{EdCurve, EdKeyPair};
use josekit::jwk::Jwk;
use jsonwebtoken::EncodingKey;
use sd_jwt_rs::issuer::ClaimsForSelectiveDisclosureStrategy;
use sd_jwt_rs::{SDJWTHolder, SDJWTIssuer, SDJWTSerializationFormat};
use sdjwt_verifier_api::codec;
use sdjwt_verifier_api::types::{
    IssuerSourceOrData, PresentationReq, RouteVerificationRequirements,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to generate the issuer key")]
    KeyGeneration,
    #[error("failed to issue the credential")]
    Issue,
    #[error("failed to build the presentation")]
    Present,
    #[error("presentation is malformed")]
    MalformedPresentation,
    #[error("failed to encode the route requirements")]
    Requirements,
}

/// An in-process Ed25519 issuer key for demo credentials. The private half
/// never leaves this struct; routes are registered with the public JWK.
pub struct IssuerKey {
    key_pair: EdKeyPair,
}

impl IssuerKey {
    pub fn generate() -> Result<Self, Error> {
        EdKeyPair::generate(EdCurve::Ed25519)
            .map(|key_pair| Self { key_pair })
            .change_context(Error::KeyGeneration)
    }

    pub fn jwk(&self) -> Jwk {
        self.key_pair.to_jwk_public_key()
    }

    fn encoding_key(&self) -> Result<EncodingKey, Error> {
        EncodingKey::from_ed_pem(&self.key_pair.to_pem_private_key())
            .change_context(Error::KeyGeneration)
    }
}

/// Issues an SD-JWT credential with every claim selectively disclosable,
/// in compact serialization.
pub fn issue(key: &IssuerKey, claims: Value) -> Result<String, Error> {
    let mut issuer = SDJWTIssuer::new(key.encoding_key()?, Some("EdDSA".to_string()));

    issuer
        .issue_sd_jwt(
            claims,
            ClaimsForSelectiveDisclosureStrategy::AllLevels,
            None,
            false,
            SDJWTSerializationFormat::Compact,
        )
        .change_context(Error::Issue)
}

/// Builds a holder presentation from an issued credential. All claims are
/// disclosed except the ones in `omit_attributes`, which are marked false
/// in the disclosure map.
pub fn present(sd_jwt: String, claims: Value, omit_attributes: &[&str]) -> Result<String, Error> {
    let mut claims_to_disclose = claims;
    for attribute in omit_attributes {
        claims_to_disclose[*attribute] = Value::Bool(false);
    }

    let claims_to_disclose = claims_to_disclose
        .as_object()
        .ok_or(report!(Error::Present))?
        .clone();

    let mut holder =
        SDJWTHolder::new(sd_jwt, SDJWTSerializationFormat::Compact).change_context(Error::Present)?;
    holder
        .create_presentation(claims_to_disclose, None, None, None, None)
        .change_context(Error::Present)
}

/// Rewrites the first disclosure of a compact presentation so its digest no
/// longer matches the one signed into the credential. The result still
/// parses as an SD-JWT but must fail verification.
pub fn tamper(presentation: &str) -> Result<String, Error> {
    let mut parts: Vec<String> = presentation.split('~').map(str::to_string).collect();
    let disclosure = parts.get_mut(1).ok_or(report!(Error::MalformedPresentation))?;
    if disclosure.is_empty() {
        return Err(report!(Error::MalformedPresentation));
    }

    let decoded = URL_SAFE_NO_PAD
        .decode(disclosure.as_bytes())
        .change_context(Error::MalformedPresentation)?;
    let mut decoded: Value =
        serde_json::from_slice(&decoded).change_context(Error::MalformedPresentation)?;

    // a disclosure is a [salt, claim name, claim value] array
    let value = decoded
        .get_mut(2)
        .ok_or(report!(Error::MalformedPresentation))?;
    *value = Value::String("tampered".to_string());

    *disclosure = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&decoded).change_context(Error::MalformedPresentation)?,
    );

    Ok(parts.join("~"))
}

/// Packages an issuer JWK and a criteria list into the requirements the
/// verifier expects at route registration.
pub fn route_requirements(
    jwk: &Jwk,
    presentation_req: &PresentationReq,
) -> Result<RouteVerificationRequirements, Error> {
    Ok(RouteVerificationRequirements {
        issuer_source_or_data: IssuerSourceOrData {
            source: None,
            data_or_location: codec::to_wasm_binary(jwk).change_context(Error::Requirements)?,
        },
        presentation_required: codec::to_wasm_binary(presentation_req)
            .change_context(Error::Requirements)?,
    })
}
