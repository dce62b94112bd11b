use std::path::PathBuf;

use error_stack::{report, Result, ResultExt};
use sdjwt_verifier_api::msg::InstantiateMsg;
use sdjwt_verifier_api::types::{Criterion, MathsOperator, PresentationReq, RegisterRouteRequest};
use serde_json::{json, Value};
use tracing::info;

use crate::config::Config;
use crate::contract::VerifierContract;
use crate::credentials::{self, IssuerKey};
use crate::{deploy, Error};

const DEMO_ROUTE_ID: u64 = 1;
const MAX_PRESENTATION_LEN: usize = 3000;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the verifier contract wasm artifact
    pub wasm: PathBuf,

    /// Minimum age the demo route requires a disclosed `age` to exceed
    #[arg(long, default_value_t = 18)]
    pub min_age: u64,

    /// Label of the instantiated contract
    #[arg(long, default_value = "sdjwt-verifier-demo")]
    pub label: String,

    /// Chain registry file to use instead of the configured one
    #[arg(long)]
    pub chain_config: Option<PathBuf>,
}

/// Drives the full flow against a fresh deployment: register a route
/// requiring `age > min_age`, verify a qualifying presentation on chain,
/// then show that an underage and a tampered presentation are both
/// rejected by the contract.
pub async fn run(config: Config, args: Args) -> Result<Option<String>, Error> {
    let mut executor = super::executor(&config, args.chain_config.as_deref()).await?;
    let app_addr = executor.wallet().address().to_string();

    let init_msg = InstantiateMsg {
        max_presentation_len: MAX_PRESENTATION_LEN,
        init_registrations: vec![],
    };
    let deployment = deploy::deploy(&mut executor, &args.wasm, &init_msg, vec![], &args.label)
        .await
        .change_context(Error::Deploy)?;
    info!(address = %deployment.address, "verifier contract deployed");

    let mut verifier = VerifierContract::new(executor, deployment.address.clone());

    let issuer_key = IssuerKey::generate().change_context(Error::Credential)?;
    let presentation_req: PresentationReq = vec![(
        "age".to_string(),
        Criterion::Number(args.min_age, MathsOperator::GreaterThan),
    )];
    let requirements = credentials::route_requirements(&issuer_key.jwk(), &presentation_req)
        .change_context(Error::Credential)?;
    verifier
        .register(
            &app_addr,
            vec![RegisterRouteRequest {
                route_id: DEMO_ROUTE_ID,
                requirements,
            }],
        )
        .await
        .change_context(Error::Demo)?;
    info!(
        route_id = DEMO_ROUTE_ID,
        min_age = args.min_age,
        "route registered"
    );

    let credential =
        credentials::issue(&issuer_key, claims(30)).change_context(Error::Credential)?;
    let presentation =
        credentials::present(credential, claims(30), &[]).change_context(Error::Credential)?;
    verifier
        .verify(&presentation, DEMO_ROUTE_ID, Some(app_addr.clone()))
        .await
        .change_context(Error::Demo)?;
    info!(age = 30, "qualifying presentation verified on chain");

    let underage_credential =
        credentials::issue(&issuer_key, claims(10)).change_context(Error::Credential)?;
    let underage_presentation = credentials::present(underage_credential, claims(10), &[])
        .change_context(Error::Credential)?;
    match verifier
        .verify(&underage_presentation, DEMO_ROUTE_ID, Some(app_addr.clone()))
        .await
    {
        Ok(_) => {
            return Err(report!(Error::Demo)
                .attach_printable("underage presentation was unexpectedly accepted"))
        }
        Err(err) => info!(age = 10, "underage presentation rejected as expected: {err:#}"),
    }

    let tampered = credentials::tamper(&presentation).change_context(Error::Credential)?;
    match verifier
        .verify(&tampered, DEMO_ROUTE_ID, Some(app_addr.clone()))
        .await
    {
        Ok(_) => {
            return Err(report!(Error::Demo)
                .attach_printable("tampered presentation was unexpectedly accepted"))
        }
        Err(err) => info!("tampered presentation rejected as expected: {err:#}"),
    }

    let routes = verifier
        .routes(&app_addr)
        .await
        .change_context(Error::Query)?;

    Ok(Some(format!(
        "demo complete: verifier {} has routes {:?} registered for {}",
        deployment.address, routes, app_addr
    )))
}

fn claims(age: u64) -> Value {
    json!({
        "iss": "issuer",
        "firstname": "John",
        "lastname": "Doe",
        "age": age,
    })
}
