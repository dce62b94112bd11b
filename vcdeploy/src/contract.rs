use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::tx::Msg;
use error_stack::{Result, ResultExt};
use sdjwt_verifier_api::codec;
use sdjwt_verifier_api::msg::{ExecuteMsg, QueryMsg};
use sdjwt_verifier_api::types::{
    RegisterRouteRequest, RouteId, RouteVerificationRequirements, UpdateRevocationListRequest,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::broadcast::{TxExecutor, UnsignedTx};
use crate::cosmos::{self, CosmosClient};
use crate::events::TxResult;
use crate::result_ext::ResultCompatExt;
use crate::types::TMAddress;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to encode the contract message")]
    MsgEncoding,
    #[error("failed to execute the contract call")]
    Execute,
    #[error("failed to query the contract")]
    Query,
    #[error("contract returned a malformed response")]
    MalformedResponse,
}

/// Client for one deployed verifier contract. Every execute call wraps
/// exactly one `MsgExecuteContract` into one tx unit; calls are independent
/// of each other.
pub struct VerifierContract<T>
where
    T: CosmosClient,
{
    executor: TxExecutor<T>,
    address: TMAddress,
}

impl<T> VerifierContract<T>
where
    T: CosmosClient + Send,
{
    pub fn new(executor: TxExecutor<T>, address: TMAddress) -> Self {
        Self { executor, address }
    }

    pub fn address(&self) -> &TMAddress {
        &self.address
    }

    pub async fn execute(&mut self, msg: &ExecuteMsg) -> Result<TxResult, Error> {
        let msg = serde_json::to_vec(msg).change_context(Error::MsgEncoding)?;
        let execute_msg = ResultCompatExt::change_context(
            MsgExecuteContract {
                sender: self.executor.wallet().address().as_ref().clone(),
                contract: self.address.as_ref().clone(),
                msg,
                funds: vec![],
            }
            .to_any(),
            Error::MsgEncoding,
        )?;

        self.executor
            .execute(UnsignedTx::builder().msgs(vec![execute_msg]).build())
            .await
            .change_context(Error::Execute)
    }

    pub async fn register(
        &mut self,
        app_addr: &str,
        requests: Vec<RegisterRouteRequest>,
    ) -> Result<TxResult, Error> {
        self.execute(&ExecuteMsg::Register {
            app_addr: app_addr.to_string(),
            requests,
        })
        .await
    }

    pub async fn verify(
        &mut self,
        presentation: &str,
        route_id: RouteId,
        app_addr: Option<String>,
    ) -> Result<TxResult, Error> {
        self.execute(&ExecuteMsg::Verify {
            presentation: codec::text_to_wasm_binary(presentation),
            route_id,
            app_addr,
            additional_requirements: None,
        })
        .await
    }

    pub async fn update(
        &mut self,
        app_addr: &str,
        route_id: RouteId,
        route_criteria: Option<RouteVerificationRequirements>,
    ) -> Result<TxResult, Error> {
        self.execute(&ExecuteMsg::Update {
            app_addr: app_addr.to_string(),
            route_id,
            route_criteria,
        })
        .await
    }

    pub async fn deregister(&mut self, app_addr: &str) -> Result<TxResult, Error> {
        self.execute(&ExecuteMsg::Deregister {
            app_addr: app_addr.to_string(),
        })
        .await
    }

    pub async fn update_revocation_list(
        &mut self,
        app_addr: &str,
        request: UpdateRevocationListRequest,
    ) -> Result<TxResult, Error> {
        self.execute(&ExecuteMsg::UpdateRevocationList {
            app_addr: app_addr.to_string(),
            request,
        })
        .await
    }

    pub async fn routes(&mut self, app_addr: &str) -> Result<Vec<RouteId>, Error> {
        query_routes(self.executor.client_mut(), &self.address, app_addr).await
    }

    pub async fn route_requirements(
        &mut self,
        app_addr: &str,
        route_id: RouteId,
    ) -> Result<RouteVerificationRequirements, Error> {
        query_route_requirements(self.executor.client_mut(), &self.address, app_addr, route_id)
            .await
    }

    pub async fn route_verification_key(
        &mut self,
        app_addr: &str,
        route_id: RouteId,
    ) -> Result<Option<String>, Error> {
        query_route_verification_key(
            self.executor.client_mut(),
            &self.address,
            app_addr,
            route_id,
        )
        .await
    }
}

pub async fn query_routes<T>(
    client: &mut T,
    contract: &TMAddress,
    app_addr: &str,
) -> Result<Vec<RouteId>, Error>
where
    T: CosmosClient,
{
    smart_query(
        client,
        contract,
        &QueryMsg::GetRoutes {
            app_addr: app_addr.to_string(),
        },
    )
    .await
}

pub async fn query_route_requirements<T>(
    client: &mut T,
    contract: &TMAddress,
    app_addr: &str,
    route_id: RouteId,
) -> Result<RouteVerificationRequirements, Error>
where
    T: CosmosClient,
{
    smart_query(
        client,
        contract,
        &QueryMsg::GetRouteRequirements {
            app_addr: app_addr.to_string(),
            route_id,
        },
    )
    .await
}

pub async fn query_route_verification_key<T>(
    client: &mut T,
    contract: &TMAddress,
    app_addr: &str,
    route_id: RouteId,
) -> Result<Option<String>, Error>
where
    T: CosmosClient,
{
    smart_query(
        client,
        contract,
        &QueryMsg::GetRouteVerificationKey {
            app_addr: app_addr.to_string(),
            route_id,
        },
    )
    .await
}

async fn smart_query<T, R>(client: &mut T, contract: &TMAddress, msg: &QueryMsg) -> Result<R, Error>
where
    T: CosmosClient,
    R: DeserializeOwned,
{
    let query_data = serde_json::to_vec(msg).change_context(Error::MsgEncoding)?;
    let data = cosmos::smart_contract_state(client, contract, query_data)
        .await
        .change_context(Error::Query)?;

    serde_json::from_slice(&data).change_context(Error::MalformedResponse)
}
