use async_trait::async_trait;
use cosmrs::proto::cosmos::auth::v1beta1::query_client::QueryClient as AuthQueryClient;
use cosmrs::proto::cosmos::auth::v1beta1::{
    BaseAccount, QueryAccountRequest, QueryAccountResponse,
};
use cosmrs::proto::cosmos::base::abci::v1beta1::TxResponse;
use cosmrs::proto::cosmos::tx::v1beta1::service_client::ServiceClient;
use cosmrs::proto::cosmos::tx::v1beta1::{
    BroadcastMode, BroadcastTxRequest, BroadcastTxResponse, GetTxRequest, GetTxResponse,
    SimulateRequest, SimulateResponse,
};
use cosmrs::proto::cosmwasm::wasm::v1::query_client::QueryClient as WasmQueryClient;
use cosmrs::proto::cosmwasm::wasm::v1::{
    QuerySmartContractStateRequest, QuerySmartContractStateResponse,
};
use error_stack::{report, ResultExt};
use mockall::mock;
use prost::Message;
use thiserror::Error;
use tonic::transport::Channel;
use tonic::Response;

use crate::broadcast::UnsignedTx;
use crate::result_ext::ErrorExt;
use crate::types::{CosmosPublicKey, TMAddress};

type Result<T> = error_stack::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to connect to the grpc endpoint")]
    GrpcConnection(#[from] tonic::transport::Error),
    #[error("failed to make the grpc request")]
    GrpcRequest(#[from] tonic::Status),
    #[error("failed building tx")]
    TxBuilding,
    #[error("gas info is missing in the query response")]
    GasInfoMissing,
    #[error("account is missing in the query response")]
    AccountMissing,
    #[error("tx response is missing in the broadcast response")]
    TxResponseMissing,
    #[error("failed to decode the query response")]
    MalformedResponse,
}

mock! {
    #[derive(Debug)]
    pub CosmosClient{}

    impl Clone for CosmosClient {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl CosmosClient for CosmosClient {
        async fn broadcast_tx(&mut self, req: BroadcastTxRequest) -> Result<BroadcastTxResponse>;
        async fn simulate(&mut self, req: SimulateRequest) -> Result<SimulateResponse>;
        async fn tx(&mut self, req: GetTxRequest) -> Result<GetTxResponse>;

        async fn account(&mut self, req: QueryAccountRequest) -> Result<QueryAccountResponse>;

        async fn smart_contract_state(
            &mut self,
            req: QuerySmartContractStateRequest,
        ) -> Result<QuerySmartContractStateResponse>;
    }
}

#[async_trait]
pub trait CosmosClient {
    async fn broadcast_tx(&mut self, req: BroadcastTxRequest) -> Result<BroadcastTxResponse>;
    async fn simulate(&mut self, req: SimulateRequest) -> Result<SimulateResponse>;
    async fn tx(&mut self, req: GetTxRequest) -> Result<GetTxResponse>;

    async fn account(&mut self, req: QueryAccountRequest) -> Result<QueryAccountResponse>;

    async fn smart_contract_state(
        &mut self,
        req: QuerySmartContractStateRequest,
    ) -> Result<QuerySmartContractStateResponse>;
}

/// Cosmos node access over gRPC. Clones share the underlying channel, so
/// cloning does not open a new connection.
#[derive(Clone)]
pub struct CosmosGrpcClient {
    auth: AuthQueryClient<Channel>,
    wasm: WasmQueryClient<Channel>,
    service: ServiceClient<Channel>,
}

impl CosmosGrpcClient {
    pub async fn new(url: &str) -> Result<Self> {
        let endpoint: tonic::transport::Endpoint = url.parse().map_err(ErrorExt::into_report)?;
        let conn = endpoint.connect().await.map_err(ErrorExt::into_report)?;

        Ok(Self {
            auth: AuthQueryClient::new(conn.clone()),
            wasm: WasmQueryClient::new(conn.clone()),
            service: ServiceClient::new(conn),
        })
    }
}

#[async_trait]
impl CosmosClient for CosmosGrpcClient {
    async fn broadcast_tx(&mut self, req: BroadcastTxRequest) -> Result<BroadcastTxResponse> {
        self.service
            .broadcast_tx(req)
            .await
            .map(Response::into_inner)
            .map_err(ErrorExt::into_report)
    }

    async fn simulate(&mut self, req: SimulateRequest) -> Result<SimulateResponse> {
        self.service
            .simulate(req)
            .await
            .map(Response::into_inner)
            .map_err(ErrorExt::into_report)
    }

    async fn tx(&mut self, req: GetTxRequest) -> Result<GetTxResponse> {
        self.service
            .get_tx(req)
            .await
            .map(Response::into_inner)
            .map_err(ErrorExt::into_report)
    }

    async fn account(&mut self, req: QueryAccountRequest) -> Result<QueryAccountResponse> {
        self.auth
            .account(req)
            .await
            .map(Response::into_inner)
            .map_err(ErrorExt::into_report)
    }

    async fn smart_contract_state(
        &mut self,
        req: QuerySmartContractStateRequest,
    ) -> Result<QuerySmartContractStateResponse> {
        self.wasm
            .smart_contract_state(req)
            .await
            .map(Response::into_inner)
            .map_err(ErrorExt::into_report)
    }
}

pub async fn estimate_gas<T>(
    client: &mut T,
    tx: &UnsignedTx,
    pub_key: CosmosPublicKey,
    acc_sequence: u64,
) -> Result<u64>
where
    T: CosmosClient,
{
    let tx_bytes = tx
        .with_dummy_sig(pub_key, acc_sequence)
        .change_context(Error::TxBuilding)?;

    #[allow(deprecated)]
    client
        .simulate(SimulateRequest { tx: None, tx_bytes })
        .await
        .and_then(|res| {
            res.gas_info
                .map(|info| info.gas_used)
                .ok_or(report!(Error::GasInfoMissing))
        })
}

pub async fn account<T>(client: &mut T, address: &TMAddress) -> Result<BaseAccount>
where
    T: CosmosClient,
{
    client
        .account(QueryAccountRequest {
            address: address.to_string(),
        })
        .await
        .and_then(|res| res.account.ok_or(report!(Error::AccountMissing)))
        .and_then(|account| {
            BaseAccount::decode(&account.value[..]).change_context(Error::MalformedResponse)
        })
}

pub async fn broadcast<T>(client: &mut T, tx_bytes: Vec<u8>) -> Result<TxResponse>
where
    T: CosmosClient,
{
    client
        .broadcast_tx(BroadcastTxRequest {
            tx_bytes,
            mode: BroadcastMode::Sync as i32,
        })
        .await
        .and_then(|res| res.tx_response.ok_or(report!(Error::TxResponseMissing)))
}

/// Fetches a tx by hash. A tx the node does not know yet maps to `Ok(None)`,
/// both for a grpc not-found status and for an empty response, so pollers
/// can tell "not yet" apart from actual failures.
pub async fn tx<T>(client: &mut T, tx_hash: &str) -> Result<Option<TxResponse>>
where
    T: CosmosClient,
{
    match client
        .tx(GetTxRequest {
            hash: tx_hash.to_string(),
        })
        .await
    {
        Ok(res) => Ok(res.tx_response),
        Err(report) => match report.current_context() {
            Error::GrpcRequest(status) if status.code() == tonic::Code::NotFound => Ok(None),
            _ => Err(report),
        },
    }
}

pub async fn smart_contract_state<T>(
    client: &mut T,
    address: &TMAddress,
    query_data: Vec<u8>,
) -> Result<Vec<u8>>
where
    T: CosmosClient,
{
    client
        .smart_contract_state(QuerySmartContractStateRequest {
            address: address.to_string(),
            query_data,
        })
        .await
        .map(|res| res.data)
}

#[cfg(test)]
mod tests {
    use cosmrs::proto::cosmos::base::abci::v1beta1::GasInfo;
    use cosmrs::Any;
    use mockall::predicate;

    use super::*;
    use crate::broadcast::UnsignedTx;
    use crate::types::test_utils::random_cosmos_public_key;

    fn dummy_unsigned_tx() -> UnsignedTx {
        UnsignedTx::builder()
            .msgs(vec![Any {
                type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
                value: vec![1, 2, 3],
            }])
            .build()
    }

    #[tokio::test]
    async fn estimate_gas_success() {
        let pub_key = random_cosmos_public_key();
        let gas_used = 150000u64;

        let mut mock_client = MockCosmosClient::new();
        mock_client.expect_simulate().return_once(move |_| {
            Ok(SimulateResponse {
                gas_info: Some(GasInfo {
                    gas_wanted: 200000,
                    gas_used,
                }),
                result: None,
            })
        });

        let actual = estimate_gas(&mut mock_client, &dummy_unsigned_tx(), pub_key, 5).await;

        assert_eq!(actual.unwrap(), gas_used);
    }

    #[tokio::test]
    async fn estimate_gas_missing_gas_info() {
        let pub_key = random_cosmos_public_key();

        let mut mock_client = MockCosmosClient::new();
        mock_client.expect_simulate().return_once(|_| {
            Ok(SimulateResponse {
                gas_info: None,
                result: None,
            })
        });

        let actual = estimate_gas(&mut mock_client, &dummy_unsigned_tx(), pub_key, 5).await;

        assert!(matches!(
            actual.unwrap_err().current_context(),
            Error::GasInfoMissing
        ));
    }

    #[tokio::test]
    async fn account_success() {
        let address = TMAddress::random("wasm");
        let base_account = BaseAccount {
            address: address.to_string(),
            pub_key: None,
            account_number: 42,
            sequence: 10,
        };
        let base_account_any = Any::from_msg(&base_account).unwrap();

        let mut mock_client = MockCosmosClient::new();
        mock_client
            .expect_account()
            .with(predicate::eq(QueryAccountRequest {
                address: address.to_string(),
            }))
            .return_once(move |_| {
                Ok(QueryAccountResponse {
                    account: Some(base_account_any),
                })
            });

        let actual = account(&mut mock_client, &address).await;

        assert_eq!(actual.unwrap(), base_account);
    }

    #[tokio::test]
    async fn account_missing() {
        let address = TMAddress::random("wasm");

        let mut mock_client = MockCosmosClient::new();
        mock_client
            .expect_account()
            .return_once(move |_| Ok(QueryAccountResponse { account: None }));

        let actual = account(&mut mock_client, &address).await;

        assert!(matches!(
            actual.unwrap_err().current_context(),
            Error::AccountMissing
        ));
    }

    #[tokio::test]
    async fn account_malformed_response() {
        let address = TMAddress::random("wasm");

        let mut mock_client = MockCosmosClient::new();
        mock_client.expect_account().return_once(move |_| {
            Ok(QueryAccountResponse {
                account: Some(Any {
                    type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
                    value: vec![1, 2, 3],
                }),
            })
        });

        let actual = account(&mut mock_client, &address).await;

        assert!(matches!(
            actual.unwrap_err().current_context(),
            Error::MalformedResponse
        ));
    }

    #[tokio::test]
    async fn broadcast_missing_tx_response() {
        let mut mock_client = MockCosmosClient::new();
        mock_client
            .expect_broadcast_tx()
            .return_once(|_| Ok(BroadcastTxResponse { tx_response: None }));

        let actual = broadcast(&mut mock_client, vec![1, 2, 3]).await;

        assert!(matches!(
            actual.unwrap_err().current_context(),
            Error::TxResponseMissing
        ));
    }

    #[tokio::test]
    async fn tx_not_found_status_maps_to_none() {
        let mut mock_client = MockCosmosClient::new();
        mock_client
            .expect_tx()
            .return_once(|_| Err(tonic::Status::not_found("tx not found").into_report()));

        let actual = tx(&mut mock_client, "deadbeef").await;

        assert_eq!(actual.unwrap(), None);
    }

    #[tokio::test]
    async fn tx_empty_response_maps_to_none() {
        let mut mock_client = MockCosmosClient::new();
        mock_client
            .expect_tx()
            .return_once(|_| Ok(GetTxResponse::default()));

        let actual = tx(&mut mock_client, "deadbeef").await;

        assert_eq!(actual.unwrap(), None);
    }

    #[tokio::test]
    async fn tx_other_grpc_errors_propagate() {
        let mut mock_client = MockCosmosClient::new();
        mock_client
            .expect_tx()
            .return_once(|_| Err(tonic::Status::unavailable("node down").into_report()));

        let actual = tx(&mut mock_client, "deadbeef").await;

        assert!(matches!(
            actual.unwrap_err().current_context(),
            Error::GrpcRequest(_)
        ));
    }

    #[tokio::test]
    async fn smart_contract_state_returns_the_raw_data() {
        let contract = TMAddress::random("wasm");

        let mut mock_client = MockCosmosClient::new();
        mock_client.expect_smart_contract_state().return_once(|_| {
            Ok(QuerySmartContractStateResponse {
                data: b"[1,2]".to_vec(),
            })
        });

        let actual = smart_contract_state(&mut mock_client, &contract, b"{}".to_vec()).await;

        assert_eq!(actual.unwrap(), b"[1,2]".to_vec());
    }
}
