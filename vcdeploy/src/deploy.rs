use std::fs;
use std::num::NonZeroU64;
use std::path::Path;

use cosmrs::cosmwasm::{MsgInstantiateContract, MsgStoreCode};
use cosmrs::tx::Msg;
use cosmrs::Coin;
use error_stack::{report, Result, ResultExt};
use sdjwt_verifier_api::msg::InstantiateMsg;
use thiserror::Error;
use tracing::info;

use crate::broadcast::{TxExecutor, UnsignedTx};
use crate::cosmos::CosmosClient;
use crate::result_ext::ResultCompatExt;
use crate::types::TMAddress;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to store the contract code")]
    StoreCode,
    #[error("failed to instantiate the contract")]
    Instantiate,
}

/// The chain-assigned outcome of a successful deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    pub code_id: NonZeroU64,
    pub address: TMAddress,
    pub store_tx: String,
    pub instantiate_tx: String,
}

/// Stores the wasm artifact and instantiates it, each as one tx unit, with
/// the instantiate step gated on the code id the store step emitted.
///
/// There is no rollback: when instantiation fails, the stored code stays on
/// chain and the operator has to re-run or clean up the orphaned code id.
pub async fn deploy<T>(
    executor: &mut TxExecutor<T>,
    wasm_path: &Path,
    init_msg: &InstantiateMsg,
    funds: Vec<Coin>,
    label: &str,
) -> Result<Deployment, Error>
where
    T: CosmosClient + Send,
{
    let sender = executor.wallet().address().as_ref().clone();

    let wasm_byte_code = fs::read(wasm_path)
        .change_context(Error::StoreCode)
        .attach_printable_lazy(|| format!("{{ path = {} }}", wasm_path.display()))?;
    info!(
        path = %wasm_path.display(),
        size = wasm_byte_code.len(),
        "storing contract code"
    );

    let store_msg = ResultCompatExt::change_context(
        MsgStoreCode {
            sender: sender.clone(),
            wasm_byte_code,
            instantiate_permission: None,
        }
        .to_any(),
        Error::StoreCode,
    )?;

    let store_result = executor
        .execute(UnsignedTx::builder().msgs(vec![store_msg]).build())
        .await
        .change_context(Error::StoreCode)?;
    let code_id = store_result.code_id().ok_or(
        report!(Error::StoreCode)
            .attach_printable("store_code event carries no usable code_id attribute"),
    )?;
    info!(
        code_id = code_id.get(),
        tx_hash = store_result.tx_hash,
        "contract code stored"
    );

    let init_msg = serde_json::to_vec(init_msg).change_context(Error::Instantiate)?;
    let instantiate_msg = ResultCompatExt::change_context(
        MsgInstantiateContract {
            sender: sender.clone(),
            admin: Some(sender),
            code_id: code_id.get(),
            label: Some(label.to_string()),
            msg: init_msg,
            funds,
        }
        .to_any(),
        Error::Instantiate,
    )?;

    let instantiate_result = executor
        .execute(UnsignedTx::builder().msgs(vec![instantiate_msg]).build())
        .await
        .change_context(Error::Instantiate)?;
    let address = instantiate_result.contract_address().ok_or(
        report!(Error::Instantiate)
            .attach_printable("instantiate event carries no _contract_address attribute"),
    )?;
    let address = ResultCompatExt::change_context(address.parse(), Error::Instantiate)?;
    info!(
        address = %address,
        tx_hash = instantiate_result.tx_hash,
        "contract instantiated"
    );

    Ok(Deployment {
        code_id,
        address,
        store_tx: store_result.tx_hash,
        instantiate_tx: instantiate_result.tx_hash,
    })
}
