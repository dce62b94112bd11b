use std::ops::Mul;
use std::time::Duration;

use cosmrs::tx::Fee;
use cosmrs::Coin;
use error_stack::{report, Result, ResultExt};
use num_traits::cast;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time;
use tracing::info;

use crate::cosmos;
use crate::events::TxResult;
use crate::result_ext::ResultCompatExt;
use crate::wallet::Wallet;

pub mod dec_coin;
pub mod tx;

pub use dec_coin::GasPrice;
pub use tx::UnsignedTx;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to estimate the tx fee")]
    EstimateFee,
    #[error("failed to broadcast the tx")]
    Broadcast,
    #[error("failed to confirm the tx on chain: {tx_hash}")]
    PollTx { tx_hash: String },
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub gas_adjustment: f64,
    #[serde(with = "humantime_serde")]
    pub tx_fetch_interval: Duration,
    pub tx_fetch_max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gas_adjustment: 1.5,
            tx_fetch_interval: Duration::from_millis(500),
            tx_fetch_max_retries: 10,
        }
    }
}

/// Runs one unsigned tx through the full estimate fee → broadcast → poll
/// cycle. The three sub-steps fail with distinct tags so callers can tell
/// "never sent" from "rejected at submission" from "sent but unconfirmed or
/// rejected on chain". There are no automatic retries; resubmitting means
/// estimating a fresh fee.
pub struct TxExecutor<T>
where
    T: cosmos::CosmosClient,
{
    client: T,
    wallet: Wallet,
    config: Config,
}

impl<T> TxExecutor<T>
where
    T: cosmos::CosmosClient + Send,
{
    pub fn new(client: T, wallet: Wallet, config: Config) -> Self {
        Self {
            client,
            wallet,
            config,
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn client_mut(&mut self) -> &mut T {
        &mut self.client
    }

    pub async fn execute(&mut self, tx: UnsignedTx) -> Result<TxResult, Error> {
        let account = cosmos::account(&mut self.client, self.wallet.address())
            .await
            .change_context(Error::EstimateFee)?;

        let fee = self.estimate_fee(&tx, account.sequence).await?;
        let tx_hash = self
            .broadcast(tx, fee, account.account_number, account.sequence)
            .await?;

        self.wait_for_tx(tx_hash).await
    }

    async fn estimate_fee(&mut self, tx: &UnsignedTx, acc_sequence: u64) -> Result<Fee, Error> {
        let gas_used = cosmos::estimate_gas(
            &mut self.client,
            tx,
            self.wallet.public_key(),
            acc_sequence,
        )
        .await
        .change_context(Error::EstimateFee)?;

        let gas_price = self.wallet.gas_price();
        let gas_adjusted = gas_used as f64 * self.config.gas_adjustment;

        Ok(Fee::from_amount_and_gas(
            Coin {
                amount: cast(gas_adjusted.mul(gas_price.amount).ceil())
                    .ok_or(report!(Error::EstimateFee))?,
                denom: gas_price.denom.clone().into(),
            },
            cast::<f64, u64>(gas_adjusted).ok_or(report!(Error::EstimateFee))?,
        ))
    }

    async fn broadcast(
        &mut self,
        tx: UnsignedTx,
        fee: Fee,
        acc_number: u64,
        acc_sequence: u64,
    ) -> Result<String, Error> {
        let sign_doc = tx
            .sign_doc(
                self.wallet.chain_id(),
                acc_number,
                acc_sequence,
                self.wallet.public_key(),
                fee,
            )
            .change_context(Error::Broadcast)?;
        let signed = self
            .wallet
            .sign(sign_doc)
            .change_context(Error::Broadcast)?;
        let tx_bytes =
            ResultCompatExt::change_context(signed.to_bytes(), Error::Broadcast)?;

        let response = cosmos::broadcast(&mut self.client, tx_bytes)
            .await
            .change_context(Error::Broadcast)?;

        info!(
            tx_hash = response.txhash,
            acc_number, acc_sequence, "transaction was broadcast"
        );

        if response.code != 0 {
            return Err(report!(Error::Broadcast).attach_printable(format!(
                "{{ code = {}, raw_log = {} }}",
                response.code, response.raw_log
            )));
        }

        Ok(response.txhash)
    }

    /// Polls until the chain knows the tx, for at most
    /// `tx_fetch_max_retries` attempts spaced `tx_fetch_interval` apart.
    async fn wait_for_tx(&mut self, tx_hash: String) -> Result<TxResult, Error> {
        let attempts = self.config.tx_fetch_max_retries;

        for attempt in 0..attempts {
            let last_attempt = attempt == attempts.saturating_sub(1);

            match cosmos::tx(&mut self.client, &tx_hash).await {
                Ok(Some(response)) if response.code == 0 => {
                    info!(tx_hash = response.txhash, height = response.height, "transaction confirmed");
                    return Ok(TxResult::from(&response));
                }
                Ok(Some(response)) => {
                    return Err(report!(Error::PollTx { tx_hash }).attach_printable(format!(
                        "{{ code = {}, raw_log = {} }}",
                        response.code, response.raw_log
                    )));
                }
                Ok(None) if last_attempt => break,
                Err(err) if last_attempt => {
                    return Err(err.change_context(Error::PollTx { tx_hash }))
                }
                _ => time::sleep(self.config.tx_fetch_interval).await,
            }
        }

        Err(report!(Error::PollTx { tx_hash }))
    }
}

impl<T> std::fmt::Debug for TxExecutor<T>
where
    T: cosmos::CosmosClient,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxExecutor")
            .field("wallet", &self.wallet)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
