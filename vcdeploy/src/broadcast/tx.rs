use cosmrs::proto::cosmos::tx::v1beta1::TxRaw;
use cosmrs::tendermint::chain::Id;
use cosmrs::tx::{BodyBuilder, Fee, SignDoc, SignerInfo};
use cosmrs::{Any, Coin};
use error_stack::Result;
use prost::Message;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::result_ext::ResultCompatExt;
use crate::types::CosmosPublicKey;

const DUMMY_CHAIN_ID: &str = "dummy_chain_id";
const DUMMY_ACC_NUMBER: u64 = 0;

#[derive(Error, Debug)]
pub enum Error {
    #[error("tx marshaling failed")]
    Marshaling,
}

/// An ordered batch of messages destined for one signed transaction.
/// Built fresh per step and consumed by exactly one fee estimation and
/// one broadcast; a fee derived from it is not valid for any other tx.
#[derive(Clone, Debug, TypedBuilder)]
pub struct UnsignedTx {
    msgs: Vec<Any>,
    #[builder(default)]
    memo: String,
}

impl UnsignedTx {
    pub fn sign_doc(
        &self,
        chain_id: &Id,
        acc_number: u64,
        acc_sequence: u64,
        pub_key: CosmosPublicKey,
        fee: Fee,
    ) -> Result<SignDoc, Error> {
        let body = BodyBuilder::new()
            .msgs(self.msgs.clone())
            .memo(self.memo.clone())
            .finish();
        let auth_info = SignerInfo::single_direct(Some(pub_key), acc_sequence).auth_info(fee);

        SignDoc::new(&body, &auth_info, chain_id, acc_number).change_context(Error::Marshaling)
    }

    /// Raw tx bytes carrying a zeroed signature and fee, for gas simulation.
    pub fn with_dummy_sig(
        &self,
        pub_key: CosmosPublicKey,
        acc_sequence: u64,
    ) -> Result<Vec<u8>, Error> {
        let sign_doc = self.sign_doc(
            &DUMMY_CHAIN_ID
                .parse()
                .expect("the dummy chain id must be valid"),
            DUMMY_ACC_NUMBER,
            acc_sequence,
            pub_key,
            zero_fee(),
        )?;

        Ok(TxRaw {
            body_bytes: sign_doc.body_bytes,
            auth_info_bytes: sign_doc.auth_info_bytes,
            signatures: vec![vec![0; 64]],
        }
        .encode_to_vec())
    }
}

fn zero_fee() -> Fee {
    Fee::from_amount_and_gas(
        Coin {
            denom: cosmrs::Denom::default(),
            amount: 0,
        },
        0u64,
    )
}
