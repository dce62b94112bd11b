use std::num::NonZeroU64;

use cosmrs::proto::cosmos::base::abci::v1beta1::TxResponse;
use cosmrs::proto::tendermint::abci::Event;

const STORE_CODE_EVENT: &str = "store_code";
const CODE_ID_ATTRIBUTE: &str = "code_id";
const INSTANTIATE_EVENT: &str = "instantiate";
const CONTRACT_ADDRESS_ATTRIBUTE: &str = "_contract_address";

/// The finalized outcome of one transaction. Chain-assigned identifiers are
/// only ever learned by scanning `events`.
#[derive(Clone, Debug, PartialEq)]
pub struct TxResult {
    pub tx_hash: String,
    pub height: u64,
    pub events: Vec<Event>,
}

impl From<&TxResponse> for TxResult {
    fn from(response: &TxResponse) -> Self {
        Self {
            tx_hash: response.txhash.clone(),
            height: u64::try_from(response.height).unwrap_or_default(),
            events: response.events.clone(),
        }
    }
}

impl TxResult {
    /// First attribute value for the given event type and key. An absent
    /// event and an absent attribute both mean "not found".
    pub fn event_attribute(&self, event_type: &str, key: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|event| event.r#type == event_type)?
            .attributes
            .iter()
            .find(|attribute| attribute.key == key)
            .map(|attribute| attribute.value.as_str())
    }

    /// The code id assigned by a store-code tx. A value of zero or one that
    /// does not parse is treated the same as an absent attribute.
    pub fn code_id(&self) -> Option<NonZeroU64> {
        self.event_attribute(STORE_CODE_EVENT, CODE_ID_ATTRIBUTE)?
            .parse()
            .ok()
    }

    /// The contract address assigned by an instantiate tx.
    pub fn contract_address(&self) -> Option<&str> {
        self.event_attribute(INSTANTIATE_EVENT, CONTRACT_ADDRESS_ATTRIBUTE)
    }
}

#[cfg(test)]
pub mod test_utils {
    use cosmrs::proto::tendermint::abci::{Event, EventAttribute};

    pub fn event(event_type: &str, attributes: &[(&str, &str)]) -> Event {
        Event {
            r#type: event_type.to_string(),
            attributes: attributes
                .iter()
                .map(|(key, value)| EventAttribute {
                    key: (*key).to_string(),
                    value: (*value).to_string(),
                    index: true,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::event;
    use super::*;

    fn tx_result(events: Vec<Event>) -> TxResult {
        TxResult {
            tx_hash: "A1B2".to_string(),
            height: 100,
            events,
        }
    }

    #[test]
    fn extracts_the_code_id() {
        let result = tx_result(vec![
            event("message", &[("action", "/cosmwasm.wasm.v1.MsgStoreCode")]),
            event("store_code", &[("code_checksum", "8d4f"), ("code_id", "22")]),
        ]);

        assert_eq!(result.code_id().unwrap().get(), 22);
    }

    #[test]
    fn code_id_zero_is_not_found() {
        let result = tx_result(vec![event("store_code", &[("code_id", "0")])]);

        assert_eq!(result.code_id(), None);
    }

    #[test]
    fn code_id_absent_event_is_not_found() {
        let result = tx_result(vec![event("message", &[("code_id", "22")])]);

        assert_eq!(result.code_id(), None);
    }

    #[test]
    fn code_id_unparsable_value_is_not_found() {
        let result = tx_result(vec![event("store_code", &[("code_id", "twenty-two")])]);

        assert_eq!(result.code_id(), None);
    }

    #[test]
    fn extracts_the_contract_address() {
        let result = tx_result(vec![event(
            "instantiate",
            &[("_contract_address", "wasm1contract"), ("code_id", "22")],
        )]);

        assert_eq!(result.contract_address(), Some("wasm1contract"));
    }

    #[test]
    fn contract_address_absent_attribute_is_not_found() {
        let result = tx_result(vec![event("instantiate", &[("code_id", "22")])]);

        assert_eq!(result.contract_address(), None);
    }

    #[test]
    fn first_matching_event_wins() {
        let result = tx_result(vec![
            event("store_code", &[("code_id", "22")]),
            event("store_code", &[("code_id", "23")]),
        ]);

        assert_eq!(result.code_id().unwrap().get(), 22);
    }

    #[test]
    fn builds_from_a_tx_response() {
        let response = cosmrs::proto::cosmos::base::abci::v1beta1::TxResponse {
            txhash: "A1B2".to_string(),
            height: 100,
            events: vec![event("store_code", &[("code_id", "22")])],
            ..Default::default()
        };

        let result = TxResult::from(&response);

        assert_eq!(result.tx_hash, "A1B2");
        assert_eq!(result.height, 100);
        assert_eq!(result.code_id().unwrap().get(), 22);
    }
}
