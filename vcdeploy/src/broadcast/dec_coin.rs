use std::convert::{TryFrom, TryInto};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::{fmt, ops};

use error_stack::{ensure, Report, Result, ResultExt};
use serde::{Deserialize, Serialize};
use serde_with::SerializeDisplay;
use thiserror::Error;

use crate::broadcast::dec_coin::Error::*;
use crate::result_ext::ResultCompatExt;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parsing failed")]
    ParsingFailed,
    #[error("amount is not a number")]
    AmountIsNaN,
    #[error("denomination is empty")]
    DenomIsEmpty,
}

/// A price per unit of gas, e.g. `0.025untrn`. Chain config files carry it
/// in the cosmos-sdk decimal-coin string form.
#[derive(SerializeDisplay, Deserialize, Clone, Debug, PartialEq, PartialOrd)]
#[serde(try_from = "String")]
pub struct GasPrice {
    pub denom: Denom,
    pub amount: FiniteAmount,
}

impl GasPrice {
    pub fn new(amount: f64, denom: &str) -> Result<Self, Error> {
        Ok(GasPrice {
            amount: amount.try_into()?,
            denom: denom.parse()?,
        })
    }
}

impl TryFrom<String> for GasPrice {
    type Error = Report<Error>;

    fn try_from(s: String) -> core::result::Result<Self, Self::Error> {
        s.as_str().try_into()
    }
}

impl TryFrom<&str> for GasPrice {
    type Error = Report<Error>;

    fn try_from(s: &str) -> core::result::Result<Self, Self::Error> {
        let amount_index = s.find(char::is_numeric);
        let denom_index = s.find(char::is_alphabetic);

        match (amount_index, denom_index) {
            (Some(0), Some(denom_index)) => {
                let (amount, denom) = s.split_at(denom_index);
                Ok(GasPrice {
                    denom: denom.parse()?,
                    amount: amount.parse()?,
                })
            }
            _ => Err(Report::from(ParsingFailed)),
        }
    }
}

impl Display for GasPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
pub struct FiniteAmount(f64);

impl TryFrom<f64> for FiniteAmount {
    type Error = Report<Error>;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        ensure!(!value.is_nan() && !value.is_infinite(), AmountIsNaN);
        Ok(FiniteAmount(value))
    }
}

impl FromStr for FiniteAmount {
    type Err = Report<Error>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let f = s.parse::<f64>().change_context(ParsingFailed)?;
        f.try_into()
    }
}

impl ops::Mul<FiniteAmount> for f64 {
    type Output = f64;

    fn mul(self, rhs: FiniteAmount) -> Self::Output {
        self * rhs.0
    }
}

impl Display for FiniteAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct Denom(cosmrs::Denom);

impl TryFrom<cosmrs::Denom> for Denom {
    type Error = Report<Error>;

    fn try_from(denom: cosmrs::Denom) -> std::result::Result<Self, Self::Error> {
        ensure!(!denom.as_ref().is_empty(), DenomIsEmpty);
        Ok(Denom(denom))
    }
}

impl FromStr for Denom {
    type Err = Report<Error>;

    fn from_str(denom: &str) -> std::result::Result<Self, Self::Err> {
        let denom: cosmrs::Denom = ResultCompatExt::change_context(denom.parse(), ParsingFailed)?;
        denom.try_into()
    }
}

impl From<Denom> for cosmrs::Denom {
    fn from(denom: Denom) -> Self {
        denom.0
    }
}

impl AsRef<str> for Denom {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl Display for Denom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
