//! Counting tools: combinations C(n, m) and permutations P(n, m).
//!
//! Both tools check their own preconditions and report violations as a
//! `{"error": ...}` payload so the model can correct itself.
use num_bigint::{BigInt, BigUint};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::models::tool::{ParameterType, Tool};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid input: n and m must be non-negative integers with m <= n")]
    InvalidInput,
}

/// Arguments shared by both counting tools.
///
/// Any JSON integer is accepted, so out of range values such as negatives reach
/// the domain check instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionArgs {
    /// Total number of items
    #[serde(deserialize_with = "integer")]
    pub n: BigInt,
    /// Number of items to choose or arrange
    #[serde(deserialize_with = "integer")]
    pub m: BigInt,
}

impl SelectionArgs {
    pub fn new(n: impl Into<BigInt>, m: impl Into<BigInt>) -> Self {
        Self {
            n: n.into(),
            m: m.into(),
        }
    }

    /// (n, m) as unsigned, or `InvalidInput` unless 0 <= m <= n
    fn bounds(&self) -> Result<(BigUint, BigUint), SelectionError> {
        match (self.n.to_biguint(), self.m.to_biguint()) {
            (Some(n), Some(m)) if m <= n => Ok((n, m)),
            _ => Err(SelectionError::InvalidInput),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combinations {
    #[serde(serialize_with = "json_integer")]
    pub n: BigInt,
    #[serde(serialize_with = "json_integer")]
    pub m: BigInt,
    #[serde(serialize_with = "json_integer")]
    pub combinations: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permutations {
    #[serde(serialize_with = "json_integer")]
    pub n: BigInt,
    #[serde(serialize_with = "json_integer")]
    pub m: BigInt,
    #[serde(serialize_with = "json_integer")]
    pub permutations: BigUint,
}

fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
    let number = Number::deserialize(deserializer)?;
    BigInt::from_str(&number.to_string())
        .map_err(|_| D::Error::custom(format!("invalid value: {}, expected an integer", number)))
}

/// Write an integer of any size as a plain JSON number
fn json_integer<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    Number::from_str(&value.to_string())
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

pub fn combinations_tool() -> Tool {
    Tool::new(
        "calculate_combinations",
        "Calculate the number of combinations (n choose m). Use this when you need to find how \
         many ways to choose m items from n items where order doesn't matter.",
    )
    .with_required("n", ParameterType::Integer, "Total number of items (n)")
    .with_required("m", ParameterType::Integer, "Number of items to choose (m)")
}

pub fn permutations_tool() -> Tool {
    Tool::new(
        "calculate_permutations",
        "Calculate the number of permutations P(n,m). Use this when you need to find how many \
         ways to arrange m items from n items where order matters.",
    )
    .with_required("n", ParameterType::Integer, "Total number of items (n)")
    .with_required("m", ParameterType::Integer, "Number of items to arrange (m)")
}

/// C(n, m) = n! / (m! * (n-m)!)
pub fn combinations(args: SelectionArgs) -> Result<Combinations, SelectionError> {
    let (n, m) = args.bounds()?;

    // Walk the shorter side. After step i the accumulator is C(n - k + i, i),
    // so every division is exact.
    let k = (&n - &m).min(m);
    let base = &n - &k;
    let one = BigUint::from(1u32);
    let mut acc = one.clone();
    let mut i = one.clone();
    while i <= k {
        acc *= &base + &i;
        acc /= &i;
        i += &one;
    }

    Ok(Combinations {
        n: args.n,
        m: args.m,
        combinations: acc,
    })
}

/// P(n, m) = n! / (n-m)!
pub fn permutations(args: SelectionArgs) -> Result<Permutations, SelectionError> {
    let (n, m) = args.bounds()?;

    let stop = &n - &m;
    let one = BigUint::from(1u32);
    let mut acc = one.clone();
    let mut factor = n;
    while factor > stop {
        acc *= &factor;
        factor -= &one;
    }

    Ok(Permutations {
        n: args.n,
        m: args.m,
        permutations: acc,
    })
}
