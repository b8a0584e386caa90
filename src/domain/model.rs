use crate::utils::error::{BetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const NUMBER_COUNT: usize = 5;
pub const STAR_COUNT: usize = 2;
pub const NUMBER_RANGE: (i64, i64) = (1, 50);
pub const STAR_RANGE: (i64, i64) = (1, 12);

/// 每張數位支票的面額 (credits)
pub const CHEQUE_VALUE_CREDITS: u32 = 10;

/// A validated EuroMillions key: 5 numbers and 2 stars, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    numbers: [u8; NUMBER_COUNT],
    stars: [u8; STAR_COUNT],
}

impl Selection {
    /// 驗證並建立選號 (數量 -> 範圍 -> 重複)
    pub fn new(numbers: &[i64], stars: &[i64]) -> Result<Self> {
        if numbers.len() != NUMBER_COUNT || stars.len() != STAR_COUNT {
            return Err(BetError::validation(
                "Invalid key. It must have 5 numbers and 2 stars.",
            ));
        }

        if numbers
            .iter()
            .any(|n| *n < NUMBER_RANGE.0 || *n > NUMBER_RANGE.1)
        {
            return Err(BetError::validation("Numbers must be between 1 and 50."));
        }

        if stars.iter().any(|s| *s < STAR_RANGE.0 || *s > STAR_RANGE.1) {
            return Err(BetError::validation("Stars must be between 1 and 12."));
        }

        if has_duplicates(numbers) {
            return Err(BetError::validation("Numbers must not repeat."));
        }

        if has_duplicates(stars) {
            return Err(BetError::validation("Stars must not repeat."));
        }

        let mut sorted_numbers = [0u8; NUMBER_COUNT];
        for (slot, n) in sorted_numbers.iter_mut().zip(numbers) {
            *slot = *n as u8;
        }
        sorted_numbers.sort_unstable();

        let mut sorted_stars = [0u8; STAR_COUNT];
        for (slot, s) in sorted_stars.iter_mut().zip(stars) {
            *slot = *s as u8;
        }
        sorted_stars.sort_unstable();

        Ok(Self {
            numbers: sorted_numbers,
            stars: sorted_stars,
        })
    }

    pub fn numbers(&self) -> &[u8; NUMBER_COUNT] {
        &self.numbers
    }

    pub fn stars(&self) -> &[u8; STAR_COUNT] {
        &self.stars
    }

    /// Smallest chosen number.
    pub fn first_number(&self) -> u8 {
        self.numbers[0]
    }

    /// `n1,n2,n3,n4,n5+s1,s2`
    pub fn canonical_key(&self) -> String {
        self.to_string()
    }
}

fn has_duplicates(values: &[i64]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    !values.iter().all(|v| seen.insert(*v))
}

fn join(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", join(&self.numbers), join(&self.stars))
    }
}

impl FromStr for Selection {
    type Err = BetError;

    fn from_str(key: &str) -> Result<Self> {
        let malformed = || {
            BetError::validation(format!(
                "Malformed key '{}': expected n1,n2,n3,n4,n5+s1,s2",
                key
            ))
        };

        let (numbers_part, stars_part) = key.split_once('+').ok_or_else(malformed)?;

        let parse_list = |part: &str| -> Result<Vec<i64>> {
            part.split(',')
                .map(|v| v.trim().parse::<i64>().map_err(|_| malformed()))
                .collect()
        };

        let numbers = parse_list(numbers_part)?;
        let stars = parse_list(stars_part)?;
        Selection::new(&numbers, &stars)
    }
}

/// Spend-once token issued by CrediBank.
///
/// Not `Clone`: a credential moves from the issuer into exactly one registration
/// attempt and then into the outcome.
#[derive(Debug, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Identifier the registration service accepts for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedKey(u32);

impl EncodedKey {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EncodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw bet input, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetRequest {
    pub account_id: String,
    pub numbers: Vec<i64>,
    pub stars: Vec<i64>,
}

impl BetRequest {
    pub fn new(account_id: impl Into<String>, numbers: Vec<i64>, stars: Vec<i64>) -> Self {
        Self {
            account_id: account_id.into(),
            numbers,
            stars,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureStage {
    Validation,
    CredentialIssuance,
    Registration,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::CredentialIssuance => "credential-issuance",
            Self::Registration => "registration",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum IssuanceResult {
    Issued { credential: Credential },
    Denied { reason: String },
    Unreachable { cause: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationResult {
    Registered { detail: String },
    Rejected { reason: String },
    Unreachable { cause: String },
}

/// Opaque record returned by the results query.
pub type ResultRecord = serde_json::Value;

/// 一次下注流程的結果
#[derive(Debug)]
pub enum BetOutcome {
    Success {
        selection: Selection,
        credential: Credential,
        detail: String,
    },
    Failure {
        stage: FailureStage,
        error: BetError,
        /// Set once a credential was issued; on a registration failure it is already spent.
        credential: Option<Credential>,
    },
}

impl BetOutcome {
    pub(crate) fn failed(
        stage: FailureStage,
        error: BetError,
        credential: Option<Credential>,
    ) -> Self {
        Self::Failure {
            stage,
            error,
            credential,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn stage(&self) -> Option<FailureStage> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { stage, .. } => Some(*stage),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Success { detail, .. } => detail.clone(),
            Self::Failure { error, .. } => error.user_friendly_message(),
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Success { credential, .. } => Some(credential),
            Self::Failure { credential, .. } => credential.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_sorts_into_canonical_form() {
        let selection = Selection::new(&[5, 3, 1, 4, 2], &[7, 6]).unwrap();
        assert_eq!(selection.numbers(), &[1, 2, 3, 4, 5]);
        assert_eq!(selection.stars(), &[6, 7]);
        assert_eq!(selection.canonical_key(), "1,2,3,4,5+6,7");
        assert_eq!(selection.first_number(), 1);
    }

    #[test]
    fn test_selection_rejects_wrong_cardinality() {
        let err = Selection::new(&[1, 2, 3, 4], &[6, 7]).unwrap_err();
        assert!(matches!(err, BetError::ValidationError { .. }));
        assert!(Selection::new(&[1, 2, 3, 4, 5], &[6]).is_err());
        assert!(Selection::new(&[1, 2, 3, 4, 5, 6], &[6, 7]).is_err());
    }

    #[test]
    fn test_selection_rejects_out_of_range_values() {
        assert!(Selection::new(&[0, 2, 3, 4, 5], &[6, 7]).is_err());
        assert!(Selection::new(&[1, 2, 3, 4, 51], &[6, 7]).is_err());
        assert!(Selection::new(&[1, 2, 3, 4, 5], &[0, 7]).is_err());
        assert!(Selection::new(&[1, 2, 3, 4, 5], &[6, 13]).is_err());
        assert!(Selection::new(&[1, 2, 3, 4, 50], &[1, 12]).is_ok());
    }

    #[test]
    fn test_selection_rejects_duplicates() {
        let err = Selection::new(&[1, 1, 3, 4, 5], &[6, 7]).unwrap_err();
        assert!(err.to_string().contains("Numbers must not repeat"));
        let err = Selection::new(&[1, 2, 3, 4, 5], &[7, 7]).unwrap_err();
        assert!(err.to_string().contains("Stars must not repeat"));
    }

    #[test]
    fn test_selection_parses_canonical_key() {
        let selection: Selection = "10, 3,22,41,5+12,2".parse().unwrap();
        assert_eq!(selection.to_string(), "3,5,10,22,41+2,12");

        assert!("1,2,3,4,5".parse::<Selection>().is_err());
        assert!("1,2,x,4,5+6,7".parse::<Selection>().is_err());
        assert!("1,2,3,4+6,7".parse::<Selection>().is_err());
    }

    #[test]
    fn test_failure_outcome_keeps_spent_credential() {
        let outcome = BetOutcome::failed(
            FailureStage::Registration,
            BetError::RegistrationRejected {
                reason: "Credencial invalida".into(),
            },
            Some(Credential::new("CRED-1")),
        );
        assert!(!outcome.is_success());
        assert_eq!(outcome.stage(), Some(FailureStage::Registration));
        assert_eq!(outcome.credential().map(Credential::as_str), Some("CRED-1"));
        assert_eq!(outcome.message(), "Credencial invalida");
    }
}
