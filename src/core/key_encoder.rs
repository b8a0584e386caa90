use crate::core::{EncodedKey, Selection};
use crate::utils::error::{BetError, Result};
use std::num::NonZeroU32;

/// EuroMilRegister 目前只接受 1..=3 的識別碼
pub const DEFAULT_KEY_DOMAIN_SIZE: u32 = 3;

/// Maps a selection onto the registration service's identifier range.
///
/// The mapping is many-to-one: only the smallest number is used, folded into
/// `1..=domain_size`. Distinct selections can share an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEncoder {
    domain_size: NonZeroU32,
}

impl KeyEncoder {
    pub fn new(domain_size: u32) -> Result<Self> {
        let domain_size = NonZeroU32::new(domain_size).ok_or_else(|| {
            BetError::InvalidConfigValueError {
                field: "key_domain_size".to_string(),
                value: domain_size.to_string(),
                reason: "Value must be at least 1".to_string(),
            }
        })?;
        Ok(Self { domain_size })
    }

    pub fn domain_size(&self) -> u32 {
        self.domain_size.get()
    }

    pub fn encode(&self, selection: &Selection) -> EncodedKey {
        let first = u32::from(selection.first_number());
        EncodedKey::new(((first - 1) % self.domain_size.get()) + 1)
    }
}

impl Default for KeyEncoder {
    fn default() -> Self {
        Self {
            domain_size: NonZeroU32::MIN.saturating_add(DEFAULT_KEY_DOMAIN_SIZE - 1),
        }
    }
}
