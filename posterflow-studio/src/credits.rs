//! Credit bookkeeping for premium features.
//!
//! AI background generation costs one credit per successful call. Quota
//! failures are a distinct error class from generic failures so the UI can
//! send the user to the right remedy (top up, not "try again"), and they
//! must never be silently retried.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use posterflow_collab::UserId;

/// Quota failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditError {
    Insufficient { have: u32, need: u32 },
}

impl fmt::Display for CreditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insufficient { have, need } => {
                write!(f, "insufficient credits: have {have}, need {need}")
            }
        }
    }
}

impl std::error::Error for CreditError {}

/// Seam over the hosted credit-balance records.
pub trait CreditLedger: Send + Sync {
    /// Current balance; unknown users have zero.
    fn balance(&self, user: &UserId) -> u32;

    /// Consume `units`, returning the remaining balance.
    fn try_consume(&self, user: &UserId, units: u32) -> Result<u32, CreditError>;

    /// Add `units` (top-up), returning the new balance.
    fn deposit(&self, user: &UserId, units: u32) -> u32;
}

/// In-memory ledger for tests and the demo.
pub struct InMemoryLedger {
    balances: Mutex<HashMap<UserId, u32>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, u32>> {
        self.balances.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CreditLedger for InMemoryLedger {
    fn balance(&self, user: &UserId) -> u32 {
        self.lock().get(user).copied().unwrap_or(0)
    }

    fn try_consume(&self, user: &UserId, units: u32) -> Result<u32, CreditError> {
        let mut balances = self.lock();
        let have = balances.get(user).copied().unwrap_or(0);
        if have < units {
            return Err(CreditError::Insufficient { have, need: units });
        }
        let remaining = have - units;
        balances.insert(user.clone(), remaining);
        Ok(remaining)
    }

    fn deposit(&self, user: &UserId, units: u32) -> u32 {
        let mut balances = self.lock();
        let balance = balances.entry(user.clone()).or_insert(0);
        *balance += units;
        *balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user_has_zero() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance(&UserId::new("ama")), 0);
    }

    #[test]
    fn test_deposit_and_consume() {
        let ledger = InMemoryLedger::new();
        let ama = UserId::new("ama");

        assert_eq!(ledger.deposit(&ama, 5), 5);
        assert_eq!(ledger.try_consume(&ama, 2).unwrap(), 3);
        assert_eq!(ledger.balance(&ama), 3);
    }

    #[test]
    fn test_insufficient_reports_have_and_need() {
        let ledger = InMemoryLedger::new();
        let ama = UserId::new("ama");
        ledger.deposit(&ama, 1);

        let err = ledger.try_consume(&ama, 3).unwrap_err();
        assert_eq!(err, CreditError::Insufficient { have: 1, need: 3 });
        // Nothing consumed on failure.
        assert_eq!(ledger.balance(&ama), 1);
    }
}
