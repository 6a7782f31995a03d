use std::sync::Arc;

use crate::errors::OracleError;
use crate::traits::CancellationToken;
use crate::types::SlotStatus;

/// Live slot occupancy.
pub trait AvailabilityOracle: Send + Sync {
    /// Point lookup. `Unknown` means the slot is not registered, which is
    /// distinct from `Occupied`.
    fn check(&self, slot_code: &str) -> Result<SlotStatus, OracleError>;

    /// Lookup that may stop early once `token` is cancelled. Implementations
    /// that wait between attempts override this; the default is a plain
    /// `check`.
    fn check_with_cancellation(
        &self,
        slot_code: &str,
        _token: &CancellationToken,
    ) -> Result<SlotStatus, OracleError> {
        self.check(slot_code)
    }
}

impl<T: AvailabilityOracle + ?Sized> AvailabilityOracle for Arc<T> {
    fn check(&self, slot_code: &str) -> Result<SlotStatus, OracleError> {
        (**self).check(slot_code)
    }

    fn check_with_cancellation(
        &self,
        slot_code: &str,
        token: &CancellationToken,
    ) -> Result<SlotStatus, OracleError> {
        (**self).check_with_cancellation(slot_code, token)
    }
}
