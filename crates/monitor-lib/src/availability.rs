//! Availability percentage derived from a usage snapshot

use crate::error::MonitorError;
use crate::models::UsageSnapshot;

/// Compute `(available * 100) / capacity` for the root of a snapshot.
///
/// A capacity of zero fails with [`MonitorError::Division`] instead of
/// producing an infinite or NaN value. Values above 100 (more available
/// than capacity) and negative counts are passed through unchanged.
pub fn compute_availability(snapshot: &UsageSnapshot) -> Result<f64, MonitorError> {
    if snapshot.capacity == 0 {
        return Err(MonitorError::Division {
            available: snapshot.available,
        });
    }

    Ok((snapshot.available as f64 * 100.0) / snapshot.capacity as f64)
}
