//! Fallible table allocation used by rehashing.

use std::collections::TryReserveError;

#[cfg(test)]
thread_local! {
    static FAIL_ALLOCATIONS: core::cell::Cell<bool> = const { core::cell::Cell::new(false) };
}

/// While set, every `try_filled` on the current thread fails.
#[cfg(test)]
pub(crate) fn fail_allocations(fail: bool) {
    FAIL_ALLOCATIONS.with(|f| f.set(fail));
}

/// Allocates a vector of exactly `len` elements built by `make`, reporting
/// allocation failure instead of aborting.
pub(crate) fn try_filled<T>(len: usize, make: impl FnMut() -> T) -> Result<Vec<T>, TryReserveError> {
    #[cfg(test)]
    if FAIL_ALLOCATIONS.with(|f| f.get()) {
        Vec::<u64>::new().try_reserve_exact(usize::MAX)?;
    }
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    // Capacity is already reserved; this cannot reallocate.
    v.resize_with(len, make);
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_exactly() {
        let v = try_filled(8, || 7u8).unwrap();
        assert_eq!(v, vec![7u8; 8]);
    }

    #[test]
    fn impossible_request_is_an_error() {
        assert!(try_filled::<u64>(usize::MAX, || 0).is_err());
    }

    #[test]
    fn forced_failure_is_an_error_until_reset() {
        fail_allocations(true);
        assert!(try_filled(1, || 0u8).is_err());
        fail_allocations(false);
        assert_eq!(try_filled(1, || 0u8).unwrap(), vec![0]);
    }
}
