//! Property-based tests for ledger entry arithmetic.

use leavedesk_shared::types::EmployeeId;
use proptest::prelude::*;
use uuid::Uuid;

use crate::quota::error::QuotaError;
use crate::quota::types::QuotaBalance;

fn arb_balance() -> impl Strategy<Value = QuotaBalance> {
    (any::<u128>(), 2000i32..2100, 0u32..400, 0u32..400).prop_map(
        |(id, year, remaining, used)| QuotaBalance {
            employee_id: EmployeeId::from_uuid(Uuid::from_u128(id)),
            year,
            remaining_days: remaining,
            used_days: used,
        },
    )
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Deduct(u32),
    Restore(u32),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (0u32..30).prop_map(Op::Deduct),
            (0u32..30).prop_map(Op::Restore),
        ],
        0..50,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A deduct followed by a restore of the same size is a no-op.
    #[test]
    fn prop_deduct_restore_pair_is_identity(start in arb_balance(), days in 0u32..400) {
        let mut entry = start;
        if entry.deduct(days).is_ok() {
            entry.restore(days);
        }
        prop_assert_eq!(entry, start);
    }

    /// Deductions never take more than what remains.
    #[test]
    fn prop_deduct_never_overdraws(start in arb_balance(), days in 0u32..800) {
        let mut entry = start;
        match entry.deduct(days) {
            Ok(()) => {
                prop_assert!(days <= start.remaining_days);
                prop_assert_eq!(entry.remaining_days, start.remaining_days - days);
                prop_assert_eq!(entry.used_days, start.used_days + days);
            }
            Err(QuotaError::InsufficientBalance { available, requested }) => {
                prop_assert!(days > start.remaining_days);
                prop_assert_eq!(available, start.remaining_days);
                prop_assert_eq!(requested, days);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    /// Successful deductions conserve the derived allotment.
    #[test]
    fn prop_deduct_conserves_allotment(start in arb_balance(), days in 0u32..400) {
        let mut entry = start;
        if entry.deduct(days).is_ok() {
            prop_assert_eq!(entry.allotment(), start.allotment());
        }
    }

    /// Restoring never lowers the remaining balance and floors used at zero.
    #[test]
    fn prop_restore_floors_used(start in arb_balance(), days in 0u32..800) {
        let mut entry = start;
        entry.restore(days);
        prop_assert_eq!(entry.remaining_days, start.remaining_days + days);
        prop_assert_eq!(entry.used_days, start.used_days.saturating_sub(days));
    }

    /// Arbitrary sequences keep the entry consistent with a running tally.
    #[test]
    fn prop_sequence_matches_model(start in arb_balance(), ops in arb_ops()) {
        let mut entry = start;
        let mut remaining = i64::from(start.remaining_days);
        let mut used = i64::from(start.used_days);

        for op in ops {
            match op {
                Op::Deduct(days) => {
                    if i64::from(days) <= remaining {
                        prop_assert!(entry.deduct(days).is_ok());
                        remaining -= i64::from(days);
                        used += i64::from(days);
                    } else {
                        prop_assert!(entry.deduct(days).is_err());
                    }
                }
                Op::Restore(days) => {
                    entry.restore(days);
                    remaining += i64::from(days);
                    used = (used - i64::from(days)).max(0);
                }
            }
            prop_assert!(remaining >= 0);
            prop_assert_eq!(i64::from(entry.remaining_days), remaining);
            prop_assert_eq!(i64::from(entry.used_days), used);
        }
    }

    /// The reported percentage stays within 0..=100.
    #[test]
    fn prop_percentage_bounded(start in arb_balance()) {
        let pct = start.summary().percentage_used;
        prop_assert!(pct >= rust_decimal::Decimal::ZERO);
        prop_assert!(pct <= rust_decimal::Decimal::ONE_HUNDRED);
    }
}
