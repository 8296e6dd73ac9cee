//! Property-based tests for the approval chain resolver.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::workflow::approval::{ApprovalChainResolver, UserRole};

/// Strategy for generating base-currency amounts from 0.00 to 200,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..20_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Larger amounts never need fewer approvers.
    #[test]
    fn prop_chain_length_is_monotonic(a in arb_amount(), b in arb_amount()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            ApprovalChainResolver::resolve(low).len() <= ApprovalChainResolver::resolve(high).len()
        );
    }

    /// Every chain is non-empty and starts with Manager.
    #[test]
    fn prop_chain_starts_with_manager(amount in arb_amount()) {
        let chain = ApprovalChainResolver::resolve(amount);
        prop_assert!(!chain.is_empty());
        prop_assert_eq!(chain[0], UserRole::Manager);
    }

    /// A shorter chain is always a prefix of a longer one.
    #[test]
    fn prop_chains_are_prefixes(a in arb_amount(), b in arb_amount()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let short = ApprovalChainResolver::resolve(low);
        let long = ApprovalChainResolver::resolve(high);
        prop_assert_eq!(&long[..short.len()], &short[..]);
    }

    /// Resolution is deterministic.
    #[test]
    fn prop_resolve_is_deterministic(amount in arb_amount()) {
        prop_assert_eq!(
            ApprovalChainResolver::resolve(amount),
            ApprovalChainResolver::resolve(amount)
        );
    }
}
