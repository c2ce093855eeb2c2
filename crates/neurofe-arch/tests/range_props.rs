//! Repetition suffix properties.

use neurofe_arch::{instance_count, parse_range, ArchError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn expands_to_inclusive_count(base in "[a-z_]{1,12}", a in 0u32..1000, extra in 0u32..64) {
        let b = a + extra;
        let name = format!("{}[{}..{}]", base, a, b);
        let range = parse_range(&name).unwrap();
        prop_assert_eq!(range.count(), (b - a + 1) as usize);
        prop_assert_eq!(instance_count(&name).unwrap(), range.count());

        let names: Vec<String> = range.instance_names().collect();
        let expected: Vec<String> = (a..=b).map(|i| format!("{}[{}]", base, i)).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn reversed_bounds_always_fail(base in "[a-z]{1,8}", a in 1u32..1000, gap in 1u32..100) {
        let lo = a.saturating_sub(gap.min(a));
        prop_assume!(lo < a);
        let name = format!("{}[{}..{}]", base, a, lo);
        let is_malformed = matches!(parse_range(&name), Err(ArchError::MalformedRange { .. }));
        prop_assert!(is_malformed);
    }
}
