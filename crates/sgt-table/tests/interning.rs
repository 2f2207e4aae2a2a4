use proptest::prelude::*;
use sgt_table::{BasisTable, DuplicateTracker};

proptest! {
    #[test]
    fn interned_indices_follow_first_occurrence(texts in prop::collection::vec("[xyz+-]{1,4}", 1..40)) {
        let mut table = BasisTable::default();
        let mut seen: Vec<String> = Vec::new();
        for text in &texts {
            let idx = table.intern(text);
            match seen.iter().position(|s| s == text) {
                Some(first) => {
                    prop_assert_eq!(idx, first);
                }
                None => {
                    prop_assert_eq!(idx, seen.len());
                    seen.push(text.clone());
                }
            }
            prop_assert_eq!(table.intern(text), idx);
        }
        prop_assert_eq!(table.as_slice(), seen.as_slice());
    }

    #[test]
    fn duplicates_point_to_first_row(halls in prop::collection::vec(0usize..5, 1..30)) {
        let names = ["P 1", "-P 1", "P 2y", "C 2y", "-C 2 2ac"];
        let mut dups = DuplicateTracker::default();
        for (seq, &pick) in halls.iter().enumerate() {
            let first = halls.iter().position(|&h| h == pick).unwrap();
            let expected = (first != seq).then_some(first);
            prop_assert_eq!(dups.check(names[pick], seq), expected);
        }
    }
}
