use std::collections::HashMap;

use sgt_core::{ErrorInfo, GroupOps, Op, OperationAlgebra, SgError};
use sgt_hall::HallAlgebra;
use sgt_syminfo::SymmetryRecord;
use sgt_table::EquivalenceVerifier;

/// Algebra answering from a fixed table of expansions.
struct TableAlgebra {
    groups: HashMap<&'static str, GroupOps>,
}

impl OperationAlgebra for TableAlgebra {
    fn expand(&self, hall: &str) -> Result<GroupOps, SgError> {
        self.groups
            .get(hall)
            .cloned()
            .ok_or_else(|| SgError::InvalidNotation(ErrorInfo::new("unknown", hall)))
    }
}

fn op(text: &str) -> Op {
    Op::from_triplet(text).unwrap()
}

fn record(hall: &str, symops: &[&str], cenops: &[&str]) -> SymmetryRecord {
    SymmetryRecord {
        number: 3,
        ccp4_code: 3,
        hall_symbol: hall.into(),
        extended_hm_name: "P 1 2 1".into(),
        legacy_aliases: Vec::new(),
        basis_operator_text: "x,y,z".into(),
        explicit_operations: symops.iter().map(|s| s.to_string()).collect(),
        centering_operations: cenops.iter().map(|s| s.to_string()).collect(),
        line: 1,
    }
}

#[test]
fn two_operation_group_passes_against_its_expansion() {
    let algebra = TableAlgebra {
        groups: HashMap::from([(
            "P 2",
            GroupOps {
                sym_ops: vec![Op::identity(), op("-x,y,-z")],
                cen_ops: vec![[0, 0, 0]],
            },
        )]),
    };
    let verifier = EquivalenceVerifier::new(&algebra);
    let rec = record("P 2", &["x,y,z", "-x,y,-z"], &["x,y,z"]);
    verifier.verify(&rec, "P 2").unwrap();
}

#[test]
fn hall_algebra_accepts_matching_record() {
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    let rec = record("P 2y", &["x,y,z", "-x,y,-z"], &["x,y,z"]);
    verifier.verify(&rec, "P 2y").unwrap();
}

#[test]
fn different_coset_representatives_are_equivalent() {
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    let rec = record(
        "C 2y",
        &["x,y,z", "-x+1/2,y+1/2,-z"],
        &["x,y,z", "x+1/2,y+1/2,z"],
    );
    verifier.verify(&rec, "C 2y").unwrap();
}

#[test]
fn centering_order_is_irrelevant() {
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    let rec = record(
        "I 2y",
        &["x,y,z", "-x,y,-z"],
        &["x+1/2,y+1/2,z+1/2", "x,y,z"],
    );
    verifier.verify(&rec, "I 2y").unwrap();
}

#[test]
fn wrong_centering_is_reported() {
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    let rec = record("C 2y", &["x,y,z", "-x,y,-z"], &["x,y,z", "x,y+1/2,z+1/2"]);
    let err = verifier.verify(&rec, "C 2y").unwrap_err();
    assert!(matches!(err, SgError::CenteringMismatch(_)));
    assert_eq!(err.info().code, "centering-set");

    let rec = record("C 2y", &["x,y,z", "-x,y,-z"], &["x,y,z"]);
    let err = verifier.verify(&rec, "C 2y").unwrap_err();
    assert_eq!(err.info().code, "centering-count");
}

#[test]
fn wrong_operations_are_reported() {
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    let rec = record("P 2y", &["x,y,z", "-x,y+1/2,-z"], &["x,y,z"]);
    let err = verifier.verify(&rec, "P 2y").unwrap_err();
    assert!(matches!(err, SgError::OperationSetMismatch(_)));
    assert_eq!(err.info().code, "coset-product");

    let rec = record("P 2y", &["x,y,z"], &["x,y,z"]);
    let err = verifier.verify(&rec, "P 2y").unwrap_err();
    assert_eq!(err.info().code, "symop-count");
}

#[test]
fn unparseable_triplet_is_a_format_error() {
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    let rec = record("P 2y", &["x,y,z", "-x,y"], &["x,y,z"]);
    assert!(matches!(
        verifier.verify(&rec, "P 2y"),
        Err(SgError::Format(_))
    ));
}

#[test]
fn same_group_compares_expansions() {
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    assert!(verifier.same_group("F 2 2 (x,y,z+1/4)", "F 2 2c").unwrap());
    assert!(!verifier.same_group("P 2y", "P 2").unwrap());
    assert!(verifier.same_group("P 2y", "Q 2").is_err());
}
