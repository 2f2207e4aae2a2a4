use std::collections::BTreeMap;
use std::path::PathBuf;

use sgt_core::{Op, ReferenceEnumeration};
use sgt_hall::{change_basis_forward, symops_from_hall, HallAlgebra, ReferenceBasis};
use sgt_syminfo::load_syminfo;
use sgt_table::{
    content_hash, parse_json, provenance, render_json, render_source, AssemblyOptions,
    CuratedGroup, Section, Table, TableAssembler, TableDocument, TsvReference,
};

static CURATED: &[CuratedGroup] = &[
    CuratedGroup {
        label: "triclinic - enlarged unit cells",
        entries: &[("F 1", "F 1"), ("I -1", "-I 1")],
    },
    CuratedGroup {
        label: "monoclinic",
        entries: &[("C 1 1 2", "C 2")],
    },
];

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn build() -> Table {
    let records = load_syminfo(&fixture("mini_syminfo.lib")).unwrap();
    let enumeration = TsvReference::from_path(&fixture("mini_reference.tsv")).unwrap();
    let basis = ReferenceBasis::from_enumeration(&enumeration).unwrap();
    let options = AssemblyOptions {
        curated: CURATED,
        ..AssemblyOptions::default()
    };
    TableAssembler::new(&enumeration, &basis, Some(&HallAlgebra), options)
        .assemble(&records)
        .unwrap()
}

#[test]
fn reference_walk_follows_enumeration_order() {
    let table = build();
    assert_eq!(table.entries.len(), 12);
    let names: Vec<&str> = table.entries[..7].iter().map(|e| e.hm_name.as_str()).collect();
    assert_eq!(
        names,
        ["P 1", "P -1", "P 1 2 1", "P 1 1 2", "C 1 2 1", "I 1 2 1", "P 21 21 2"]
    );
    let basis: Vec<usize> = table.entries[..7].iter().map(|e| e.basis_index).collect();
    assert_eq!(basis, [0, 0, 0, 1, 0, 2, 0]);
    assert_eq!(table.basis_operators[..3], ["x,y,z", "x,z,-y", "x,y,x+z"]);
    assert_eq!(table.entries[5].ccp4_code, 5005);
    assert_eq!(table.entries[3].qualifier, "c");
}

#[test]
fn supplementary_rows_use_short_names_and_halls() {
    let table = build();
    let extra = &table.entries[7];
    assert_eq!(extra.section, Section::Supplementary);
    assert_eq!(extra.hm_name, "P 21212(a)");
    assert_eq!(extra.hall_symbol, "P 2ab 2a");
    assert_eq!((extra.number, extra.ccp4_code), (18, 1018));
    let enlarged = &table.entries[8];
    assert_eq!(enlarged.hm_name, "B 1 1 2");
    assert_eq!(enlarged.number, 5);
    assert_eq!(table.basis_operators[enlarged.basis_index], "x,z,-y");
}

#[test]
fn curated_rows_get_identified_numbers() {
    let table = build();
    let numbers: Vec<u32> = table.entries[9..].iter().map(|e| e.number).collect();
    assert_eq!(numbers, [1, 2, 3]);
    assert!(table.entries[9..].iter().all(|e| e.ccp4_code == 0));
}

#[test]
fn every_operator_maps_the_reference_onto_the_row() {
    let table = build();
    let enumeration = TsvReference::from_path(&fixture("mini_reference.tsv")).unwrap();
    let mut references = BTreeMap::new();
    for group in enumeration.reference_groups().unwrap() {
        references.entry(group.number).or_insert(group.hall);
    }
    for entry in &table.entries {
        let reference = symops_from_hall(&references[&entry.number]).unwrap();
        let cob = Op::from_triplet(&table.basis_operators[entry.basis_index]).unwrap();
        let moved = change_basis_forward(&reference, &cob).unwrap();
        assert!(
            moved.is_same_as(&symops_from_hall(&entry.hall_symbol).unwrap()),
            "row {}",
            entry.sequence_index
        );
    }
}

#[test]
fn source_output_has_sections_and_basis_list() {
    let text = render_source(&build());
    assert!(text.starts_with("  // This table was generated by sgt.\n"));
    assert!(text.contains("  // First 7 entries"));
    assert!(text.contains("  // And extra entries from syminfo.lib\n"));
    assert!(text.contains("  // And ...\n  // triclinic - enlarged unit cells\n"));
    assert!(text.contains("  // monoclinic\n"));
    assert!(text.contains("    \"x,z,-y\",  // 1\n"));
    assert!(text.contains("\"P 21212(a)\""));
    assert_eq!(text.lines().filter(|l| l.starts_with("  {")).count(), 12);
}

#[test]
fn json_output_records_input_hashes() {
    let database = std::fs::read(fixture("mini_syminfo.lib")).unwrap();
    let reference = std::fs::read(fixture("mini_reference.tsv")).unwrap();
    let document = TableDocument::new(build(), provenance(&database, Some(&reference), true));
    let text = render_json(&document).unwrap();
    let parsed = parse_json(&text).unwrap();
    assert_eq!(parsed, document);
    assert_eq!(parsed.provenance.database_hash, content_hash(&database));
    assert!(parsed.provenance.verified);
}
