//! Fixed data appended after the database entries.

use sgt_core::CrystalSystem;

/// Non-standard settings that have no database record, under one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuratedGroup {
    /// Free-text label; its first word names the crystal system.
    pub label: &'static str,
    /// `(display name, Hall symbol)` pairs.
    pub entries: &'static [(&'static str, &'static str)],
}

impl CuratedGroup {
    /// Crystal system named by the label.
    pub fn system(&self) -> &'static str {
        self.label.split_whitespace().next().unwrap_or_default()
    }

    /// Whether `system` agrees with the label.
    pub fn accepts(&self, system: CrystalSystem) -> bool {
        self.system() == system.as_str()
    }
}

/// Enlarged and alternative cells emitted at the end of the table.
pub const CURATED: &[CuratedGroup] = &[
    CuratedGroup {
        label: "triclinic - enlarged unit cells",
        entries: &[
            ("A 1", "A 1"),
            ("B 1", "B 1"),
            ("C 1", "C 1"),
            ("F 1", "F 1"),
            ("I 1", "I 1"),
            ("A -1", "-A 1"),
            ("B -1", "-B 1"),
            ("C -1", "-C 1"),
            ("F -1", "-F 1"),
            ("I -1", "-I 1"),
        ],
    },
    CuratedGroup {
        label: "monoclinic",
        entries: &[
            ("B 1 2 1", "B 2y"),
            ("C 1 1 2", "C 2"),
            ("B 1 21 1", "B 2yb"),
            ("C 1 1 21", "C 2c"),
            ("F 1 2/m 1", "-F 2y"),
        ],
    },
    CuratedGroup {
        label: "orthorhombic",
        entries: &[("A b a m", "-A 2 2ab")],
    },
    CuratedGroup {
        label: "tetragonal - enlarged C- and F-centred unit cells",
        entries: &[
            ("C 4 2 2", "C 4 2"),
            ("C 4 2 21", "C 4a 2"),
            ("F 4 2 2", "F 4 2"),
            ("C -4 2 m", "C -4 2"),
            ("C -4 2 b", "C -4 2ya"),
            ("F 4/m m m", "-F 4 2"),
        ],
    },
];

/// Shorter Hall symbols for database entries whose own symbol carries an
/// explicit change of basis. Each pair must generate the same operations.
pub const SHORTER_HALLS: &[(&str, &str)] = &[
    ("C 2y (x+1/4,y+1/4,-x+z-1/4)", "I 2yb"),
    ("C 2y (x+1/4,y+1/4,z)", "C 2yb"),
    ("P 2 2ab (x+1/4,y+1/4,z)", "P 2ab 2a"),
    ("C 2c 2 (x+1/4,y,z)", "C 2ac 2"),
    ("C 2 2 (x+1/4,y+1/4,z)", "C 2ab 2b"),
    ("F 2 2 (x,y,z+1/4)", "F 2 2c"),
    ("I 2 2 (x-1/4,y+1/4,z-1/4)", "I 2ab 2bc"),
    ("P 4n 2n (x-1/4,y-1/4,z-1/4)", "P 4bc 2a"),
    ("I 2 2 3 (x+1/4,y+1/4,z+1/4)", "I 2ab 2bc 3"),
];

/// Looks up the shorter form of `hall`.
pub fn shorter_hall(hall: &str) -> Option<&'static str> {
    let hall = hall.trim();
    SHORTER_HALLS
        .iter()
        .find(|(long, _)| *long == hall)
        .map(|(_, short)| *short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_name_crystal_systems() {
        let systems: Vec<&str> = CURATED.iter().map(CuratedGroup::system).collect();
        assert_eq!(systems, ["triclinic", "monoclinic", "orthorhombic", "tetragonal"]);
        assert!(CURATED[3].accepts(CrystalSystem::Tetragonal));
        assert!(!CURATED[3].accepts(CrystalSystem::Trigonal));
    }

    #[test]
    fn shorter_forms_are_found_by_exact_text() {
        assert_eq!(shorter_hall(" F 2 2 (x,y,z+1/4)"), Some("F 2 2c"));
        assert_eq!(shorter_hall("F 2 2"), None);
    }
}
