//! Built-in example tunes
//!
//! A small catalog of ABC notation snippets the host can request by name,
//! mirroring the examples shipped with the Python package.

/// A named example tune in ABC notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleTune {
    pub name: &'static str,
    pub notation: &'static str,
}

pub const EXAMPLE_TUNES: &[ExampleTune] = &[
    ExampleTune {
        name: "twinkle_star",
        notation: "T: Twinkle, Twinkle, Little Star\n\
M: 4/4\n\
L: 1/4\n\
K: C\n\
|: C C G G | A A G2 | F F E E | D D C2 :|",
    },
    ExampleTune {
        name: "cooley_reel",
        notation: "T: Cooley's\n\
M: 4/4\n\
L: 1/8\n\
R: reel\n\
K: Emin\n\
|:D2|EB{c}BA B2 EB|~B2 AB dBAG|FDAD BDAD|FDAD dAFD|\n\
EBBA B2 EB|B2 AB defg|afe^c dBAF|DEFD E2:|\n\
|:gf|eB B2 efge|eB B2 gedB|A2 FA DAFA|A2 FA defg|\n\
eB B2 eBgB|eB B2 defg|afe^c dBAF|DEFD E2:|",
    },
    ExampleTune {
        name: "mary_had_lamb",
        notation: "T: Mary Had a Little Lamb\n\
M: 4/4\n\
L: 1/4\n\
K: C\n\
E D C D | E E E2 | D D D2 | E G G2 |\n\
E D C D | E E E2 | D D E D | C4 |",
    },
];

/// Look up an example tune by name.
pub fn example_notation(name: &str) -> std::result::Result<&'static str, String> {
    EXAMPLE_TUNES
        .iter()
        .find(|tune| tune.name == name)
        .map(|tune| tune.notation)
        .ok_or_else(|| {
            let available: Vec<&str> = EXAMPLE_TUNES.iter().map(|t| t.name).collect();
            format!(
                "Example '{}' not found. Available examples: {}",
                name,
                available.join(", ")
            )
        })
}

/// Names of all bundled examples, in catalog order.
pub fn example_names() -> Vec<&'static str> {
    EXAMPLE_TUNES.iter().map(|tune| tune.name).collect()
}
