//! Pump and valve catalogs: built-in data and resolution of project overrides.

use std::collections::BTreeMap;

use hb_components::valve::ValveCatalogEntry;
use hb_components::{PumpCurve, PumpLibrary, ValveCatalog};

use crate::ProjectResult;
use crate::schema::{CatalogsDef, DesignProject, ValveCatalogDef};

type SpeedTable = &'static [(&'static str, &'static [[f64; 2]])];

const BUILTIN_PUMPS: &[(&str, SpeedTable)] = &[
    (
        "Grundfos UPM3 15-70",
        &[
            (
                "speed_1",
                &[[0.0, 55.0], [200.0, 50.0], [400.0, 42.0], [600.0, 30.0], [800.0, 18.0], [1000.0, 6.0], [1100.0, 2.0]],
            ),
            (
                "speed_2",
                &[[0.0, 65.0], [250.0, 60.0], [500.0, 51.0], [750.0, 38.0], [1000.0, 24.0], [1150.0, 12.0], [1250.0, 5.0]],
            ),
            (
                "speed_3",
                &[[0.0, 75.0], [300.0, 70.0], [600.0, 60.0], [900.0, 44.0], [1200.0, 28.0], [1400.0, 16.0], [1500.0, 8.0]],
            ),
        ],
    ),
    (
        "Wilo Yonos PICO 25-1/6",
        &[
            (
                "speed_1",
                &[[0.0, 50.0], [250.0, 44.0], [500.0, 36.0], [750.0, 26.0], [1000.0, 15.0], [1200.0, 7.0]],
            ),
            (
                "speed_2",
                &[[0.0, 60.0], [300.0, 54.0], [600.0, 45.0], [900.0, 33.0], [1200.0, 20.0], [1400.0, 12.0]],
            ),
            (
                "speed_3",
                &[[0.0, 70.0], [350.0, 64.0], [700.0, 54.0], [1050.0, 40.0], [1400.0, 26.0], [1600.0, 15.0]],
            ),
        ],
    ),
    (
        "Generic 25-60",
        &[
            (
                "speed_1",
                &[[0.0, 48.0], [250.0, 42.0], [500.0, 34.0], [750.0, 24.0], [1000.0, 13.0], [1200.0, 6.0]],
            ),
            (
                "speed_2",
                &[[0.0, 58.0], [300.0, 52.0], [600.0, 44.0], [900.0, 32.0], [1200.0, 19.0], [1400.0, 11.0]],
            ),
            (
                "speed_3",
                &[[0.0, 68.0], [350.0, 62.0], [700.0, 52.0], [1050.0, 38.0], [1400.0, 24.0], [1600.0, 14.0]],
            ),
        ],
    ),
];

const BUILTIN_VALVES: &[(&str, &[f64])] = &[
    ("Danfoss RA-N 10 (3/8)", &[0.04, 0.08, 0.12, 0.19, 0.25, 0.33, 0.38, 0.56]),
    ("Danfoss RA-N 15 (1/2)", &[0.04, 0.08, 0.12, 0.20, 0.30, 0.40, 0.51, 0.73]),
    ("Danfoss RA-N 20 (3/4)", &[0.10, 0.15, 0.17, 0.26, 0.35, 0.46, 0.73, 1.04]),
    ("Oventrop DN15 (1/2)", &[0.05, 0.09, 0.14, 0.20, 0.26, 0.32, 0.43, 0.57, 0.67]),
    ("Heimeier (1/2)", &[0.049, 0.09, 0.15, 0.265, 0.33, 0.47, 0.59, 0.67]),
    ("Vogel und Noot", &[0.13, 0.30, 0.43, 0.58, 0.75]),
    ("Comap", &[0.028, 0.08, 0.125, 0.24, 0.335, 0.49]),
];

/// Built-in catalog data in schema form.
pub fn builtin_catalogs_def() -> CatalogsDef {
    let pumps = BUILTIN_PUMPS
        .iter()
        .map(|(model, speeds)| {
            let table = speeds
                .iter()
                .map(|(speed, points)| (speed.to_string(), points.to_vec()))
                .collect();
            (model.to_string(), table)
        })
        .collect();

    let valves = BUILTIN_VALVES
        .iter()
        .map(|(name, kv_values)| {
            let def = ValveCatalogDef {
                kv_values: kv_values.to_vec(),
                description: format!("{name} – {}-position TRV", kv_values.len()),
            };
            (name.to_string(), def)
        })
        .collect();

    CatalogsDef { pumps, valves }
}

/// Names of the built-in valves.
pub fn builtin_valve_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_VALVES.iter().map(|(name, _)| *name)
}

/// Lookup tables handed to the design engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogs {
    pub pumps: PumpLibrary,
    pub valves: ValveCatalog,
}

impl Catalogs {
    /// The built-in pump library and valve catalog.
    pub fn builtin() -> ProjectResult<Self> {
        Self::from_def(&builtin_catalogs_def())
    }

    /// Build lookup tables from schema data, validating every curve and kv table.
    pub fn from_def(def: &CatalogsDef) -> ProjectResult<Self> {
        let mut pumps = PumpLibrary::new();
        for (model, speeds) in &def.pumps {
            for (speed, points) in speeds {
                let curve = PumpCurve::new(points.iter().map(|p| (p[0], p[1])).collect())?;
                pumps.insert(model.clone(), speed.clone(), curve);
            }
        }

        let mut valves = ValveCatalog::new();
        for (name, entry) in &def.valves {
            valves.insert(
                name.clone(),
                ValveCatalogEntry {
                    kv_values: entry.kv_values.clone(),
                    description: entry.description.clone(),
                },
            )?;
        }

        Ok(Self { pumps, valves })
    }

    /// Catalogs in effect for a project: its own tables, built-in ones where empty.
    pub fn for_project(project: &DesignProject) -> ProjectResult<Self> {
        Self::from_def(&effective_catalogs_def(project))
    }
}

/// Project catalogs with empty tables replaced by the built-in ones.
pub fn effective_catalogs_def(project: &DesignProject) -> CatalogsDef {
    let builtin = builtin_catalogs_def();
    match &project.catalogs {
        None => builtin,
        Some(own) => CatalogsDef {
            pumps: non_empty_or(&own.pumps, builtin.pumps),
            valves: non_empty_or(&own.valves, builtin.valves),
        },
    }
}

fn non_empty_or<V: Clone>(own: &BTreeMap<String, V>, fallback: BTreeMap<String, V>) -> BTreeMap<String, V> {
    if own.is_empty() { fallback } else { own.clone() }
}
