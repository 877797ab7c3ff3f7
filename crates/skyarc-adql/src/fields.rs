//! Field registry mapping logical search fields to ObsCore columns.
//!
//! The registry is a static table built once per process. Fields are grouped
//! into categories for help output only; lookup runs over the flattened
//! field-name space, so category membership never affects resolution.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::encode::{self, Encoder};

/// One recognized logical search field.
#[derive(Debug, Clone, Copy)]
pub struct FieldEntry {
    /// Logical name accepted in constraint sets.
    pub name: &'static str,
    /// Physical column name(s) the predicate is generated over.
    pub columns: &'static str,
    /// Human-readable label for help output.
    pub label: &'static str,
    /// Encoder turning a raw value into a predicate fragment.
    pub encode: Encoder,
}

/// A named group of fields. Used only by [`FieldRegistry::help`].
#[derive(Debug, Clone, Copy)]
pub struct FieldCategory {
    /// Category heading.
    pub name: &'static str,
    /// Fields listed under this heading.
    pub fields: &'static [FieldEntry],
}

const CATEGORIES: &[FieldCategory] = &[
    FieldCategory {
        name: "Position",
        fields: &[
            FieldEntry {
                name: "source_name",
                columns: "target_name",
                label: "Source name (archive)",
                encode: encode::string_predicate,
            },
            FieldEntry {
                name: "ra_dec",
                columns: "s_ra, s_dec",
                label: "RA Dec (degrees)",
                encode: encode::position_predicate,
            },
            FieldEntry {
                name: "galactic",
                columns: "gal_longitude, gal_latitude",
                label: "Galactic (degrees)",
                encode: encode::position_predicate,
            },
            FieldEntry {
                name: "spatial_resolution",
                columns: "spatial_resolution",
                label: "Angular resolution (arcsec)",
                encode: encode::numeric_predicate,
            },
            FieldEntry {
                name: "spatial_scale_max",
                columns: "spatial_scale_max",
                label: "Largest angular scale (arcsec)",
                encode: encode::numeric_predicate,
            },
            FieldEntry {
                name: "fov",
                columns: "s_fov",
                label: "Field of view (arcsec)",
                encode: encode::numeric_predicate,
            },
        ],
    },
    FieldCategory {
        name: "Energy",
        fields: &[
            FieldEntry {
                name: "frequency",
                columns: "frequency",
                label: "Frequency (GHz)",
                encode: encode::numeric_predicate,
            },
            FieldEntry {
                name: "bandwidth",
                columns: "bandwidth",
                label: "Bandwidth (Hz)",
                encode: encode::numeric_predicate,
            },
            FieldEntry {
                name: "spectral_resolution",
                columns: "em_resolution",
                label: "Spectral resolution (kHz)",
                encode: encode::spectral_resolution_predicate,
            },
            // Explicit bypass: addresses the em_resolution column directly
            // with plain numeric-range encoding in meters, skipping the kHz
            // conversion that `spectral_resolution` applies.
            FieldEntry {
                name: "em_resolution",
                columns: "em_resolution",
                label: "Spectral resolution (m)",
                encode: encode::numeric_predicate,
            },
        ],
    },
    FieldCategory {
        name: "Time",
        fields: &[
            FieldEntry {
                name: "start_date",
                columns: "t_min",
                label: "Observation start (dd-mm-yyyy)",
                encode: encode::datetime_predicate,
            },
            FieldEntry {
                name: "integration_time",
                columns: "t_exptime",
                label: "Integration time (s)",
                encode: encode::numeric_predicate,
            },
        ],
    },
    FieldCategory {
        name: "Project",
        fields: &[
            FieldEntry {
                name: "project_code",
                columns: "proj_id",
                label: "Project code",
                encode: encode::string_predicate,
            },
            FieldEntry {
                name: "pi_name",
                columns: "obs_creator_name",
                label: "PI name",
                encode: encode::string_predicate,
            },
            FieldEntry {
                name: "instrument_name",
                columns: "instrument_name",
                label: "Instrument",
                encode: encode::string_predicate,
            },
            FieldEntry {
                name: "public",
                columns: "data_rights",
                label: "Public data only",
                encode: encode::visibility_predicate,
            },
        ],
    },
];

static REGISTRY: Lazy<FieldRegistry> = Lazy::new(|| FieldRegistry::from_categories(CATEGORIES));

/// Flat lookup table over all registered fields.
pub struct FieldRegistry {
    categories: &'static [FieldCategory],
    index: HashMap<&'static str, &'static FieldEntry>,
}

impl FieldRegistry {
    /// Process-wide registry over the built-in ObsCore field table.
    pub fn global() -> &'static FieldRegistry {
        &REGISTRY
    }

    fn from_categories(categories: &'static [FieldCategory]) -> Self {
        let mut index = HashMap::new();
        for category in categories {
            for field in category.fields {
                let previous = index.insert(field.name, field);
                assert!(
                    previous.is_none(),
                    "duplicate field name '{}' in registry",
                    field.name
                );
            }
        }
        Self { categories, index }
    }

    /// Look up a logical field name. Pure; category membership does not
    /// affect resolution.
    pub fn resolve(&self, name: &str) -> Option<&'static FieldEntry> {
        self.index.get(name).copied()
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &'static [FieldCategory] {
        self.categories
    }

    /// Render the field table grouped by category.
    pub fn help(&self) -> String {
        let mut out = String::new();
        for category in self.categories {
            out.push_str(category.name);
            out.push('\n');
            for field in category.fields {
                out.push_str(&format!(
                    "  {:<20} {:<32} {}\n",
                    field.name, field.columns, field.label
                ));
            }
        }
        out
    }
}
