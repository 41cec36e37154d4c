use std::fmt;

use biopsy_core::{Float, Label};
use serde::{Deserialize, Serialize};

/// Which of the two independent pipelines is being trained or served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 9 cytology features, class codes `2` (benign) / `4` (malignant).
    Clump,
    /// 30 Wisconsin Diagnostic features, `0` (benign) / `1` (malignant), standardized.
    #[default]
    Wdbc,
}

impl Variant {
    pub fn schema(self) -> &'static FeatureSchema {
        match self {
            Variant::Clump => &CLUMP_SCHEMA,
            Variant::Wdbc => &WDBC_SCHEMA,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Clump => "clump",
            Variant::Wdbc => "wdbc",
        }
    }

    /// Whether the pipeline standardizes features before fitting.
    pub fn uses_scaler(self) -> bool {
        matches!(self, Variant::Wdbc)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed field-name → position mapping of a feature vector.
#[derive(Debug)]
pub struct FeatureSchema {
    /// Form field names in feature-vector order.
    pub fields: &'static [&'static str],
    /// Human-readable captions, parallel to `fields`.
    pub captions: &'static [&'static str],
    /// Class code decoded as "malignant" at serving time.
    pub malignant_label: Label,
    /// Example vectors the web form picks from at random: malignant,
    /// borderline, benign.
    pub samples: &'static [&'static [Float]],
}

impl FeatureSchema {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }
}

pub const CLUMP_FEATURES: [&str; 9] = [
    "clump_thickness",
    "cell_size",
    "cell_shape",
    "marginal_adhesion",
    "epithelial_size",
    "bare_nuclei",
    "bland_chromatin",
    "normal_nucleoli",
    "mitoses",
];

pub const WDBC_FEATURES: [&str; 30] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

pub static CLUMP_SCHEMA: FeatureSchema = FeatureSchema {
    fields: &CLUMP_FEATURES,
    captions: &[
        "Clump Thickness",
        "Uniformity of Cell Size",
        "Uniformity of Cell Shape",
        "Marginal Adhesion",
        "Single Epithelial Cell Size",
        "Bare Nuclei",
        "Bland Chromatin",
        "Normal Nucleoli",
        "Mitoses",
    ],
    malignant_label: 4,
    samples: &[
        &[8.0, 10.0, 10.0, 8.0, 7.0, 10.0, 9.0, 7.0, 1.0],
        &[5.0, 4.0, 4.0, 5.0, 7.0, 10.0, 3.0, 2.0, 1.0],
        &[5.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 1.0],
    ],
};

pub static WDBC_SCHEMA: FeatureSchema = FeatureSchema {
    fields: &WDBC_FEATURES,
    captions: &[
        "Radius (mean)",
        "Texture (mean)",
        "Perimeter (mean)",
        "Area (mean)",
        "Smoothness (mean)",
        "Compactness (mean)",
        "Concavity (mean)",
        "Concave Points (mean)",
        "Symmetry (mean)",
        "Fractal Dimension (mean)",
        "Radius (SE)",
        "Texture (SE)",
        "Perimeter (SE)",
        "Area (SE)",
        "Smoothness (SE)",
        "Compactness (SE)",
        "Concavity (SE)",
        "Concave Points (SE)",
        "Symmetry (SE)",
        "Fractal Dimension (SE)",
        "Radius (worst)",
        "Texture (worst)",
        "Perimeter (worst)",
        "Area (worst)",
        "Smoothness (worst)",
        "Compactness (worst)",
        "Concavity (worst)",
        "Concave Points (worst)",
        "Symmetry (worst)",
        "Fractal Dimension (worst)",
    ],
    malignant_label: 1,
    samples: &[
        &[
            17.99, 10.38, 122.8, 1001.0, 0.1184, 0.2776, 0.3001, 0.1471, 0.2419, 0.07871, 1.095,
            0.905, 8.589, 153.4, 0.006399, 0.04904, 0.05373, 0.01587, 0.03003, 0.006193, 25.38,
            17.33, 184.6, 2019.0, 0.1622, 0.6656, 0.7119, 0.2654, 0.4601, 0.1189,
        ],
        &[
            12.34, 15.67, 80.12, 500.0, 0.1, 0.15, 0.12, 0.08, 0.2, 0.06, 0.8, 1.0, 4.5, 40.0,
            0.005, 0.02, 0.03, 0.01, 0.02, 0.003, 15.0, 20.0, 100.0, 800.0, 0.15, 0.5, 0.6, 0.2,
            0.3, 0.09,
        ],
        &[
            11.0, 13.5, 70.0, 300.0, 0.1, 0.1, 0.05, 0.05, 0.2, 0.06, 0.5, 1.0, 2.0, 30.0, 0.005,
            0.02, 0.02, 0.01, 0.02, 0.003, 12.0, 15.0, 80.0, 350.0, 0.12, 0.15, 0.1, 0.07, 0.25,
            0.07,
        ],
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_are_consistent() {
        for variant in [Variant::Clump, Variant::Wdbc] {
            let schema = variant.schema();
            assert_eq!(schema.fields.len(), schema.captions.len());
            assert_eq!(schema.samples.len(), 3);
            for sample in schema.samples {
                assert_eq!(schema.fields.len(), sample.len());
            }
        }
        assert_eq!(Variant::Clump.schema().len(), 9);
        assert_eq!(Variant::Wdbc.schema().len(), 30);
    }

    #[test]
    fn test_field_names_unique() {
        let mut names = WDBC_FEATURES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 30);
    }

    #[test]
    fn test_position_lookup() {
        assert_eq!(CLUMP_SCHEMA.position("mitoses"), Some(8));
        assert_eq!(WDBC_SCHEMA.position("radius_mean"), Some(0));
        assert_eq!(WDBC_SCHEMA.position("nope"), None);
    }

    #[test]
    fn test_variant_serde_names() {
        let v: Variant = serde_yaml::from_str("clump").unwrap();
        assert_eq!(v, Variant::Clump);
        assert_eq!(serde_json::to_string(&Variant::Wdbc).unwrap(), "\"wdbc\"");
        assert_eq!(Variant::default(), Variant::Wdbc);
    }
}
