// ============================================================
// Layer 3: Diamond Domain Types
// ============================================================
// A diamond as it appears in the dataset: four physical
// measurements, three graded attributes, proportions, and the
// price we want to predict.
//
// The three grades are ordered scales, so each one encodes to
// its rank (worst = 0) instead of being one-hot encoded. That
// keeps the feature vector at a fixed 9 columns.
//
// serde maps the CSV labels (e.g. "Very Good", "VVS1") onto the
// enum variants; an unknown label is a parse error.

use serde::{Deserialize, Serialize};

/// Number of numeric features produced by [`DiamondRecord::features`].
pub const FEATURE_COUNT: usize = 9;

/// Feature column names, in the order `features()` emits them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "carat", "cut", "color", "clarity", "depth", "table", "x", "y", "z",
];

/// Cut quality, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cut {
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Premium,
    Ideal,
}

impl Cut {
    pub fn rank(self) -> u8 {
        match self {
            Cut::Fair     => 0,
            Cut::Good     => 1,
            Cut::VeryGood => 2,
            Cut::Premium  => 3,
            Cut::Ideal    => 4,
        }
    }
}

/// Colour grade, from J (most tinted) to D (colourless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    J,
    I,
    H,
    G,
    F,
    E,
    D,
}

impl Color {
    pub fn rank(self) -> u8 {
        match self {
            Color::J => 0,
            Color::I => 1,
            Color::H => 2,
            Color::G => 3,
            Color::F => 4,
            Color::E => 5,
            Color::D => 6,
        }
    }
}

/// Clarity grade, from I1 (included) to IF (internally flawless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clarity {
    I1,
    SI2,
    SI1,
    VS2,
    VS1,
    VVS2,
    VVS1,
    IF,
}

impl Clarity {
    pub fn rank(self) -> u8 {
        match self {
            Clarity::I1   => 0,
            Clarity::SI2  => 1,
            Clarity::SI1  => 2,
            Clarity::VS2  => 3,
            Clarity::VS1  => 4,
            Clarity::VVS2 => 5,
            Clarity::VVS1 => 6,
            Clarity::IF   => 7,
        }
    }
}

/// One row of `diamonds.csv`.
///
/// Columns not listed here (such as an unnamed index column)
/// are ignored by the CSV deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiamondRecord {
    pub carat:   f64,
    pub cut:     Cut,
    pub color:   Color,
    pub clarity: Clarity,
    /// Total depth percentage
    pub depth:   f64,
    /// Width of the top facet relative to the widest point
    pub table:   f64,
    pub price:   f64,
    /// Length in mm
    pub x:       f64,
    /// Width in mm
    pub y:       f64,
    /// Depth in mm
    pub z:       f64,
}

impl DiamondRecord {
    /// Encode this row as a numeric feature vector (see [`FEATURE_NAMES`]).
    pub fn features(&self) -> [f32; FEATURE_COUNT] {
        [
            self.carat as f32,
            self.cut.rank() as f32,
            self.color.rank() as f32,
            self.clarity.rank() as f32,
            self.depth as f32,
            self.table as f32,
            self.x as f32,
            self.y as f32,
            self.z as f32,
        ]
    }

    /// A row is physically meaningful when every dimension is positive
    /// and no numeric field is NaN or infinite.
    pub fn is_physical(&self) -> bool {
        let numeric = [
            self.carat, self.depth, self.table, self.price,
            self.x, self.y, self.z,
        ];
        numeric.iter().all(|v| v.is_finite())
            && self.carat > 0.0
            && self.x > 0.0
            && self.y > 0.0
            && self.z > 0.0
    }
}
