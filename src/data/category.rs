use std::fmt;

// ---------------------------------------------------------------------------
// Pm25Category – air-quality severity label
// ---------------------------------------------------------------------------

/// Severity band of a PM2.5 concentration (µg/m³).
///
/// Variants are declared in increasing severity so `Ord` sorts them the way
/// they are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pm25Category {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
}

/// Lower bound of the first band. Values below it have no category.
pub const LOWER_BOUND: f64 = 0.0;

/// `(exclusive upper bound, label)` pairs, sorted by bound. Each band is
/// `[previous bound, bound)`.
pub const BANDS: [(f64, Pm25Category); 5] = [
    (12.0, Pm25Category::Good),
    (35.4, Pm25Category::Moderate),
    (55.4, Pm25Category::UnhealthyForSensitiveGroups),
    (150.4, Pm25Category::Unhealthy),
    (f64::INFINITY, Pm25Category::VeryUnhealthy),
];

impl Pm25Category {
    pub const ALL: [Pm25Category; 5] = [
        Pm25Category::Good,
        Pm25Category::Moderate,
        Pm25Category::UnhealthyForSensitiveGroups,
        Pm25Category::Unhealthy,
        Pm25Category::VeryUnhealthy,
    ];

    /// Classify a concentration. `None` for NaN, negative values and
    /// positive infinity.
    pub fn classify(pm25: f64) -> Option<Self> {
        if pm25.is_nan() || pm25 < LOWER_BOUND {
            return None;
        }
        BANDS
            .iter()
            .find(|(upper, _)| pm25 < *upper)
            .map(|(_, label)| *label)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Pm25Category::Good => "Good",
            Pm25Category::Moderate => "Moderate",
            Pm25Category::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Pm25Category::Unhealthy => "Unhealthy",
            Pm25Category::VeryUnhealthy => "Very Unhealthy",
        }
    }
}

impl fmt::Display for Pm25Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
