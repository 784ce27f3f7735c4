/// Minimal view of a labeled time interval, as supplied by an annotation reader
pub trait LabeledInterval {
    /// Start time in seconds
    fn start(&self) -> f64;
    /// End time in seconds
    fn end(&self) -> f64;
    /// Raw (untrimmed) label
    fn label(&self) -> &str;
}

/// A labeled interval from an interval tier
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Label text as stored in the file
    pub label: String,
}

impl Interval {
    pub fn new(start: f64, end: f64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

impl LabeledInterval for Interval {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl<S: AsRef<str>> LabeledInterval for (f64, f64, S) {
    fn start(&self) -> f64 {
        self.0
    }

    fn end(&self) -> f64 {
        self.1
    }

    fn label(&self) -> &str {
        self.2.as_ref()
    }
}

/// A labeled instant from a point tier
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Time in seconds
    pub time: f64,
    pub label: String,
}

/// Entries of a tier; a tier holds either intervals or points
#[derive(Debug, Clone, PartialEq)]
pub enum TierEntries {
    Intervals(Vec<Interval>),
    Points(Vec<Point>),
}

/// A named channel of time-aligned annotations
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    pub entries: TierEntries,
}

impl Tier {
    pub fn is_interval_tier(&self) -> bool {
        matches!(self.entries, TierEntries::Intervals(_))
    }

    /// Intervals of this tier, or None for a point tier
    pub fn intervals(&self) -> Option<&[Interval]> {
        match &self.entries {
            TierEntries::Intervals(intervals) => Some(intervals),
            TierEntries::Points(_) => None,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        match &self.entries {
            TierEntries::Intervals(intervals) => intervals.len(),
            TierEntries::Points(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed TextGrid annotation file
#[derive(Debug, Clone, PartialEq)]
pub struct TextGrid {
    pub xmin: f64,
    pub xmax: f64,
    /// Tiers in file order
    pub tiers: Vec<Tier>,
}

impl TextGrid {
    /// Tier names in file order
    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name.as_str()).collect()
    }

    /// Get a tier by name (first match)
    pub fn tier(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    pub fn first_tier(&self) -> Option<&Tier> {
        self.tiers.first()
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f64 {
        (self.xmax - self.xmin).max(0.0)
    }
}
