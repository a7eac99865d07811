//! Threshold evaluation engine.
//!
//! Pure logic: the caller extracts measurements and passes them in along
//! with the bounds to compare against.

use crate::verdict::Verdict;

/// A `(warning, critical)` bound pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPair<T> {
    pub warning: T,
    pub critical: T,
}

impl<T> ThresholdPair<T> {
    pub fn new(warning: T, critical: T) -> Self {
        Self { warning, critical }
    }
}

/// A bound pair together with the direction in which it is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold<T> {
    /// Violated when the value is strictly greater than the bound.
    Above(ThresholdPair<T>),
    /// Violated when the value is strictly lower than the bound.
    Below(ThresholdPair<T>),
    /// Violated when the value is below `low` or above `high`.
    Outside {
        low: ThresholdPair<T>,
        high: ThresholdPair<T>,
    },
}

impl<T: PartialOrd> Threshold<T> {
    /// Classify `value`: critical bound first, then warning.
    pub fn evaluate(&self, value: &T) -> Verdict {
        // Only NaN-like values fail to compare with themselves.
        if value.partial_cmp(value).is_none() {
            return Verdict::Unknown;
        }

        if self.violated(value, |pair| &pair.critical) {
            Verdict::Critical
        } else if self.violated(value, |pair| &pair.warning) {
            Verdict::Warning
        } else {
            Verdict::Ok
        }
    }

    /// Like [`evaluate`](Self::evaluate), with a missing measurement
    /// classified as [`Verdict::Unknown`].
    pub fn evaluate_opt(&self, value: Option<&T>) -> Verdict {
        value.map_or(Verdict::Unknown, |v| self.evaluate(v))
    }

    fn violated<'a, F>(&'a self, value: &T, bound: F) -> bool
    where
        F: Fn(&'a ThresholdPair<T>) -> &'a T,
    {
        match self {
            Threshold::Above(pair) => value > bound(pair),
            Threshold::Below(pair) => value < bound(pair),
            Threshold::Outside { low, high } => value < bound(low) || value > bound(high),
        }
    }
}

impl<T> Threshold<T> {
    /// The pair reported in performance data. For a range this is the
    /// upper pair, as plugin perfdata only carries one bound per level.
    pub fn reported_pair(&self) -> &ThresholdPair<T> {
        match self {
            Threshold::Above(pair) | Threshold::Below(pair) => pair,
            Threshold::Outside { high, .. } => high,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
