//! [`Timeline`], a piecewise-in-time container, and the [`Interval`]s it is divided into.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{self, Bound, RangeBounds};

// -------------------------------------------------------------------------------------------------

/// A nonempty interval of time, whose ends may each be open, closed, or unbounded.
///
/// The lower end is stored separately from the upper end, so an unbounded lower end
/// always means −∞ and an unbounded upper end always means +∞.
///
/// Comparisons against the ends are exact; tolerance belongs to the code that *chooses*
/// where intervals begin, not to lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    lower: Bound<f64>,
    upper: Bound<f64>,
}

impl Interval {
    /// The interval containing all time.
    pub const ALL: Self = Self {
        lower: Bound::Unbounded,
        upper: Bound::Unbounded,
    };

    /// Constructs an interval from its ends.
    ///
    /// Panics if the interval would be empty (the upper end precedes the lower end), or if
    /// either end is NaN. This is a programming error, not a runtime condition; use
    /// [`Interval::try_new()`] when the ends come from elsewhere.
    #[track_caller]
    pub fn new(lower: Bound<f64>, upper: Bound<f64>) -> Self {
        match Self::try_new(lower, upper) {
            Ok(interval) => interval,
            Err(error) => panic!("{error}"),
        }
    }

    /// Constructs an interval from its ends, or returns an error if it would be empty or
    /// an end is NaN.
    pub fn try_new(lower: Bound<f64>, upper: Bound<f64>) -> Result<Self, InvertedInterval> {
        let candidate = Self { lower, upper };
        if bound_value(lower).is_some_and(f64::is_nan)
            || bound_value(upper).is_some_and(f64::is_nan)
            || candidate.is_empty()
        {
            Err(InvertedInterval { lower, upper })
        } else {
            Ok(candidate)
        }
    }

    /// The closed interval `[start, end]`.
    #[track_caller]
    pub fn closed(start: f64, end: f64) -> Self {
        Self::new(Bound::Included(start), Bound::Included(end))
    }

    /// The half-open interval `[start, +∞)`.
    #[track_caller]
    pub fn starting_at(start: f64) -> Self {
        Self::new(Bound::Included(start), Bound::Unbounded)
    }

    /// The lower end.
    #[inline]
    pub fn lower(&self) -> Bound<f64> {
        self.lower
    }

    /// The upper end.
    #[inline]
    pub fn upper(&self) -> Bound<f64> {
        self.upper
    }

    /// Returns whether `t` lies within this interval.
    pub fn contains(&self, t: f64) -> bool {
        if t.is_nan() {
            return false;
        }
        let above = match self.lower {
            Bound::Unbounded => true,
            Bound::Included(lower) => t >= lower,
            Bound::Excluded(lower) => t > lower,
        };
        let below = match self.upper {
            Bound::Unbounded => true,
            Bound::Included(upper) => t <= upper,
            Bound::Excluded(upper) => t < upper,
        };
        above && below
    }

    fn is_empty(&self) -> bool {
        match (self.lower, self.upper) {
            (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
            (Bound::Included(lower), Bound::Included(upper)) => lower > upper,
            (Bound::Included(lower) | Bound::Excluded(lower), Bound::Excluded(upper))
            | (Bound::Excluded(lower), Bound::Included(upper)) => lower >= upper,
        }
    }

    /// Returns the part of `self` which lies before all of `other`, if any.
    fn part_before(&self, other: &Interval) -> Option<Interval> {
        let upper = min_upper(self.upper, complement(other.lower)?);
        let candidate = Interval {
            lower: self.lower,
            upper,
        };
        (!candidate.is_empty()).then_some(candidate)
    }

    /// Returns the part of `self` which lies after all of `other`, if any.
    fn part_after(&self, other: &Interval) -> Option<Interval> {
        let lower = max_lower(self.lower, complement(other.upper)?);
        let candidate = Interval {
            lower,
            upper: self.upper,
        };
        (!candidate.is_empty()).then_some(candidate)
    }
}

impl RangeBounds<f64> for Interval {
    fn start_bound(&self) -> Bound<&f64> {
        self.lower.as_ref()
    }
    fn end_bound(&self) -> Bound<&f64> {
        self.upper.as_ref()
    }
}

impl From<ops::RangeFull> for Interval {
    fn from(_: ops::RangeFull) -> Self {
        Self::ALL
    }
}
impl From<ops::RangeFrom<f64>> for Interval {
    #[track_caller]
    fn from(range: ops::RangeFrom<f64>) -> Self {
        Self::starting_at(range.start)
    }
}
impl From<ops::Range<f64>> for Interval {
    #[track_caller]
    fn from(range: ops::Range<f64>) -> Self {
        Self::new(Bound::Included(range.start), Bound::Excluded(range.end))
    }
}
impl From<ops::RangeInclusive<f64>> for Interval {
    #[track_caller]
    fn from(range: ops::RangeInclusive<f64>) -> Self {
        Self::closed(*range.start(), *range.end())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Bound::Unbounded => write!(f, "(-∞")?,
            Bound::Included(t) => write!(f, "[{t}")?,
            Bound::Excluded(t) => write!(f, "({t}")?,
        }
        match self.upper {
            Bound::Unbounded => write!(f, ", +∞)"),
            Bound::Included(t) => write!(f, ", {t}]"),
            Bound::Excluded(t) => write!(f, ", {t})"),
        }
    }
}

/// Error from [`Interval::try_new()`] when the upper end precedes the lower end.
#[derive(Clone, Copy, Debug, displaydoc::Display, PartialEq)]
#[displaydoc("interval upper end {upper:?} precedes lower end {lower:?}")]
pub struct InvertedInterval {
    lower: Bound<f64>,
    upper: Bound<f64>,
}

impl core::error::Error for InvertedInterval {}

fn bound_value(bound: Bound<f64>) -> Option<f64> {
    match bound {
        Bound::Included(t) | Bound::Excluded(t) => Some(t),
        Bound::Unbounded => None,
    }
}

/// Converts a lower end into the upper end of whatever precedes it, or vice versa.
/// Unbounded ends have nothing on their far side.
fn complement(bound: Bound<f64>) -> Option<Bound<f64>> {
    match bound {
        Bound::Included(t) => Some(Bound::Excluded(t)),
        Bound::Excluded(t) => Some(Bound::Included(t)),
        Bound::Unbounded => None,
    }
}

/// Orders upper ends: +∞ is greatest, and at equal values an excluded end comes first.
fn cmp_upper(a: Bound<f64>, b: Bound<f64>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Greater,
        (_, Bound::Unbounded) => Ordering::Less,
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| {
                let rank = |bound: Bound<f64>| u8::from(matches!(bound, Bound::Included(_)));
                rank(a).cmp(&rank(b))
            })
        }
    }
}

/// Orders lower ends: −∞ is least, and at equal values an included end comes first.
fn cmp_lower(a: Bound<f64>, b: Bound<f64>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Less,
        (_, Bound::Unbounded) => Ordering::Greater,
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| {
                let rank = |bound: Bound<f64>| u8::from(matches!(bound, Bound::Excluded(_)));
                rank(a).cmp(&rank(b))
            })
        }
    }
}

fn min_upper(a: Bound<f64>, b: Bound<f64>) -> Bound<f64> {
    if cmp_upper(a, b).is_le() { a } else { b }
}

fn max_lower(a: Bound<f64>, b: Bound<f64>) -> Bound<f64> {
    if cmp_lower(a, b).is_ge() { a } else { b }
}

// -------------------------------------------------------------------------------------------------

/// Maps every instant of time to the value which is in effect at that instant.
///
/// A [`Timeline`] is a sorted sequence of disjoint [`Interval`]s which together cover
/// all time, each with a value that may be present or absent.
/// A newly constructed timeline is a single interval, and [`Timeline::insert()`] splits
/// and truncates the existing intervals so that this property continues to hold.
///
/// ```
/// # extern crate exact_motion_base as exact_motion;
/// use exact_motion::timeline::Timeline;
///
/// let mut timeline = Timeline::filled("before");
/// timeline.insert(1.0.., "after");
/// assert_eq!(timeline.get(0.5), Some(&"before"));
/// assert_eq!(timeline.get(1.0), Some(&"after"));
/// ```
#[derive(Clone, PartialEq)]
pub struct Timeline<V> {
    /// Sorted by lower end; never empty.
    segments: Vec<(Interval, Option<V>)>,
}

impl<V> Timeline<V> {
    /// Constructs a timeline in which no value is present at any time.
    pub fn new() -> Self {
        Self {
            segments: vec![(Interval::ALL, None)],
        }
    }

    /// Constructs a timeline in which `value` is present at every time.
    pub fn filled(value: V) -> Self {
        Self {
            segments: vec![(Interval::ALL, Some(value))],
        }
    }

    /// Returns the value in effect at time `t`, or [`None`] if the interval containing
    /// `t` has no value.
    pub fn get(&self, t: f64) -> Option<&V> {
        self.segment_containing(t).and_then(|(_, value)| value)
    }

    /// Returns the interval containing `t` and its value.
    ///
    /// This returns [`None`] only for NaN, which no interval contains.
    pub fn segment_containing(&self, t: f64) -> Option<(Interval, Option<&V>)> {
        if t.is_nan() {
            return None;
        }
        // Segments are sorted and disjoint, so the one containing t (if any) is the last
        // one whose lower end admits t.
        let after_t = self.segments.partition_point(|(interval, _)| match interval.lower {
            Bound::Unbounded => true,
            Bound::Included(lower) => lower <= t,
            Bound::Excluded(lower) => lower < t,
        });
        let (interval, value) = self.segments.get(after_t.checked_sub(1)?)?;
        interval
            .contains(t)
            .then_some((*interval, value.as_ref()))
    }

    /// Sets the value for every time within `interval`, replacing whatever was there.
    ///
    /// Existing intervals partly covered by `interval` are truncated, keeping the
    /// uncovered part with its old value; existing intervals entirely covered are
    /// removed.
    pub fn insert(&mut self, interval: impl Into<Interval>, value: V)
    where
        V: Clone,
    {
        let interval = interval.into();
        let mut before = Vec::new();
        let mut after = Vec::new();
        for (existing, existing_value) in self.segments.drain(..) {
            if let Some(head) = existing.part_before(&interval) {
                before.push((head, existing_value.clone()));
            }
            if let Some(tail) = existing.part_after(&interval) {
                after.push((tail, existing_value));
            }
        }
        self.segments = before;
        self.segments.push((interval, Some(value)));
        self.segments.append(&mut after);
    }

    /// Iterates over the intervals in time order, with their values.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = (Interval, Option<&V>)> + '_ {
        self.segments
            .iter()
            .map(|(interval, value)| (*interval, value.as_ref()))
    }

    /// Returns the number of intervals the timeline is divided into. This is always at
    /// least 1.
    #[expect(clippy::len_without_is_empty, reason = "never empty")]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl<V> Default for Timeline<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Timeline<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.segments
                    .iter()
                    .map(|(interval, value)| (interval.to_string(), value)),
            )
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
