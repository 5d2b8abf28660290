use core::ops::Bound;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::math::Polynomial;
use crate::timeline::Interval;

impl Serialize for Polynomial {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.coefficients().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Polynomial {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Polynomial::new() trims, so a hand-written trailing 0.0 is accepted and dropped.
        Ok(Polynomial::new(Vec::<f64>::deserialize(deserializer)?))
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct IntervalSer {
    lower: EndSer,
    upper: EndSer,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum EndSer {
    Included(f64),
    Excluded(f64),
    Unbounded,
}

impl From<Bound<f64>> for EndSer {
    fn from(bound: Bound<f64>) -> Self {
        match bound {
            Bound::Included(t) => EndSer::Included(t),
            Bound::Excluded(t) => EndSer::Excluded(t),
            Bound::Unbounded => EndSer::Unbounded,
        }
    }
}

impl From<EndSer> for Bound<f64> {
    fn from(end: EndSer) -> Self {
        match end {
            EndSer::Included(t) => Bound::Included(t),
            EndSer::Excluded(t) => Bound::Excluded(t),
            EndSer::Unbounded => Bound::Unbounded,
        }
    }
}

impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        IntervalSer {
            lower: self.lower().into(),
            upper: self.upper().into(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let IntervalSer { lower, upper } = IntervalSer::deserialize(deserializer)?;
        Interval::try_new(lower.into(), upper.into()).map_err(serde::de::Error::custom)
    }
}
