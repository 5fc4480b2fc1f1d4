//! Flyby windows: the intervals between chronologically adjacent perihelion passages.

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::server::{error::comet::CometError, model::db::FlybyModel};

/// Canonical identity of a window: the two bounding flyby ids, lowest first.
///
/// The key does not depend on which flyby is earlier in time, so a summary written for
/// `(a, b)` is found again for `(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowKey {
    pub low: i32,
    pub high: i32,
}

impl WindowKey {
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for WindowKey {
    type Err = CometError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CometError::InvalidWindowKey(s.to_string());

        let (a, b) = s.trim().split_once('-').ok_or_else(invalid)?;
        let a: i32 = a.parse().map_err(|_| invalid())?;
        let b: i32 = b.parse().map_err(|_| invalid())?;

        if a == b {
            return Err(invalid());
        }

        Ok(Self::new(a, b))
    }
}

/// Interval between two adjacent flybys of one comet.
#[derive(Clone, Debug, PartialEq)]
pub struct FlybyWindow {
    pub key: WindowKey,
    pub earlier: FlybyModel,
    pub later: FlybyModel,
}

impl FlybyWindow {
    fn between(earlier: &FlybyModel, later: &FlybyModel) -> Self {
        Self {
            key: WindowKey::new(earlier.id, later.id),
            earlier: earlier.clone(),
            later: later.clone(),
        }
    }
}

/// Chronological order with unknown years first; equal years fall back to id.
fn chronological(a: &FlybyModel, b: &FlybyModel) -> Ordering {
    let year = |f: &FlybyModel| f.year.filter(|y| !y.is_nan());

    match (year(a), year(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
    .then_with(|| a.id.cmp(&b.id))
}

/// Builds the windows of a comet from its flybys, in chronological order.
///
/// Flybys of other comets are skipped. Fewer than two flybys produce no windows.
pub fn build_windows(comet_id: i32, flybys: &[FlybyModel]) -> Vec<FlybyWindow> {
    let mut events: Vec<&FlybyModel> = flybys
        .iter()
        .filter(|flyby| {
            if flyby.comet_id != comet_id {
                tracing::warn!(
                    flyby_id = flyby.id,
                    flyby_comet_id = flyby.comet_id,
                    comet_id,
                    "Skipping flyby of another comet"
                );
                return false;
            }
            true
        })
        .collect();

    events.sort_by(|a, b| chronological(a, b));

    events
        .windows(2)
        .map(|pair| FlybyWindow::between(pair[0], pair[1]))
        .collect()
}
