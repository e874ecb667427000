//! Reporting period resolution.

/// Symbolic reporting window selected by the caller.
///
/// Unrecognized tokens resolve to the 90-day default; strict validation
/// of the token belongs to the HTTP boundary, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
    AllTime,
}

impl Period {
    pub fn from_token(token: &str) -> Self {
        match token {
            "7D" => Period::Week,
            "30D" => Period::Month,
            "90D" => Period::Quarter,
            "All" => Period::AllTime,
            _ => Period::Quarter,
        }
    }

    /// Concrete day-count window for grouped-by-day queries. All-time
    /// uses a 365-day chart width; truly unbounded scans apply only to
    /// scalar totals (see [`Period::scalar_bound`]).
    pub fn day_count(&self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
            Period::AllTime => 365,
        }
    }

    /// Lower time bound for scalar totals; `None` means no bound.
    pub fn scalar_bound(&self) -> Option<i64> {
        match self {
            Period::AllTime => None,
            _ => Some(self.day_count()),
        }
    }

    pub fn is_all_time(&self) -> bool {
        matches!(self, Period::AllTime)
    }
}
