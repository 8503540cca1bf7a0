use std::fmt;

use super::model::LaunchRecord;

/// Dropdown value meaning "no site filter".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Filter inputs: which site and which payload window are selected
// ---------------------------------------------------------------------------

/// Current value of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a dropdown value; the sentinel `"ALL"` selects every site.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// Whether a record at `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(selected) => selected == site,
        }
    }

    /// The dropdown value this selection round-trips to.
    pub fn as_value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value())
    }
}

/// Inclusive payload window in kg. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    min: f64,
    max: f64,
}

impl PayloadRange {
    /// Reversed bounds are swapped, so a slider whose handles crossed still
    /// describes the window between them.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            PayloadRange { min: a, max: b }
        } else {
            PayloadRange { min: b, max: a }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive on both ends.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.min <= payload_mass_kg && payload_mass_kg <= self.max
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records within `range` and at the selected site, in input order.
///
/// Takes any iterator of record references so the output of one call can be
/// fed straight back in; applying the same filter twice is a no-op.
pub fn filter_launches<'a, I>(
    records: I,
    site: &SiteSelection,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord>
where
    I: IntoIterator<Item = &'a LaunchRecord>,
{
    records
        .into_iter()
        .filter(|rec| range.contains(rec.payload_mass_kg))
        .filter(|rec| site.matches(&rec.site))
        .collect()
}

/// Records at the selected site, ignoring payload.
pub fn records_at_site<'a, I>(records: I, site: &SiteSelection) -> Vec<&'a LaunchRecord>
where
    I: IntoIterator<Item = &'a LaunchRecord>,
{
    records
        .into_iter()
        .filter(|rec| site.matches(&rec.site))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn sentinel_parses_to_all() {
        assert_eq!(SiteSelection::parse("ALL"), SiteSelection::All);
        assert_eq!(
            SiteSelection::parse("KSC LC-39A"),
            SiteSelection::Site("KSC LC-39A".into())
        );
        // Case matters: only the exact sentinel means "all".
        assert_eq!(SiteSelection::parse("all"), SiteSelection::Site("all".into()));
        assert_eq!(SiteSelection::All.to_string(), "ALL");
    }

    #[test]
    fn reversed_range_is_normalised() {
        let r = PayloadRange::new(500.0, 100.0);
        assert_eq!((r.min(), r.max()), (100.0, 500.0));
        assert!(r.contains(100.0));
        assert!(r.contains(500.0));
        assert!(!r.contains(500.1));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = sample_dataset();
        let hits = filter_launches(ds.records(), &SiteSelection::All, PayloadRange::new(100.0, 150.0));
        let payloads: Vec<f64> = hits.iter().map(|r| r.payload_mass_kg).collect();
        assert_eq!(payloads, [100.0, 150.0]);
    }

    #[test]
    fn narrow_range_keeps_single_launch() {
        let ds = sample_dataset();
        let hits = filter_launches(ds.records(), &SiteSelection::All, PayloadRange::new(0.0, 120.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].site, "A");
        assert_eq!(hits[0].payload_mass_kg, 100.0);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample_dataset();
        let site = SiteSelection::Site("A".into());
        for (lo, hi) in [(0.0, 1000.0), (0.0, 120.0), (150.0, 200.0), (300.0, 400.0)] {
            let range = PayloadRange::new(lo, hi);
            let once = filter_launches(ds.records(), &site, range);
            let twice = filter_launches(once.iter().copied(), &site, range);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn unknown_site_matches_nothing() {
        let ds = sample_dataset();
        let site = SiteSelection::Site("Z".into());
        assert!(filter_launches(ds.records(), &site, PayloadRange::new(0.0, 1e6)).is_empty());
        assert!(records_at_site(ds.records(), &site).is_empty());
    }
}
