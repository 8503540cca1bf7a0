//! Renderer-agnostic chart specifications and the two pure functions that
//! build them from the launch dataset.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::{PayloadRange, SiteSelection, filter_launches, records_at_site};
use crate::data::model::{LaunchDataset, Outcome};

pub const PAYLOAD_AXIS_LABEL: &str = "Payload (kg)";
pub const OUTCOME_AXIS_LABEL: &str = "Launch Outcome (0=Fail, 1=Success)";

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// True when there is nothing to draw (no slices, or all weights zero).
    pub fn is_blank(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterChart {
    /// Points grouped by colour category, one series per category.
    pub fn series(&self) -> BTreeMap<&str, Vec<[f64; 2]>> {
        let mut out: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
        for p in &self.points {
            out.entry(p.category.as_str()).or_default().push([p.x, p.y]);
        }
        out
    }
}

/// Any chart a callback can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    Scatter(ScatterChart),
}

// ---------------------------------------------------------------------------
// Site-outcome aggregation (pie)
// ---------------------------------------------------------------------------

/// Success launches by site, or the outcome split of a single site.
///
/// For `All`, every site gets a slice weighted by its success count, zero
/// included. For one site, each outcome class present gets a slice weighted
/// by its launch count, largest first. An unknown site gives no slices.
pub fn site_outcome_pie(dataset: &LaunchDataset, site: &SiteSelection) -> PieChart {
    match site {
        SiteSelection::All => {
            let slices = dataset
                .sites()
                .iter()
                .map(|name| PieSlice {
                    label: name.clone(),
                    value: dataset
                        .records()
                        .iter()
                        .filter(|r| &r.site == name)
                        .map(|r| u64::from(r.outcome.class()))
                        .sum(),
                })
                .collect();
            PieChart {
                title: "Total Success Launches By Site".to_string(),
                slices,
            }
        }
        SiteSelection::Site(name) => {
            let mut counts: BTreeMap<Outcome, u64> = BTreeMap::new();
            for rec in records_at_site(dataset.records(), site) {
                *counts.entry(rec.outcome).or_default() += 1;
            }
            let mut slices: Vec<(Outcome, u64)> = counts.into_iter().collect();
            // Stable sort keeps ascending class order among equal counts.
            slices.sort_by(|a, b| b.1.cmp(&a.1));

            PieChart {
                title: format!("Total Success Launches for site {name}"),
                slices: slices
                    .into_iter()
                    .map(|(outcome, value)| PieSlice {
                        label: outcome.to_string(),
                        value,
                    })
                    .collect(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Payload-outcome scatter
// ---------------------------------------------------------------------------

/// One point per launch inside `range` at the selected site, coloured by
/// booster version category.
pub fn payload_outcome_scatter(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> ScatterChart {
    let points = filter_launches(dataset.records(), site, range)
        .into_iter()
        .map(|rec| ScatterPoint {
            x: rec.payload_mass_kg,
            y: f64::from(rec.outcome.class()),
            category: rec.booster_version_category.clone(),
        })
        .collect();

    let scope = match site {
        SiteSelection::All => "all Sites".to_string(),
        SiteSelection::Site(name) => name.clone(),
    };

    ScatterChart {
        title: format!("Correlation between Payload and Success for {scope}"),
        x_label: PAYLOAD_AXIS_LABEL.to_string(),
        y_label: OUTCOME_AXIS_LABEL.to_string(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::data::model::LaunchRecord;

    fn slices(pie: &PieChart) -> Vec<(&str, u64)> {
        pie.slices.iter().map(|s| (s.label.as_str(), s.value)).collect()
    }

    #[test]
    fn all_sites_pie_weights_are_success_counts() {
        let ds = sample_dataset();
        let pie = site_outcome_pie(&ds, &SiteSelection::All);

        assert_eq!(slices(&pie), vec![("A", 1), ("B", 1)]);
        assert_eq!(pie.title, "Total Success Launches By Site");
        assert_eq!(pie.slices.len(), ds.sites().len());
    }

    #[test]
    fn all_sites_pie_keeps_sites_without_successes() {
        let ds = LaunchDataset::from_records(vec![
            LaunchRecord::new(0, "A", 10.0, 1.0, "FT").unwrap(),
            LaunchRecord::new(1, "C", 10.0, 0.0, "FT").unwrap(),
        ])
        .unwrap();
        let pie = site_outcome_pie(&ds, &SiteSelection::All);
        assert_eq!(slices(&pie), vec![("A", 1), ("C", 0)]);
    }

    #[test]
    fn single_site_pie_splits_outcomes() {
        let ds = sample_dataset();
        let pie = site_outcome_pie(&ds, &SiteSelection::Site("A".into()));

        assert_eq!(slices(&pie), vec![("0", 1), ("1", 1)]);
        assert_eq!(pie.title, "Total Success Launches for site A");
    }

    #[test]
    fn single_site_pie_orders_by_count() {
        let ds = LaunchDataset::from_records(vec![
            LaunchRecord::new(0, "A", 10.0, 0.0, "FT").unwrap(),
            LaunchRecord::new(1, "A", 20.0, 1.0, "FT").unwrap(),
            LaunchRecord::new(2, "A", 30.0, 1.0, "B5").unwrap(),
        ])
        .unwrap();
        let pie = site_outcome_pie(&ds, &SiteSelection::Site("A".into()));
        assert_eq!(slices(&pie), vec![("1", 2), ("0", 1)]);
    }

    #[test]
    fn single_site_weights_sum_to_site_launches() {
        let ds = sample_dataset();
        for site in ds.sites() {
            let pie = site_outcome_pie(&ds, &SiteSelection::Site(site.clone()));
            let launches = ds.records().iter().filter(|r| &r.site == site).count() as u64;
            assert_eq!(pie.total(), launches);
        }
        let successes = ds.records().iter().filter(|r| r.outcome == Outcome::Success).count() as u64;
        assert_eq!(site_outcome_pie(&ds, &SiteSelection::All).total(), successes);
    }

    #[test]
    fn scatter_over_full_range() {
        let ds = sample_dataset();
        let chart = payload_outcome_scatter(&ds, &SiteSelection::All, PayloadRange::new(0.0, 1000.0));

        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.title, "Correlation between Payload and Success for all Sites");
        assert_eq!(chart.x_label, "Payload (kg)");
        assert_eq!(chart.y_label, "Launch Outcome (0=Fail, 1=Success)");
        assert_eq!(
            chart.points[1],
            ScatterPoint {
                x: 200.0,
                y: 0.0,
                category: "FT".into()
            }
        );
    }

    #[test]
    fn scatter_points_stay_in_range() {
        let ds = sample_dataset();
        for (lo, hi) in [(0.0, 120.0), (100.0, 100.0), (120.0, 200.0), (0.0, 0.0)] {
            let chart = payload_outcome_scatter(&ds, &SiteSelection::All, PayloadRange::new(lo, hi));
            assert!(chart.points.iter().all(|p| lo <= p.x && p.x <= hi));
        }
        let narrow = payload_outcome_scatter(&ds, &SiteSelection::All, PayloadRange::new(0.0, 120.0));
        assert_eq!(narrow.points.len(), 1);
        assert_eq!((narrow.points[0].x, narrow.points[0].y), (100.0, 1.0));
    }

    #[test]
    fn scatter_for_one_site() {
        let ds = sample_dataset();
        let chart = payload_outcome_scatter(
            &ds,
            &SiteSelection::Site("B".into()),
            PayloadRange::new(0.0, 1000.0),
        );
        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.title, "Correlation between Payload and Success for B");
    }

    #[test]
    fn unknown_site_gives_empty_charts() {
        let ds = sample_dataset();
        let z = SiteSelection::Site("Z".into());

        let pie = site_outcome_pie(&ds, &z);
        assert!(pie.slices.is_empty());
        assert!(pie.is_blank());

        let scatter = payload_outcome_scatter(&ds, &z, PayloadRange::new(0.0, 1000.0));
        assert!(scatter.points.is_empty());
        assert!(scatter.series().is_empty());
    }

    #[test]
    fn series_groups_by_category() {
        let ds = sample_dataset();
        let chart = payload_outcome_scatter(&ds, &SiteSelection::All, PayloadRange::new(0.0, 1000.0));
        let series = chart.series();
        assert_eq!(series["FT"], vec![[200.0, 0.0], [150.0, 1.0]]);
        assert_eq!(series["v1.0"], vec![[100.0, 1.0]]);
    }

    #[test]
    fn chart_spec_serialises_with_kind_tag() {
        let ds = sample_dataset();
        let spec = ChartSpec::Pie(site_outcome_pie(&ds, &SiteSelection::All));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["slices"][0]["label"], "A");
        assert_eq!(json["title"], "Total Success Launches By Site");
    }
}
