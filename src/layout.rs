//! Static description of the dashboard page. The UI layer renders it; nothing
//! here depends on egui.

use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;
use crate::reactive::{InputId, OutputId};

pub const HEADING: &str = "SpaceX Launch Records Dashboard";

const SLIDER_STEP: f64 = 1000.0;
const SLIDER_MARK_EVERY: f64 = 2000.0;
const SLIDER_DEFAULT_MAX: f64 = 10_000.0;
/// Tracks wider than the default are split into at most this many intervals.
const SLIDER_MAX_MARK_INTERVALS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownOption {
    pub label: String,
    pub value: SiteSelection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dropdown {
    pub id: InputId,
    pub label: String,
    pub options: Vec<DropdownOption>,
    pub value: SiteSelection,
    pub placeholder: String,
    pub searchable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSlider {
    pub id: InputId,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Tick position → label.
    pub marks: Vec<(f64, String)>,
    pub value: PayloadRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub heading: String,
    pub site_dropdown: Dropdown,
    pub payload_slider: RangeSlider,
    /// Graph slots, top to bottom.
    pub graphs: Vec<OutputId>,
}

impl Layout {
    /// Build the page for a loaded dataset: one dropdown entry per discovered
    /// site and a slider initialised to the observed payload bounds.
    pub fn for_dataset(dataset: &LaunchDataset) -> Self {
        let mut options = vec![DropdownOption {
            label: "ALL SITES".to_string(),
            value: SiteSelection::All,
        }];
        options.extend(dataset.sites().iter().map(|site| DropdownOption {
            label: site.clone(),
            value: SiteSelection::Site(site.clone()),
        }));

        let (lo, hi) = dataset.payload_bounds();
        let min = (lo.min(0.0) / SLIDER_STEP).floor() * SLIDER_STEP;
        let max = (hi.max(SLIDER_DEFAULT_MAX) / SLIDER_STEP).ceil() * SLIDER_STEP;

        Layout {
            heading: HEADING.to_string(),
            site_dropdown: Dropdown {
                id: InputId::SiteDropdown,
                label: "Select site:".to_string(),
                options,
                value: SiteSelection::All,
                placeholder: "Select a Launch Site here".to_string(),
                searchable: true,
            },
            payload_slider: RangeSlider {
                id: InputId::PayloadSlider,
                label: "Payload range (kg):".to_string(),
                min,
                max,
                step: SLIDER_STEP,
                marks: marks(min, max),
                value: PayloadRange::new(lo, hi),
            },
            graphs: vec![OutputId::SuccessPieChart, OutputId::SuccessPayloadScatterChart],
        }
    }
}

fn marks(min: f64, max: f64) -> Vec<(f64, String)> {
    let spacing = mark_spacing(min, max);
    let first = (min / spacing).ceil() * spacing;
    (0u32..)
        .map(|i| first + f64::from(i) * spacing)
        .take_while(|tick| *tick <= max)
        .take(SLIDER_MAX_MARK_INTERVALS as usize + 2)
        .map(|tick| (tick, format!("{tick:.0}")))
        .collect()
}

/// 2000 kg on the default track; wider tracks get `span / 5` rounded up to
/// a whole slider step.
fn mark_spacing(min: f64, max: f64) -> f64 {
    if max <= SLIDER_DEFAULT_MAX {
        return SLIDER_MARK_EVERY;
    }
    let spread = (max - min) / SLIDER_MAX_MARK_INTERVALS;
    ((spread / SLIDER_STEP).ceil() * SLIDER_STEP).max(SLIDER_MARK_EVERY)
}
