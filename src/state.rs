use std::sync::Arc;

use crate::chart::ChartSpec;
use crate::color::CategoryColors;
use crate::dashboard::{Dashboard, Figures};
use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;
use crate::reactive::{CallbackError, OutputId};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub dashboard: Dashboard,

    /// Latest chart specs produced by the callbacks.
    pub figures: Figures,

    /// Text typed into the searchable site dropdown.
    pub site_query: String,

    /// Slider handles as the user is dragging them.
    pub payload_lo: f64,
    pub payload_hi: f64,

    /// Slice colours keyed by site name.
    pub site_colors: CategoryColors,

    /// Point colours keyed by booster version category.
    pub booster_colors: CategoryColors,

    /// Where the current dataset came from, shown in the top bar.
    pub source_label: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the dashboard for `dataset` and render the initial figures.
    pub fn new(dataset: LaunchDataset, source_label: String) -> Result<Self, CallbackError> {
        let dashboard = Dashboard::new(Arc::new(dataset))?;
        let figures = dashboard.render()?;
        let range = dashboard.payload_range();
        let site_colors = CategoryColors::new(dashboard.dataset().sites(), 210.0);
        let booster_colors = CategoryColors::new(dashboard.dataset().booster_categories(), 0.0);

        Ok(AppState {
            site_colors,
            booster_colors,
            site_query: String::new(),
            payload_lo: range.min(),
            payload_hi: range.max(),
            dashboard,
            figures,
            source_label,
            status_message: None,
        })
    }

    /// Replace the dataset with a freshly loaded one, keeping nothing from
    /// the previous selections.
    pub fn set_dataset(&mut self, dataset: LaunchDataset, source_label: String) {
        match AppState::new(dataset, source_label) {
            Ok(fresh) => *self = fresh,
            Err(e) => self.report(e),
        }
    }

    pub fn select_site(&mut self, site: SiteSelection) {
        let result = self.dashboard.select_site(site);
        self.absorb(result);
    }

    /// Push the slider handles into the dispatcher.
    pub fn commit_payload_range(&mut self) {
        let range = PayloadRange::new(self.payload_lo, self.payload_hi);
        if range == self.dashboard.payload_range() {
            return;
        }
        let result = self.dashboard.set_payload_range(range);
        self.absorb(result);
    }

    fn absorb(&mut self, result: Result<Vec<(OutputId, ChartSpec)>, CallbackError>) {
        match result {
            Ok(updates) => self.figures.apply(updates),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, e: CallbackError) {
        log::error!("Callback failed: {e}");
        self.status_message = Some(format!("Error: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn state() -> AppState {
        AppState::new(sample_dataset(), "sample".into()).unwrap()
    }

    #[test]
    fn starts_on_observed_payload_bounds() {
        let s = state();
        assert_eq!((s.payload_lo, s.payload_hi), (100.0, 200.0));
        assert_eq!(s.figures.scatter().unwrap().points.len(), 3);
        assert!(s.status_message.is_none());
    }

    #[test]
    fn crossed_handles_still_filter() {
        let mut s = state();
        s.payload_lo = 160.0;
        s.payload_hi = 0.0;
        s.commit_payload_range();
        let xs: Vec<f64> = s.figures.scatter().unwrap().points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![100.0, 150.0]);
    }

    #[test]
    fn selecting_site_refreshes_pie() {
        let mut s = state();
        s.select_site(SiteSelection::Site("B".into()));
        let pie = s.figures.pie().unwrap();
        assert_eq!(pie.slices.len(), 1);
        assert_eq!(pie.slices[0].label, "1");
    }

    #[test]
    fn replacing_dataset_resets_selection() {
        let mut s = state();
        s.select_site(SiteSelection::Site("B".into()));
        s.set_dataset(sample_dataset(), "again".into());
        assert_eq!(s.dashboard.site(), SiteSelection::All);
        assert_eq!(s.source_label, "again");
    }
}
