//! The launch dashboard: layout plus the two chart callbacks, wired to a
//! shared read-only dataset.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::chart::{ChartSpec, PieChart, ScatterChart, payload_outcome_scatter, site_outcome_pie};
use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;
use crate::layout::Layout;
use crate::reactive::{CallbackError, Dispatcher, InputId, InputValue, OutputId};

/// Latest chart spec for each output slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Figures(BTreeMap<OutputId, ChartSpec>);

impl Figures {
    pub fn apply(&mut self, updates: Vec<(OutputId, ChartSpec)>) {
        self.0.extend(updates);
    }

    pub fn pie(&self) -> Option<&PieChart> {
        match self.0.get(&OutputId::SuccessPieChart) {
            Some(ChartSpec::Pie(pie)) => Some(pie),
            _ => None,
        }
    }

    pub fn scatter(&self) -> Option<&ScatterChart> {
        match self.0.get(&OutputId::SuccessPayloadScatterChart) {
            Some(ChartSpec::Scatter(scatter)) => Some(scatter),
            _ => None,
        }
    }
}

pub struct Dashboard {
    layout: Layout,
    dispatcher: Dispatcher,
}

impl Dashboard {
    /// Build the dashboard with the layout's default selections.
    pub fn new(dataset: Arc<LaunchDataset>) -> Result<Self, CallbackError> {
        let layout = Layout::for_dataset(&dataset);
        let mut dispatcher = Dispatcher::new(dataset);
        register_callbacks(&mut dispatcher)?;

        dispatcher.seed_input(
            layout.site_dropdown.id,
            InputValue::Site(layout.site_dropdown.value.clone()),
        );
        dispatcher.seed_input(
            layout.payload_slider.id,
            InputValue::PayloadRange(layout.payload_slider.value),
        );

        Ok(Dashboard { layout, dispatcher })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn dataset(&self) -> &Arc<LaunchDataset> {
        self.dispatcher.dataset()
    }

    pub fn site(&self) -> SiteSelection {
        self.dispatcher
            .inputs()
            .site(InputId::SiteDropdown)
            .cloned()
            .unwrap_or_default()
    }

    pub fn payload_range(&self) -> PayloadRange {
        self.dispatcher
            .inputs()
            .payload_range(InputId::PayloadSlider)
            .unwrap_or(self.layout.payload_slider.value)
    }

    /// Every figure for the current selections.
    pub fn render(&self) -> Result<Figures, CallbackError> {
        let mut figures = Figures::default();
        figures.apply(self.dispatcher.render_all()?);
        Ok(figures)
    }

    pub fn select_site(
        &mut self,
        site: SiteSelection,
    ) -> Result<Vec<(OutputId, ChartSpec)>, CallbackError> {
        if let SiteSelection::Site(name) = &site {
            if !self.dataset().has_site(name) {
                log::warn!("Site '{name}' is not in the dataset; charts will be empty");
            }
        }
        self.dispatcher
            .set_input(InputId::SiteDropdown, InputValue::Site(site))
    }

    pub fn set_payload_range(
        &mut self,
        range: PayloadRange,
    ) -> Result<Vec<(OutputId, ChartSpec)>, CallbackError> {
        self.dispatcher
            .set_input(InputId::PayloadSlider, InputValue::PayloadRange(range))
    }
}

fn register_callbacks(dispatcher: &mut Dispatcher) -> Result<(), CallbackError> {
    dispatcher.register(
        &[InputId::SiteDropdown],
        &[OutputId::SuccessPieChart],
        |dataset, inputs| {
            let site = inputs.site(InputId::SiteDropdown)?;
            Ok(vec![ChartSpec::Pie(site_outcome_pie(dataset, site))])
        },
    )?;

    dispatcher.register(
        &[InputId::SiteDropdown, InputId::PayloadSlider],
        &[OutputId::SuccessPayloadScatterChart],
        |dataset, inputs| {
            let site = inputs.site(InputId::SiteDropdown)?;
            let range = inputs.payload_range(InputId::PayloadSlider)?;
            Ok(vec![ChartSpec::Scatter(payload_outcome_scatter(
                dataset, site, range,
            ))])
        },
    )
}
