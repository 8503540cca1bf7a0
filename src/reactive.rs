//! Named inputs, named outputs, and a dispatcher that re-runs the callbacks
//! observing an input whenever that input changes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::chart::ChartSpec;
use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Identifiers and values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputId {
    SiteDropdown,
    PayloadSlider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OutputId {
    #[serde(rename = "success-pie-chart")]
    SuccessPieChart,
    #[serde(rename = "success-payload-scatter-chart")]
    SuccessPayloadScatterChart,
}

impl InputId {
    pub fn as_str(self) -> &'static str {
        match self {
            InputId::SiteDropdown => "site-dropdown",
            InputId::PayloadSlider => "payload-slider",
        }
    }
}

impl OutputId {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputId::SuccessPieChart => "success-pie-chart",
            OutputId::SuccessPayloadScatterChart => "success-payload-scatter-chart",
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried by an input widget.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Site(SiteSelection),
    PayloadRange(PayloadRange),
}

#[derive(Debug, Error, PartialEq)]
pub enum CallbackError {
    #[error("input '{0}' has no value yet")]
    MissingInput(InputId),

    #[error("input '{input}' does not hold a {expected}")]
    WrongInputKind {
        input: InputId,
        expected: &'static str,
    },

    #[error("callback declared {declared} outputs but produced {produced}")]
    OutputArity { declared: usize, produced: usize },

    #[error("output '{0}' is already produced by another callback")]
    DuplicateOutput(OutputId),

    #[error("a callback needs at least one input and one output")]
    EmptyRegistration,
}

// ---------------------------------------------------------------------------
// Inputs – current values handed to a callback
// ---------------------------------------------------------------------------

/// Snapshot of every input value known to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    values: BTreeMap<InputId, InputValue>,
}

impl Inputs {
    pub fn site(&self, id: InputId) -> Result<&SiteSelection, CallbackError> {
        match self.values.get(&id) {
            Some(InputValue::Site(site)) => Ok(site),
            Some(_) => Err(CallbackError::WrongInputKind {
                input: id,
                expected: "site selection",
            }),
            None => Err(CallbackError::MissingInput(id)),
        }
    }

    pub fn payload_range(&self, id: InputId) -> Result<PayloadRange, CallbackError> {
        match self.values.get(&id) {
            Some(InputValue::PayloadRange(range)) => Ok(*range),
            Some(_) => Err(CallbackError::WrongInputKind {
                input: id,
                expected: "payload range",
            }),
            None => Err(CallbackError::MissingInput(id)),
        }
    }

    fn has_all(&self, ids: &[InputId]) -> bool {
        ids.iter().all(|id| self.values.contains_key(id))
    }
}

// ---------------------------------------------------------------------------
// Callback registry and dispatcher
// ---------------------------------------------------------------------------

/// A pure mapping from the current inputs to one spec per declared output.
pub type Handler =
    Box<dyn Fn(&LaunchDataset, &Inputs) -> Result<Vec<ChartSpec>, CallbackError>>;

struct Callback {
    inputs: Vec<InputId>,
    outputs: Vec<OutputId>,
    handler: Handler,
}

impl Callback {
    fn run(
        &self,
        dataset: &LaunchDataset,
        inputs: &Inputs,
    ) -> Result<Vec<(OutputId, ChartSpec)>, CallbackError> {
        let specs = (self.handler)(dataset, inputs)?;
        if specs.len() != self.outputs.len() {
            return Err(CallbackError::OutputArity {
                declared: self.outputs.len(),
                produced: specs.len(),
            });
        }
        Ok(self.outputs.iter().copied().zip(specs).collect())
    }
}

/// Owns the shared dataset, the registered callbacks and the latest input
/// values.
pub struct Dispatcher {
    dataset: Arc<LaunchDataset>,
    callbacks: Vec<Callback>,
    inputs: Inputs,
}

impl Dispatcher {
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        Dispatcher {
            dataset,
            callbacks: Vec::new(),
            inputs: Inputs::default(),
        }
    }

    pub fn dataset(&self) -> &Arc<LaunchDataset> {
        &self.dataset
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Register `handler` against `inputs`, producing `outputs`. Each output
    /// may be produced by one callback only.
    pub fn register<F>(
        &mut self,
        inputs: &[InputId],
        outputs: &[OutputId],
        handler: F,
    ) -> Result<(), CallbackError>
    where
        F: Fn(&LaunchDataset, &Inputs) -> Result<Vec<ChartSpec>, CallbackError> + 'static,
    {
        if inputs.is_empty() || outputs.is_empty() {
            return Err(CallbackError::EmptyRegistration);
        }
        for out in outputs {
            let claimed = self
                .callbacks
                .iter()
                .any(|cb| cb.outputs.contains(out));
            if claimed || outputs.iter().filter(|o| *o == out).count() > 1 {
                return Err(CallbackError::DuplicateOutput(*out));
            }
        }

        self.callbacks.push(Callback {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Store an input value without running anything.
    pub fn seed_input(&mut self, id: InputId, value: InputValue) {
        self.inputs.values.insert(id, value);
    }

    /// Store `value` and re-run every callback that observes `id` and has
    /// all of its inputs available. Returns the recomputed outputs.
    ///
    /// If any callback fails, the previous value of `id` is restored and no
    /// outputs are returned.
    pub fn set_input(
        &mut self,
        id: InputId,
        value: InputValue,
    ) -> Result<Vec<(OutputId, ChartSpec)>, CallbackError> {
        let previous = self.inputs.values.insert(id, value);

        match self.rerun_observers(id) {
            Ok(updated) => {
                log::debug!("{id} changed: recomputed {} outputs", updated.len());
                Ok(updated)
            }
            Err(err) => {
                log::warn!("{id} change rejected: {err}");
                match previous {
                    Some(old) => self.inputs.values.insert(id, old),
                    None => self.inputs.values.remove(&id),
                };
                Err(err)
            }
        }
    }

    fn rerun_observers(&self, id: InputId) -> Result<Vec<(OutputId, ChartSpec)>, CallbackError> {
        let mut updated = Vec::new();
        for cb in self.callbacks.iter().filter(|cb| cb.inputs.contains(&id)) {
            if self.inputs.has_all(&cb.inputs) {
                updated.extend(cb.run(&self.dataset, &self.inputs)?);
            }
        }
        Ok(updated)
    }

    /// Run every callback whose inputs are all set, as on first page load.
    pub fn render_all(&self) -> Result<Vec<(OutputId, ChartSpec)>, CallbackError> {
        let mut out = Vec::new();
        for cb in &self.callbacks {
            if self.inputs.has_all(&cb.inputs) {
                out.extend(cb.run(&self.dataset, &self.inputs)?);
            }
        }
        Ok(out)
    }
}
