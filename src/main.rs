mod app;
mod chart;
mod color;
mod config;
mod dashboard;
mod data;
mod layout;
mod reactive;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::LaunchDashApp;
use config::Cli;
use dashboard::{Dashboard, Figures};
use data::loader;
use data::model::LaunchDataset;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let source = cli.source();
    let dataset = loader::load_source(&source)
        .with_context(|| format!("loading launch records from {source}"))?;

    if cli.headless {
        return print_figures(dataset, &cli);
    }

    let range = cli.payload_range(dataset.payload_bounds());
    let mut state = AppState::new(dataset, source.to_string())?;
    state.select_site(cli.site_selection());
    if let Some(range) = range {
        state.payload_lo = range.min();
        state.payload_hi = range.max();
        state.commit_payload_range();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}

/// Print the chart specs for the command-line selection, keyed by output id.
fn print_figures(dataset: LaunchDataset, cli: &Cli) -> Result<()> {
    let figures = headless_figures(dataset, cli)?;
    let json = serde_json::to_string_pretty(&figures).context("serialising chart specs")?;
    println!("{json}");
    Ok(())
}

/// Evaluate both callbacks for the site and payload window given on the
/// command line.
fn headless_figures(dataset: LaunchDataset, cli: &Cli) -> Result<Figures> {
    let range = cli.payload_range(dataset.payload_bounds());
    let mut dashboard = Dashboard::new(Arc::new(dataset))?;
    dashboard.select_site(cli.site_selection())?;
    if let Some(range) = range {
        dashboard.set_payload_range(range)?;
    }
    Ok(dashboard.render()?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn figures_for(args: &[&str]) -> Figures {
        let cli = Cli::try_parse_from(args).unwrap();
        headless_figures(sample_dataset(), &cli).unwrap()
    }

    #[test]
    fn headless_defaults_cover_every_launch() {
        let figures = figures_for(&["launch-dash", "--headless"]);

        let pie = figures.pie().unwrap();
        assert_eq!(pie.title, "Total Success Launches By Site");
        assert_eq!(pie.total(), 2);
        assert_eq!(figures.scatter().unwrap().points.len(), 3);
    }

    #[test]
    fn headless_applies_site_and_payload_flags() {
        let figures = figures_for(&["launch-dash", "--headless", "--site", "A", "--payload-max", "120"]);

        assert_eq!(figures.pie().unwrap().title, "Total Success Launches for site A");
        let scatter = figures.scatter().unwrap();
        assert_eq!(scatter.title, "Correlation between Payload and Success for A");
        let xs: Vec<f64> = scatter.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![100.0]);
    }

    #[test]
    fn headless_json_is_keyed_by_output_id() {
        let figures = figures_for(&["launch-dash", "--headless", "--site", "B"]);
        let json = serde_json::to_value(&figures).unwrap();

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["success-payload-scatter-chart", "success-pie-chart"]);
        assert_eq!(json["success-pie-chart"]["kind"], "pie");
        assert_eq!(json["success-payload-scatter-chart"]["kind"], "scatter");
        assert_eq!(json["success-payload-scatter-chart"]["points"][0]["x"], 150.0);
    }
}
