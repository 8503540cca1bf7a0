use clap::Parser;

use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::loader::{DEFAULT_DATA_URL, DataSource};

/// launch-dash: launch outcomes by site and payload
#[derive(Parser, Debug, Clone)]
#[command(name = "launch-dash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset to load: a .csv/.json/.parquet file or an http(s) URL
    #[arg(long, env = "LAUNCH_DASH_DATA", default_value = DEFAULT_DATA_URL)]
    pub data: String,

    /// Print both chart specs as JSON and exit instead of opening a window
    #[arg(long)]
    pub headless: bool,

    /// Initial site selection, or ALL
    #[arg(long, default_value = "ALL")]
    pub site: String,

    /// Lower payload bound in kg (defaults to the lightest launch)
    #[arg(long)]
    pub payload_min: Option<f64>,

    /// Upper payload bound in kg (defaults to the heaviest launch)
    #[arg(long)]
    pub payload_max: Option<f64>,
}

impl Cli {
    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.data)
    }

    pub fn site_selection(&self) -> SiteSelection {
        SiteSelection::parse(&self.site)
    }

    /// The requested payload window, with missing bounds taken from the
    /// dataset's observed `(min, max)`. `None` when neither bound was given.
    pub fn payload_range(&self, observed: (f64, f64)) -> Option<PayloadRange> {
        if self.payload_min.is_none() && self.payload_max.is_none() {
            return None;
        }
        Some(PayloadRange::new(
            self.payload_min.unwrap_or(observed.0),
            self.payload_max.unwrap_or(observed.1),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_published_dataset() {
        let cli = Cli::try_parse_from(["launch-dash"]).unwrap();
        // LAUNCH_DASH_DATA may be set in the environment running the tests.
        if std::env::var_os("LAUNCH_DASH_DATA").is_none() {
            assert_eq!(cli.source(), DataSource::Url(DEFAULT_DATA_URL.to_string()));
        }
        assert!(!cli.headless);
        assert_eq!(cli.site_selection(), SiteSelection::All);
        assert_eq!(cli.payload_range((0.0, 9600.0)), None);
    }

    #[test]
    fn headless_selection_flags() {
        let cli = Cli::try_parse_from([
            "launch-dash",
            "--data",
            "launches.csv",
            "--headless",
            "--site",
            "KSC LC-39A",
            "--payload-max",
            "5000",
        ])
        .unwrap();

        assert_eq!(cli.source(), DataSource::parse("launches.csv"));
        assert!(cli.headless);
        assert_eq!(cli.site_selection(), SiteSelection::Site("KSC LC-39A".into()));
        assert_eq!(
            cli.payload_range((0.0, 9600.0)),
            Some(PayloadRange::new(0.0, 5000.0))
        );
    }
}
