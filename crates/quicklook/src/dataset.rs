//! Loading a ceilometer day file into memory.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use netcdf_classic::{CfTimeUnits, Dataset, Error as NcError};
use tracing::debug;

use crate::error::{QuicklookError, Result};

const TIME_VAR: &str = "time";
const ALTITUDE_VAR: &str = "altitude";
const BACKSCATTER_VAR: &str = "attenuated_aerosol_backscatter_coefficient";
const QC_VAR: &str = "qc_flag";

/// One day of ceilometer profiles, decoded and ready to plot.
pub struct CeilometerDay {
    /// Profile timestamps, one per time step.
    pub times: Vec<DateTime<Utc>>,
    /// Range-gate centres in kilometres.
    pub altitude_km: Vec<f64>,
    /// Backscatter in m-1 sr-1, time-major (`[t * gates + h]`), with fill
    /// values already masked to NaN.
    pub backscatter: Vec<f64>,
    /// Per-cell quality flag, same shape as `backscatter`.
    pub qc_flag: Vec<f64>,
}

impl CeilometerDay {
    /// Open and fully decode a day file. The file handle is released before
    /// this returns, whether or not decoding succeeded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut dataset = Dataset::open(path)?;

        let time_var = dataset.require_variable(TIME_VAR)?;
        let units: CfTimeUnits = time_var
            .attr_str("units")
            .ok_or_else(|| NcError::MissingAttribute {
                variable: TIME_VAR.to_string(),
                attribute: "units".to_string(),
            })?
            .parse()?;

        let raw_times = dataset.read_values(TIME_VAR)?;
        if raw_times.is_empty() {
            return Err(QuicklookError::EmptyDataset(path.to_path_buf()));
        }
        let times = units.to_datetimes(&raw_times);

        let altitude_km: Vec<f64> = dataset
            .read_values(ALTITUDE_VAR)?
            .into_iter()
            .map(|m| m / 1000.0)
            .collect();

        let backscatter = dataset.read_masked(BACKSCATTER_VAR)?;
        let qc_flag = dataset.read_values(QC_VAR)?;

        let day = Self {
            times,
            altitude_km,
            backscatter,
            qc_flag,
        };
        day.check_shape(BACKSCATTER_VAR, day.backscatter.len())?;
        day.check_shape(QC_VAR, day.qc_flag.len())?;

        debug!(
            path = %path.display(),
            profiles = day.times.len(),
            gates = day.altitude_km.len(),
            "loaded ceilometer day"
        );
        Ok(day)
    }

    fn check_shape(&self, variable: &str, actual: usize) -> Result<()> {
        let times = self.times.len();
        let gates = self.altitude_km.len();
        let expected = times * gates;
        if actual != expected {
            return Err(QuicklookError::ShapeMismatch {
                variable: variable.to_string(),
                actual,
                expected,
                times,
                gates,
            });
        }
        Ok(())
    }

    /// The 24-hour display window: midnight UTC on the day of the first
    /// profile, to the following midnight.
    pub fn display_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.times[0]
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|ndt| ndt.and_utc())
            .unwrap_or(self.times[0]);
        (start, start + Duration::hours(24))
    }

    /// Profile times as seconds past the start of the display window.
    pub fn time_offsets(&self) -> Vec<f64> {
        let (start, _) = self.display_window();
        self.times
            .iter()
            .map(|t| (*t - start).num_milliseconds() as f64 / 1000.0)
            .collect()
    }
}
