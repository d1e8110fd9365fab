//! Synthetic ceilometer day files.
//!
//! The layout mirrors the instrument's daily archive: a record `time`
//! dimension carrying seconds since a reference epoch, a fixed `altitude`
//! dimension in metres, a backscatter field and a per-cell quality flag.

use std::path::Path;

use netcdf_classic::{AttrValue, FileBuilder, NcType, Result};

/// Fill value used for the synthetic backscatter field.
pub const FIXTURE_FILL: f64 = -999.0;

/// In-memory description of a ceilometer day file.
pub struct CeilometerFixture {
    pub time_units: String,
    /// Offsets in the units above, one per profile.
    pub time: Vec<f64>,
    /// Range-gate centres in metres.
    pub altitude: Vec<f64>,
    /// Backscatter, time-major (`[t * gates + h]`).
    pub backscatter: Vec<f64>,
    /// Quality flag, same shape as `backscatter`.
    pub qc_flag: Vec<f64>,
}

impl CeilometerFixture {
    /// A deterministic day: hourly profiles starting at 03:00 UTC, gates
    /// every 10 m, backscatter sweeping the decades of a log color scale,
    /// and `qc_flag` set to 3 on every gate-1 cell (1 elsewhere).
    pub fn synthetic(profiles: usize, gates: usize) -> Self {
        let time: Vec<f64> = (0..profiles).map(|t| (3 + t) as f64 * 3600.0).collect();
        let altitude: Vec<f64> = (0..gates).map(|h| (h + 1) as f64 * 10.0).collect();
        let mut backscatter = Vec::with_capacity(profiles * gates);
        let mut qc_flag = Vec::with_capacity(profiles * gates);
        for t in 0..profiles {
            for h in 0..gates {
                let decade = -7.0 + 3.0 * ((t + h) % 4) as f64 / 3.0;
                backscatter.push(10f64.powf(decade));
                qc_flag.push(if h == 1 { 3.0 } else { 1.0 });
            }
        }
        Self {
            time_units: "seconds since 2024-03-01 00:00:00".to_string(),
            time,
            altitude,
            backscatter,
            qc_flag,
        }
    }

    /// Write the fixture as a classic-format file, overwriting `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let gates = self.altitude.len();
        let mut builder = FileBuilder::new();
        builder.add_global_attribute("source", AttrValue::Text("synthetic fixture".to_string()));

        let time_dim = builder.add_unlimited_dimension("time")?;
        let alt_dim = builder.add_dimension("altitude", gates);

        let time = builder.add_variable("time", NcType::Double, &[time_dim])?;
        builder.add_text_attribute(time, "units", &self.time_units);
        builder.put_values(time, &self.time);

        let altitude = builder.add_variable("altitude", NcType::Float, &[alt_dim])?;
        builder.add_text_attribute(altitude, "units", "m");
        builder.put_values(altitude, &self.altitude);

        let backscatter = builder.add_variable(
            "attenuated_aerosol_backscatter_coefficient",
            NcType::Float,
            &[time_dim, alt_dim],
        )?;
        builder.add_text_attribute(backscatter, "units", "m-1 sr-1");
        builder.add_attribute(
            backscatter,
            "_FillValue",
            AttrValue::Floats(vec![FIXTURE_FILL as f32]),
        );
        builder.put_values(backscatter, &self.backscatter);

        let qc = builder.add_variable("qc_flag", NcType::Byte, &[time_dim, alt_dim])?;
        builder.put_values(qc, &self.qc_flag);

        builder.write_to(path)
    }
}
