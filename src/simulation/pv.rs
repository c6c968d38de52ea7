use tracing::{debug, info};

use super::solar::PoaTransposer;
use crate::domain::{columns, HourlySeries, PvAsset, TmyDataset};
use crate::error::Result;

/// Linear PV model: `power = poa × efficiency × area`.
///
/// Provisional. No temperature derating, inverter losses or shading.
pub struct PvYieldCalculator<T> {
    transposer: T,
}

impl<T: PoaTransposer> PvYieldCalculator<T> {
    pub fn new(transposer: T) -> Self {
        Self { transposer }
    }

    /// Plane-of-array irradiance for the asset's orientation.
    ///
    /// A `POA` column already present in the frame wins and the transposer is
    /// not called.
    pub fn poa(&self, asset: &PvAsset, tmy: &TmyDataset) -> Result<HourlySeries> {
        if tmy.frame.has_column(columns::POA) {
            debug!("using upstream POA column");
            return tmy.frame.series(columns::POA);
        }
        self.transposer.transpose(tmy, asset.tilt, asset.azimuth)
    }

    /// Hourly power (W) on the asset's target calendar. Fills `asset.poa` and
    /// `asset.power`.
    pub fn power(&self, asset: &mut PvAsset, tmy: &TmyDataset) -> Result<HourlySeries> {
        let poa = self.poa(asset, tmy)?;
        let factor = asset.efficiency * asset.area;
        let power = poa.map(|irradiance| irradiance * factor).reindex(asset.state.clone())?;

        info!(
            tilt = asset.tilt,
            azimuth = asset.azimuth,
            yearly_wh = power.sum(),
            "PV power computed"
        );

        asset.poa = Some(poa);
        asset.power = Some(power.clone());
        Ok(power)
    }
}
