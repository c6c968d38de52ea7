use anyhow::{Context, Result};
use tracing::info;
use vre_yield::config::Config;
use vre_yield::simulation::{
    IrradianceTransposer, PvYieldCalculator, WindAdapterFrame, WindYieldCalculator,
};
use vre_yield::telemetry::init_tracing;
use vre_yield::weather::{FileCache, PvgisClient, TmyRepository};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;
    let (lat, lon) = (cfg.site.latitude, cfg.site.longitude);

    let client = PvgisClient::new(&cfg.pvgis).context("building PVGIS client")?;
    let mut repository = TmyRepository::new(client, FileCache::new(&cfg.cache.path));
    let tmy = repository
        .fetch_or_cached(lat, lon)
        .await
        .with_context(|| format!("obtaining TMY for lat={lat}, lon={lon}"))?;

    let mut asset = cfg.pv.asset().context("building PV asset")?;
    let pv = PvYieldCalculator::new(IrradianceTransposer::new(cfg.pv.albedo));
    let totals = pv
        .power(&mut asset, &tmy)
        .context("computing PV power")?
        .totals();
    info!(
        yearly_wh = totals.yearly,
        max_weekly_wh = totals.max_weekly,
        "PV yield"
    );

    let frame = WindAdapterFrame::prepare(&tmy, cfg.wind.roughness_length)
        .context("preparing wind data")?;
    let wind = WindYieldCalculator::new(cfg.wind.turbine, cfg.wind.model_chain)
        .context("configuring turbine")?;
    let summary = wind.summarize(&frame).context("running turbine model chain")?;
    info!(
        mean_wind_speed = summary.mean_wind_speed,
        hub_height = summary.hub_height,
        mean_hub_wind_speed = summary.mean_hub_wind_speed,
        full_load_hours = summary.full_load_hours,
        "done"
    );

    Ok(())
}
