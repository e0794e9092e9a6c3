//! Show command implementation for the Trailside CLI.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::{Coord, Rect};
use geojson::FeatureCollection;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use trailside_core::config::Configuration;
use trailside_core::identity::IdentityContext;
use trailside_core::map::{MapContext, MemoryMapSurface};
use trailside_core::overlay::{TRAIL_PATH_SOURCE_ID, TrailLayerController};
use trailside_core::sdk::{
    AccessProvider, SdkInitEvent, SdkInitRequest, StaticAccessProvider, initialize_sdk,
};
use trailside_core::{DistanceRadius, QueryLimit, TrailSearchCriteria, TrailService};
use trailside_data::{CatalogueSdk, CatalogueTrailService, MetadataFile};

use crate::{
    ARG_ACCESS_TOKEN, ARG_CATALOGUE, ARG_FROM_CACHE, ARG_LATITUDE, ARG_LIMIT, ARG_LONGITUDE,
    ARG_METADATA, ARG_NAME, ARG_OUTPUT, ARG_RADIUS_KM, ARG_SDK_DIR, ARG_USER_ID, CliError,
    ENV_CATALOGUE, ENV_METADATA,
};

/// Search centre latitude used when none is configured (Denver, Colorado).
pub(crate) const DEFAULT_LATITUDE: f64 = 39.7392;
/// Search centre longitude used when none is configured.
pub(crate) const DEFAULT_LONGITUDE: f64 = -104.9903;
pub(crate) const DEFAULT_RADIUS_KM: f64 = 100.0;
pub(crate) const DEFAULT_LIMIT: u32 = 1000;

const METRES_PER_KM: f64 = 1000.0;

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve the SDK configuration from a host metadata file, \
                 initialize the SDK from an offline trail catalogue, search \
                 for trails around a centre point and draw them as a \
                 difficulty-coloured overlay on a headless map. The overlay \
                 can also be filled from the SDK's cached trail snapshot.",
    about = "Show trails around a point on a headless map"
)]
#[ortho_config(prefix = "TRAILSIDE")]
pub(crate) struct ShowArgs {
    /// Path to the JSON host metadata file holding the SDK keys.
    #[arg(long = ARG_METADATA, value_name = "path")]
    #[serde(default)]
    pub(crate) metadata: Option<Utf8PathBuf>,
    /// Path to the offline trail catalogue.
    #[arg(long = ARG_CATALOGUE, value_name = "path")]
    #[serde(default)]
    pub(crate) catalogue: Option<Utf8PathBuf>,
    /// SDK library directory containing the cached trail snapshot.
    #[arg(long = ARG_SDK_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) sdk_dir: Option<Utf8PathBuf>,
    /// Search centre latitude in degrees (default 39.7392).
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Search centre longitude in degrees (default -104.9903).
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Search radius in kilometres (default 100).
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Maximum number of trails to show (default 1000).
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<u32>,
    /// Only show trails whose name contains this text.
    #[arg(long = ARG_NAME, value_name = "text")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Fill the overlay from the SDK cache instead of searching.
    #[arg(
        long = ARG_FROM_CACHE,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) from_cache: Option<bool>,
    /// User id reported to the SDK.
    #[arg(long = ARG_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// Access token handed to the SDK; anonymous when unset.
    #[arg(long = ARG_ACCESS_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    /// Write the overlay GeoJSON to this path.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ShowArgs {
    pub(crate) fn into_config(self) -> Result<ShowConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShowConfig::try_from(merged)
    }
}

/// Where the overlay contents come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OverlaySource {
    /// Search the trail service around the centre.
    Search,
    /// Load the SDK's cached snapshot of every trail path.
    SdkCache,
}

/// Resolved `show` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShowConfig {
    pub(crate) metadata: Utf8PathBuf,
    pub(crate) catalogue: Utf8PathBuf,
    pub(crate) sdk_dir: Option<Utf8PathBuf>,
    pub(crate) criteria: TrailSearchCriteria,
    pub(crate) source: OverlaySource,
    pub(crate) user_id: Option<String>,
    pub(crate) access_token: Option<String>,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<ShowArgs> for ShowConfig {
    type Error = CliError;

    fn try_from(args: ShowArgs) -> Result<Self, Self::Error> {
        let metadata = args.metadata.ok_or(CliError::MissingArgument {
            field: ARG_METADATA,
            env: ENV_METADATA,
        })?;
        let catalogue = args.catalogue.ok_or(CliError::MissingArgument {
            field: ARG_CATALOGUE,
            env: ENV_CATALOGUE,
        })?;

        let centre = Coord {
            x: args.longitude.unwrap_or(DEFAULT_LONGITUDE),
            y: args.latitude.unwrap_or(DEFAULT_LATITUDE),
        };
        let radius =
            DistanceRadius::from_metres(args.radius_km.unwrap_or(DEFAULT_RADIUS_KM) * METRES_PER_KM)?;
        let limit = QueryLimit::new(args.limit.unwrap_or(DEFAULT_LIMIT))?;
        let mut criteria = TrailSearchCriteria::new(centre, radius, limit)?;
        if let Some(name) = args.name {
            criteria = criteria.with_name(name);
        }

        let source = if args.from_cache.unwrap_or(false) {
            OverlaySource::SdkCache
        } else {
            OverlaySource::Search
        };

        Ok(Self {
            metadata,
            catalogue,
            sdk_dir: args.sdk_dir,
            criteria,
            source,
            user_id: args.user_id,
            access_token: args.access_token,
            output: args.output,
        })
    }
}

/// How the overlay was filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Population {
    /// From a search that found this many trails.
    Searched { found: usize },
    /// From the SDK cache snapshot.
    Cached,
    /// The cache snapshot was requested but not available.
    CacheUnavailable,
}

/// What the overlay looks like once the command has run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShowSummary {
    pub(crate) population: Population,
    pub(crate) overlay: FeatureCollection,
    pub(crate) rendered_lines: usize,
    pub(crate) colours: BTreeMap<String, usize>,
    pub(crate) bounds: Option<Rect<f64>>,
}

impl ShowSummary {
    fn new(population: Population, surface: &MemoryMapSurface) -> Self {
        let lines = surface.rendered_lines();
        let mut colours = BTreeMap::new();
        for line in &lines {
            *colours.entry(line.color.to_hex()).or_insert(0) += 1;
        }
        let overlay = surface
            .source(TRAIL_PATH_SOURCE_ID)
            .cloned()
            .unwrap_or_else(empty_collection);
        Self {
            population,
            overlay,
            rendered_lines: lines.len(),
            colours,
            bounds: surface.source_bounds(TRAIL_PATH_SOURCE_ID),
        }
    }
}

pub(super) fn run_show(args: ShowArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_show_with(args, &mut stdout)
}

pub(super) fn run_show_with(args: ShowArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_show(&config)?;
    if let Some(path) = &config.output {
        write_overlay(path, &summary.overlay)?;
    }
    write_summary(writer, &summary)
}

pub(super) fn execute_show(config: &ShowConfig) -> Result<ShowSummary, CliError> {
    let metadata = MetadataFile::load(&config.metadata)?;
    let sdk_config = Configuration::resolve(&metadata)?;
    log::debug!(
        "SDK configured: map style {}, web service {}",
        sdk_config.map_style.style_url,
        sdk_config.endpoints.ws_url
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(show_trails(config, sdk_config))
}

async fn show_trails(
    config: &ShowConfig,
    sdk_config: Configuration,
) -> Result<ShowSummary, CliError> {
    let catalogue_service = Arc::new(CatalogueTrailService::new());
    initialize_catalogue(config, sdk_config, &catalogue_service).await?;

    let service: Arc<dyn TrailService> = catalogue_service;
    let (context, map) = MapContext::new(MemoryMapSurface::new());
    let mut controller = TrailLayerController::new(map, Arc::clone(&service));
    if let Some(dir) = &config.sdk_dir {
        controller = controller.with_sdk_library_dir(dir.clone());
    }

    let work = async move {
        let population = populate(&controller, service.as_ref(), config).await;
        // The map context stops once its last handle is gone.
        drop(controller);
        population
    };
    let (surface, population) = tokio::join!(context.run(), work);
    let summary = ShowSummary::new(population?, &surface);
    log::info!(
        "trail overlay ready: {} features, {} lines drawn",
        summary.overlay.features.len(),
        summary.rendered_lines
    );
    Ok(summary)
}

async fn initialize_catalogue(
    config: &ShowConfig,
    sdk_config: Configuration,
    service: &Arc<CatalogueTrailService>,
) -> Result<(), CliError> {
    if is_first_initialization(config.sdk_dir.as_deref()) {
        log::info!("first SDK initialization can take a while");
    }

    let identity = IdentityContext::new();
    identity.set_user_id(config.user_id.clone());
    let access: Arc<dyn AccessProvider> = match &config.access_token {
        Some(token) => Arc::new(StaticAccessProvider::new(token.clone())),
        None => Arc::new(StaticAccessProvider::anonymous()),
    };
    let request = SdkInitRequest {
        config: sdk_config,
        access,
        identity,
    };

    let backend = CatalogueSdk::new(config.catalogue.clone(), Arc::clone(service));
    let mut task = initialize_sdk(backend, request);
    while let Some(event) = task.next_event().await {
        match event {
            SdkInitEvent::Progress(percent) => log::info!("SDK initialization {percent}%"),
            SdkInitEvent::Completed => log::info!("SDK initialized"),
            SdkInitEvent::Failed(reason) => log::warn!(
                "SDK initialization failed: {}",
                reason.as_deref().unwrap_or("no reason given")
            ),
        }
    }
    task.wait().await?;
    Ok(())
}

pub(crate) fn is_first_initialization(sdk_dir: Option<&Utf8Path>) -> bool {
    let Some(dir) = sdk_dir else {
        return true;
    };
    match trailside_fs::is_dir(dir) {
        Ok(exists) => !exists,
        Err(err) => {
            log::warn!("cannot inspect SDK directory {dir}: {err}");
            true
        }
    }
}

async fn populate(
    controller: &TrailLayerController<MemoryMapSurface>,
    service: &dyn TrailService,
    config: &ShowConfig,
) -> Result<Population, CliError> {
    controller.add_to_map().await?;
    match config.source {
        OverlaySource::Search => {
            let trails = service.find_trails(&config.criteria).await?;
            log::info!("found {} trails", trails.len());
            controller.show_trails_from_features(&trails).await?;
            Ok(Population::Searched {
                found: trails.len(),
            })
        }
        OverlaySource::SdkCache => {
            if controller.show_all_trails_from_sdk_cache().await? {
                Ok(Population::Cached)
            } else {
                Ok(Population::CacheUnavailable)
            }
        }
    }
}

fn write_overlay(path: &Utf8Path, overlay: &FeatureCollection) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(overlay).map_err(CliError::SerializeOverlay)?;
    trailside_fs::write_string(path, &payload).map_err(|source| CliError::WriteOverlay {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("trail overlay written to {path}");
    Ok(())
}

pub(super) fn render_summary(summary: &ShowSummary) -> String {
    let mut lines = vec![match summary.population {
        Population::Searched { found } => format!("source: search ({found} trails found)"),
        Population::Cached => "source: SDK cache".to_owned(),
        Population::CacheUnavailable => "source: SDK cache (unavailable)".to_owned(),
    }];
    lines.push(format!("features: {}", summary.overlay.features.len()));
    lines.push(format!("lines drawn: {}", summary.rendered_lines));
    lines.extend(
        summary
            .colours
            .iter()
            .map(|(colour, count)| format!("colour {colour}: {count}")),
    );
    if let Some(bounds) = summary.bounds {
        lines.push(format!(
            "bounds: {:.4},{:.4} to {:.4},{:.4}",
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y
        ));
    }
    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

fn write_summary(writer: &mut dyn Write, summary: &ShowSummary) -> Result<(), CliError> {
    writer
        .write_all(render_summary(summary).as_bytes())
        .map_err(CliError::WriteSummary)
}

fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}
