use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dbthumb::application::{ThumbnailPlugin, ThumbnailPorts};
use dbthumb::domain::entities::{EntityId, EntityInfo, SourceImageId};
use dbthumb::infrastructure::{
    AppConfig, CliArgs, Command, FileArtifactStore, ImageCrateRenderer, InMemoryHost,
    MetadataArtifactStore, StorageManager, TomlOptionStore,
};

/// Entity the `render` command attaches the image to.
const SCRATCH_ENTITY: EntityId = EntityId(1);
const SCRATCH_IMAGE: SourceImageId = SourceImageId(1);

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_ports(config: &AppConfig, host: &Arc<InMemoryHost>) -> Result<ThumbnailPorts> {
    let state_path = config
        .effective_state_path()
        .ok_or_else(|| eyre!("cannot determine options file, pass --state-path"))?;
    let cache_dir = config
        .effective_cache_dir()
        .ok_or_else(|| eyre!("cannot determine cache directory, pass --cache-dir"))?;

    Ok(ThumbnailPorts {
        entities: host.clone(),
        meta: host.clone(),
        options: Arc::new(TomlOptionStore::open(state_path)?),
        renderer: Arc::new(ImageCrateRenderer::new()),
        metadata_store: Arc::new(MetadataArtifactStore::new(host.clone())),
        file_store: Arc::new(FileArtifactStore::new(cache_dir)),
    })
}

async fn render(plugin: &ThumbnailPlugin, host: &InMemoryHost, image: &Path) -> Result<()> {
    host.insert_entity(EntityInfo::new(SCRATCH_ENTITY, "post"));
    host.attach(SCRATCH_IMAGE, image);
    host.assign_source_image(SCRATCH_ENTITY, Some(SCRATCH_IMAGE));

    plugin
        .service()
        .on_source_image_changed(SCRATCH_ENTITY, true)
        .await?;

    let data_uri = plugin
        .get_thumbnail(SCRATCH_ENTITY)
        .await
        .ok_or_else(|| eyre!("no thumbnail was stored for {}", image.display()))?;
    let stored = plugin
        .service()
        .store()
        .get(SCRATCH_ENTITY)
        .await
        .map_or(0, |payload| payload.len());
    let color = plugin.get_color(SCRATCH_ENTITY).await;

    println!("{data_uri}");
    println!("data uri: {} bytes", data_uri.len());
    println!("stored:   {stored} bytes ({})", plugin.service().store().backend());
    if !color.is_empty() {
        println!("color:    {color}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = dbthumb::VERSION, "Starting {}", dbthumb::NAME);

    let host = Arc::new(InMemoryHost::new());
    let ports = create_ports(&config, &host)?;
    let plugin = ThumbnailPlugin::new(config.thumbnail.clone(), ports).await?;

    match &args.command {
        Command::Render { image } => render(&plugin, &host, image).await?,
        Command::Check => {
            let outcome = plugin.service().initialization();
            println!("fingerprint: {}", outcome.fingerprint);
            if outcome.invalidated {
                println!("settings changed, cache invalidated");
            } else {
                println!("settings unchanged");
            }
        }
        Command::ClearCache => {
            let removed = plugin.clear_cache().await?;
            println!("removed {removed} cached thumbnails");
        }
        Command::Uninstall => {
            plugin.uninstall().await?;
            println!("uninstalled");
        }
    }

    Ok(())
}
