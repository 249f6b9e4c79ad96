use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use printstudio::editor::Command;
use printstudio::{library, rendering, DesignDocument, DesignType, Studio, StudioConfig};

#[derive(Debug, Parser)]
#[command(name = "printstudio", about = "Prompt-to-print layout generator and design server", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Run the REST API over the designs directory
    Serve {
        #[arg(long, value_name = "host:port")]
        bind: Option<String>,
        #[arg(long, value_name = "dir")]
        designs_dir: Option<PathBuf>,
    },
    /// Generate a design from a prompt and print it as JSON
    Generate {
        /// business-card, flyer or door-hanger
        #[arg(long = "type", short = 't', default_value = "business-card")]
        design_type: DesignType,
        /// Skip the simulated generation delay
        #[arg(long)]
        no_delay: bool,
        /// Also save the design to the store
        #[arg(long)]
        save: bool,
        /// Write JSON here instead of stdout
        #[arg(long, short, value_name = "path")]
        out: Option<PathBuf>,
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Render a design JSON file to PNG
    Render {
        input: PathBuf,
        #[arg(long, short, value_name = "path")]
        out: Option<PathBuf>,
        /// Render at preview size instead of print resolution
        #[arg(long)]
        preview: bool,
        /// Outline this element (preview only)
        #[arg(long, value_name = "id")]
        select: Option<String>,
    },
    /// Print the library thumbnail of a design JSON file as a data URL
    Thumbnail { input: PathBuf },
    /// List saved designs
    Library {
        #[arg(long, value_name = "dir")]
        designs_dir: Option<PathBuf>,
        /// Print entries (with thumbnails) as JSON
        #[arg(long)]
        json: bool,
    },
}

fn read_design(path: &Path) -> anyhow::Result<DesignDocument> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing design {:?}", path))
}

#[cfg(feature = "server")]
fn serve(config: &StudioConfig) -> anyhow::Result<()> {
    let store = printstudio::store::FileStore::open(&config.designs_dir)?;
    let server = printstudio::server::DesignServer::bind(&config.bind_addr, store)?;
    server.serve();
    Ok(())
}

#[cfg(not(feature = "server"))]
fn serve(_config: &StudioConfig) -> anyhow::Result<()> {
    bail!("built without the `server` feature")
}

async fn generate(config: StudioConfig, prompt: String, design_type: DesignType, save: bool) -> anyhow::Result<DesignDocument> {
    let studio = Studio::new(Some(config)).await?;
    let mut doc = studio.generate(&prompt, design_type).await?;
    if save {
        let session = studio.dispatch(Command::SaveRequested).await?;
        if let Some(notice) = &session.notice {
            log::info!("{}", notice.message());
        }
        if let Some(saved) = session.document() {
            doc = saved.clone();
        }
    }
    studio.close().await?;
    Ok(doc)
}

async fn list_library(config: StudioConfig) -> anyhow::Result<Vec<library::LibraryEntry>> {
    let studio = Studio::new(Some(config)).await?;
    let entries = studio.library().await?;
    studio.close().await?;
    Ok(entries)
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating Tokio runtime")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = StudioConfig::from_env()?;
    if let Some(filter) = cli.log {
        config.log_filter = filter;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter.as_str()))
        .format_timestamp_millis()
        .init();

    match cli.command {
        Cmd::Serve { bind, designs_dir } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(dir) = designs_dir {
                config.designs_dir = dir;
            }
            serve(&config)
        }
        Cmd::Generate { design_type, no_delay, save, out, prompt } => {
            if no_delay {
                config.generation_delay_ms = 0;
            }
            let doc = runtime()?.block_on(generate(config, prompt.join(" "), design_type, save))?;
            let json = serde_json::to_string_pretty(&doc)?;
            match out {
                Some(path) => std::fs::write(&path, json).with_context(|| format!("writing {:?}", path))?,
                None => println!("{}", json),
            }
            Ok(())
        }
        Cmd::Render { input, out, preview, select } => {
            let doc = read_design(&input)?;
            if select.is_some() && !preview {
                bail!("--select only applies to --preview renders");
            }
            let image = if preview {
                rendering::render_preview(&doc, select.as_deref())?
            } else {
                rendering::export_png(&doc)?
            };
            let path = out.unwrap_or_else(|| PathBuf::from(doc.export_file_name(chrono::Utc::now())));
            std::fs::write(&path, &image.png_data).with_context(|| format!("writing {:?}", path))?;
            log::info!("wrote {}x{} PNG to {:?}", image.width, image.height, path);
            Ok(())
        }
        Cmd::Thumbnail { input } => {
            let doc = read_design(&input)?;
            println!("{}", library::thumbnail_data_url(&doc)?);
            Ok(())
        }
        Cmd::Library { designs_dir, json } => {
            if let Some(dir) = designs_dir {
                config.designs_dir = dir;
            }
            let entries = runtime()?.block_on(list_library(config))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            println!("{}", library::summary(entries.len()));
            for entry in &entries {
                let mut line = format!(
                    "{}  {:<13}  {}",
                    entry.id,
                    entry.type_label,
                    entry.company_name.as_deref().unwrap_or("-")
                );
                if let Some(created) = &entry.created {
                    line.push_str(&format!("  created {}", created));
                }
                if let Some(updated) = &entry.updated {
                    line.push_str(&format!("  updated {}", updated));
                }
                println!("{}", line);
            }
            Ok(())
        }
    }
}
