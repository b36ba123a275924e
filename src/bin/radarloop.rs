use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "radarloop", version)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an animated GIF from a local mirror of the radar archive.
    Build(BuildArgs),
    /// Print the sweeps a build would use, oldest first.
    Select(SelectArgs),
    /// Serve a freshly built GIF on every `GET /` until SIGINT/SIGTERM.
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Output GIF path.
    #[arg(long, default_value = "radar_loop.gif")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Address to listen on.
    #[arg(long, default_value = radarloop::DEFAULT_SERVE_ADDR)]
    addr: String,
}

#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// Root of the local mirror (contains e.g. `anon/gen/radar`).
    #[arg(long)]
    root: PathBuf,

    /// Build config JSON. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overlay product id (e.g. IDR713).
    #[arg(long)]
    overlay_product: Option<String>,

    /// Sweep product id (e.g. IDR71B).
    #[arg(long)]
    sweep_product: Option<String>,

    /// Number of most recent sweeps to animate.
    #[arg(long)]
    frames: Option<usize>,

    /// Per-frame delay in hundredths of a second.
    #[arg(long)]
    delay_cs: Option<u16>,

    /// GIF loop count (0 loops forever).
    #[arg(long)]
    loop_count: Option<u16>,

    /// Log listings and selections at info level.
    #[arg(long)]
    verbose: bool,

    /// Write intermediate PNGs and the GIF into this directory.
    #[arg(long)]
    stage_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SelectArgs {
    /// Root of the local mirror.
    #[arg(long)]
    root: PathBuf,

    /// Sweep product id (e.g. IDR71B).
    #[arg(long)]
    sweep_product: String,

    /// Sweep directory relative to the root.
    #[arg(long, default_value = radarloop::DEFAULT_SWEEP_DIR)]
    sweep_dir: String,

    /// Number of most recent sweeps to keep.
    #[arg(long, default_value_t = radarloop::DEFAULT_FRAME_COUNT)]
    frames: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Select(args) => cmd_select(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve_config(args: &ConfigArgs) -> anyhow::Result<radarloop::BuildConfig> {
    let mut cfg = match &args.config {
        Some(path) => radarloop::BuildConfig::from_path(path)?,
        None => {
            let overlay = args
                .overlay_product
                .clone()
                .context("--overlay-product is required without --config")?;
            let sweep = args
                .sweep_product
                .clone()
                .context("--sweep-product is required without --config")?;
            radarloop::BuildConfig::new(overlay, sweep)
        }
    };

    if let Some(p) = &args.overlay_product {
        cfg.overlay_product = p.clone();
    }
    if let Some(p) = &args.sweep_product {
        cfg.sweep_product = p.clone();
    }
    if let Some(n) = args.frames {
        cfg.frame_count = n;
    }
    if let Some(d) = args.delay_cs {
        cfg.frame_delay_cs = d;
    }
    if let Some(l) = args.loop_count {
        cfg.loop_count = radarloop::LoopCount::from(l);
    }
    if args.verbose {
        cfg.verbose = true;
    }
    if let Some(dir) = &args.stage_dir {
        cfg.stage_intermediates = true;
        cfg.staging_dir = Some(dir.clone());
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.cfg)?;

    let mut source = radarloop::DirSource::new(&args.cfg.root);
    let out = match &cfg.staging_dir {
        Some(dir) if cfg.stage_intermediates => {
            let mut staging = radarloop::DirStagingSink::new(dir);
            radarloop::build_animation(&cfg, &mut source, &mut staging)?
        }
        _ => radarloop::build_animation(&cfg, &mut source, &mut radarloop::NullStaging)?,
    };

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &out.gif)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    tracing::info!(
        path = %args.out.display(),
        frames = out.sweeps.len(),
        bounds = %out.bounds,
        "wrote radar loop"
    );
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let cfg = radarloop::ServeConfig {
        root: args.cfg.root.clone(),
        build: resolve_config(&args.cfg)?,
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")?;
    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(&args.addr)
            .await
            .with_context(|| format!("bind '{}'", args.addr))?;
        radarloop::serve(listener, cfg, radarloop::shutdown_signal()).await?;
        Ok::<(), anyhow::Error>(())
    })
}

fn cmd_select(args: SelectArgs) -> anyhow::Result<()> {
    use radarloop::AssetSource as _;

    let mut source = radarloop::DirSource::new(&args.root);
    let names = source.list_names(&args.sweep_dir)?;
    let picked = radarloop::select_sweeps(&names, &args.sweep_product, args.frames);
    if picked.is_empty() {
        anyhow::bail!(
            "no sweeps matching '{}' in '{}'",
            args.sweep_product,
            args.sweep_dir
        );
    }
    for name in picked {
        println!("{name}");
    }
    Ok(())
}
