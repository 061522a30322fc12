//! `glowfield-preview`: the particle background and cursor glow in a native
//! window.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;
    use glowfield::config::SiteConfig;
    use glowfield::error::PreviewError;
    use glowfield::preview::{self, PreviewOptions};

    #[derive(Parser, Debug)]
    #[command(name = "glowfield-preview", version, about = "Preview the site background in a window")]
    pub struct Args {
        /// JSON config file. Values it leaves out keep the site defaults.
        #[arg(short, long, value_name = "FILE")]
        pub config: Option<PathBuf>,

        /// Window width in logical px.
        #[arg(long, default_value_t = 1280)]
        pub width: u32,

        /// Window height in logical px.
        #[arg(long, default_value_t = 720)]
        pub height: u32,

        /// Seed for the particle layout.
        #[arg(long)]
        pub seed: Option<u64>,

        /// Draw a row of hover targets for the cursor glow.
        #[arg(long)]
        pub hotspots: bool,

        /// Run this many frames without a window and print a summary.
        #[arg(long, value_name = "FRAMES")]
        pub headless: Option<u64>,
    }

    pub fn run(args: Args) -> Result<(), PreviewError> {
        let config = match &args.config {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                SiteConfig::load(path)?
            }
            None => SiteConfig::default(),
        };
        let options = PreviewOptions {
            config,
            width: args.width,
            height: args.height,
            seed: args.seed,
            hotspots: args.hotspots,
        };

        if let Some(frames) = args.headless {
            let report = preview::run_headless(&options, frames);
            println!(
                "{} frames, {} particles, {} links, {} vertices",
                report.frames, report.particles, report.links, report.vertices
            );
            return Ok(());
        }
        preview::run(options)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    if let Err(e) = cli::run(cli::Args::parse()) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// The browser build starts from `glowfield::web::mount` instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
