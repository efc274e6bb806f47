#[cfg(feature = "cdp")]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;
    use frameshot::{export, CdpHost, HostConfig, Session, SettleConfig};

    /// Capture an embedded frame from a rendered page and export it as a PNG.
    #[derive(Parser)]
    #[command(name = "frameshot", version)]
    pub struct Args {
        /// Page URL to load
        url: String,

        /// Ordinal of the frame to capture; omit to just list frames
        #[arg(long)]
        frame: Option<usize>,

        /// Directory the exported PNG is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Print the frame listing as JSON
        #[arg(long)]
        json: bool,

        /// Page load timeout in milliseconds
        #[arg(long, default_value_t = 8000)]
        timeout_ms: u64,
    }

    pub async fn run() -> anyhow::Result<()> {
        let args = Args::parse();

        let mut host = CdpHost::new(HostConfig {
            timeout_ms: args.timeout_ms,
            ..Default::default()
        })?;
        host.load_url(&args.url)?;

        let session = Session::new(host, SettleConfig::default());
        let frames = session.frames().await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&frames)?);
        } else {
            for frame in &frames {
                println!(
                    "{}: {}",
                    frame.ordinal,
                    frame.source.as_deref().unwrap_or("(no source)")
                );
            }
        }

        if let Some(ordinal) = args.frame {
            let source = frames
                .iter()
                .find(|f| f.ordinal == ordinal)
                .and_then(|f| f.source.clone());
            let image = session.capture(ordinal).await?;
            let filename =
                export::export_filename(ordinal, source.as_deref(), chrono::Local::now());
            let path = export::save(&args.out, &filename, &image)?;
            println!(
                "saved {}x{} capture to {}",
                image.width,
                image.height,
                path.display()
            );
        }

        session.teardown().await;
        Ok(())
    }
}

#[cfg(feature = "cdp")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}

#[cfg(not(feature = "cdp"))]
fn main() {
    eprintln!("frameshot: built without the `cdp` feature; rebuild with `--features cdp`");
    std::process::exit(1);
}
