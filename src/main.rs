use anyhow::Context;
use certforge::{BusyIndicator, GeneratorConfig};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Generate five certificate designs for a category
#[derive(Parser, Debug)]
#[command(name = "certforge", version, about)]
struct Cli {
    /// Category the certificates are awarded for
    category: String,

    /// Output directory for PNGs, draw listings and index.html
    #[arg(short, long, default_value = "certificates")]
    out: PathBuf,

    /// Assets root containing backgrounds/, textures/ and icons/
    #[arg(long, env = "CERTFORGE_ASSETS")]
    assets: Option<PathBuf>,

    /// Chat-completion endpoint
    #[arg(long, env = "CERTFORGE_ENDPOINT")]
    endpoint: Option<String>,

    /// Model identifier
    #[arg(long, env = "CERTFORGE_MODEL")]
    model: Option<String>,

    /// API key for the endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// HTTP timeout for the concept request
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seed for the geometric pattern
    #[arg(long)]
    seed: Option<u64>,

    /// Use the built-in fallback concepts without calling the endpoint
    #[arg(long)]
    offline: bool,
}

/// Prints progress to stderr
struct StderrBusy;

impl BusyIndicator for StderrBusy {
    fn show(&self) {
        eprintln!("Generating certificates...");
    }

    fn hide(&self) {
        eprintln!("Done.");
    }
}

fn config_from(cli: &Cli) -> GeneratorConfig {
    let mut cfg = GeneratorConfig::from_env();
    if let Some(assets) = &cli.assets {
        cfg.assets_root = assets.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        cfg.endpoint = endpoint.clone();
    }
    if let Some(model) = &cli.model {
        cfg.model = model.clone();
    }
    if cli.api_key.is_some() {
        cfg.api_key = cli.api_key.clone();
    }
    cfg.timeout_ms = cli.timeout_ms;
    cfg.pattern_seed = cli.seed;
    cfg.offline = cli.offline;
    cfg
}

async fn write_run(run: &certforge::GenerationRun, out: &Path) -> anyhow::Result<usize> {
    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("creating {}", out.display()))?;

    let mut written = 0;
    for cert in run.certificates() {
        let n = cert.slot() + 1;
        let png_path = out.join(format!("certificate-{}.png", n));
        tokio::fs::write(&png_path, cert.png_data()?)
            .await
            .with_context(|| format!("writing {}", png_path.display()))?;
        let txt_path = out.join(format!("certificate-{}.txt", n));
        tokio::fs::write(&txt_path, cert.listing())
            .await
            .with_context(|| format!("writing {}", txt_path.display()))?;
        log::info!("wrote {}", png_path.display());
        written += 1;
    }

    let index = out.join("index.html");
    tokio::fs::write(&index, certforge::gallery::render_html(run)?)
        .await
        .with_context(|| format!("writing {}", index.display()))?;
    Ok(written)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config_from(&cli);
    let run = certforge::generate_certificates(&cfg, &cli.category, &StderrBusy).await?;

    let written = write_run(&run, &cli.out).await?;
    if written == 0 {
        anyhow::bail!("no certificate could be rendered");
    }
    println!("{} certificates written to {}", written, cli.out.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::error!("{:#}", e);
        eprintln!("Failed to generate certificates. Please try again.");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certforge::{AssetCatalog, CertificateRenderer, FallbackConceptProvider, MemoryAssetSource, NoopBusyIndicator};
    use resvg::{tiny_skia, usvg};
    use std::sync::Arc;

    #[tokio::test]
    async fn write_run_saves_rendered_slots_and_gallery() {
        let mut bg = tiny_skia::Pixmap::new(2, 2).unwrap();
        bg.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        let assets = MemoryAssetSource::new().with("backgrounds/background1.png", bg.encode_png().unwrap());
        let renderer = CertificateRenderer::with_svg_options(
            Arc::new(AssetCatalog::standard()),
            assets,
            certforge::Viewport::default(),
            usvg::Options::default(),
        );
        let run = certforge::generate("Excellence", &FallbackConceptProvider, &renderer, &NoopBusyIndicator)
            .await
            .unwrap();

        let out = std::env::temp_dir().join(format!("certforge-write-run-{}", std::process::id()));
        let written = write_run(&run, &out).await.unwrap();

        assert_eq!(written, 1);
        assert!(out.join("certificate-1.png").is_file());
        assert!(out.join("certificate-1.txt").is_file());
        assert!(!out.join("certificate-2.png").exists());
        let html = std::fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("data:image/png;base64,"));
        let _ = std::fs::remove_dir_all(&out);
    }
}
