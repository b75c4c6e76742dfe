//! Drives the studio shell from the terminal.
//!
//! Run with: `cargo run --example transform_portrait -- <photo> [style]`
//!
//! `style` is one of "Business Formal", "Smart Casual", "Creative Studio";
//! omit it to run the Startup Persona variant instead.
//!
//! Requires `API_KEY` or `GOOGLE_API_KEY` environment variable.

use anyhow::{bail, Context};
use portrait_studio::shell::{Event, Phase, ShellRuntime};
use portrait_studio::{GeminiTransformer, Transformer, Variant};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("portrait_studio=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let photo = args
        .next()
        .context("Usage: transform_portrait <photo> [style]")?;
    let style = args.next();

    let transformer = Arc::new(GeminiTransformer::builder().build());
    if let Err(e) = transformer.health_check().await {
        eprintln!("warning: health check failed: {e}");
    }

    let variant = if style.is_some() {
        Variant::PortraitStudio
    } else {
        Variant::StartupPersona
    };
    let mut runtime = ShellRuntime::new(variant, transformer);

    if let Some(style) = style {
        runtime.dispatch(Event::SelectStyleName(style.clone()));
        if let Some(notice) = runtime.shell().notice() {
            bail!("{notice} ({style:?})");
        }
    }
    runtime.upload_file(&photo).await;
    if variant == Variant::PortraitStudio {
        runtime.dispatch(Event::Transform);
    }

    let view = runtime.shell().view();
    if let Some(progress) = view.progress {
        println!("{} {}", progress.title, progress.detail);
    }

    let phase = runtime.settle().await;
    let view = runtime.shell().view();
    match (phase, view.download) {
        (Phase::Done, Some(download)) => {
            let path = download.save_to(".").await?;
            println!(
                "Saved {} ({} bytes, {})",
                path.display(),
                download.payload.size(),
                download.payload.media_type
            );
            Ok(())
        }
        _ => bail!(
            "{}",
            view.error_banner
                .unwrap_or_else(|| format!("transform did not finish ({phase:?})"))
        ),
    }
}
