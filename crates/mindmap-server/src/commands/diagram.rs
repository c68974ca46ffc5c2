use anyhow::{Context as _, Result};
use mindmap_core::outline::Outline;
use mindmap_diagram::{DiagramExporter, DiagramRenderer, DiagramSurface};
use std::path::{Path, PathBuf};

use super::Context;

fn render_file(context: &Context, outline_path: &Path) -> Result<DiagramSurface> {
    let text = std::fs::read_to_string(outline_path)
        .with_context(|| format!("Failed to read {}", outline_path.display()))?;
    let renderer = DiagramRenderer::from_config(&context.config.render);
    let mut surface = DiagramSurface::from_config(&context.config.render);
    renderer.render(&mut surface, &Outline::from_markdown(text))?;
    Ok(surface)
}

pub fn render(context: Context, outline_path: &Path, out: &Path) -> Result<()> {
    let surface = render_file(&context, outline_path)?;
    let svg = surface
        .standalone_svg()
        .context("Nothing was drawn")?;
    std::fs::write(out, svg).with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}

pub fn export(context: Context, outline_path: &Path, out: Option<&Path>) -> Result<()> {
    let surface = render_file(&context, outline_path)?;
    let exporter = DiagramExporter::new(context.config.export.clone());
    let image = exporter.export_raster(&surface)?;

    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&image.file_name));
    std::fs::write(&out, &image.bytes)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {} ({}x{})", out.display(), image.width, image.height);
    Ok(())
}
