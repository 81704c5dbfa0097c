/// Filter demo
/// Renders every built-in filter at a few amounts over a generated test pattern
use image::{Rgba, RgbaImage};
use image_filter::{DisplayableImage, FilterKind, FilterSpec, SourceImage, apply_filter};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img = RgbaImage::from_fn(320, 240, |x, y| {
        let r = (x * 255 / 320) as u8;
        let g = (y * 255 / 240) as u8;
        let b = if (x / 20 + y / 20) % 2 == 0 { 220 } else { 40 };
        Rgba([r, g, b, 255])
    });
    let source = SourceImage::from_rgba(img)?;

    for kind in FilterKind::all() {
        for amount in [0.25, 0.5, 1.0] {
            let rendered = apply_filter(&source, &FilterSpec::new(kind.to_string(), amount))?;
            let extent = rendered.extent();

            let filename = format!("{kind}_{:03}.png", (amount * 100.0) as u32);
            DisplayableImage::from(rendered).save_png(output_dir.join(&filename))?;
            println!(
                "✓ Generated {filename} ({}x{} at {}, {})",
                extent.width, extent.height, extent.x, extent.y
            );
        }
    }

    println!("\n✓ All filters applied successfully!");
    println!("  Images saved to: tmp/");

    Ok(())
}
