use ab_glyph::FontArc;
use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageFormat, Rgba};
use imageproc::drawing::draw_text_mut;

use crate::annotation::{Annotation, Point};

/// Burns the annotation text into a copy of the diagram at its natural
/// resolution. Stored positions are canvas display coordinates, so they are
/// mapped back through the scale the canvas was showing when exporting.
pub fn flatten(
    image: &DynamicImage,
    annotations: &[Annotation],
    scale: f32,
    font: &FontArc,
) -> Result<DynamicImage> {
    if scale <= 0.0 {
        return Err(anyhow!("cannot export with a non-positive scale"));
    }

    let mut output = image.to_rgba8();

    for annotation in annotations {
        let (x, y) = to_image_coords(annotation.pos, scale);
        let [r, g, b] = annotation.color.0;
        draw_text_mut(
            &mut output,
            Rgba([r, g, b, 255]),
            x,
            y,
            annotation.font_size.points() / scale,
            font,
            &annotation.text,
        );
    }

    Ok(DynamicImage::ImageRgba8(output))
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context("cannot encode PNG")?;
    Ok(buffer.into_inner())
}

fn to_image_coords(pos: Point, scale: f32) -> (i32, i32) {
    ((pos.x / scale) as i32, (pos.y / scale) as i32)
}

pub fn load_system_font() -> Result<FontArc> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/SFNS.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Ok(font);
            }
        }
    }

    Err(anyhow!("no usable system font found for export"))
}
