//! Paints a [`ReportLayout`] onto printpdf pages.

use std::io::BufWriter;

use printpdf::image_crate::{self, DynamicImage, GenericImageView, RgbImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;

use super::layout::{DrawOp, FontWeight, PdfColor, ReportLayout, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::ReportError;
use crate::signature::Signature;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn for_weight(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

/// Render every page of `layout` and return the PDF bytes.
///
/// A signature that cannot be decoded is logged and left out; the rest of the
/// document is still produced.
pub fn render_pdf(
    layout: &ReportLayout,
    signature: Option<&Signature>,
    title: &str,
) -> Result<Vec<u8>, ReportError> {
    let (width, height) = (pt(PAGE_WIDTH), pt(PAGE_HEIGHT));
    let (doc, page1, layer1) = PdfDocument::new(title, width, height, "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("PDF font error: {e}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("PDF font error: {e}")))?,
    };
    let signature_image = signature.and_then(load_signature_image);

    let mut first_page = Some((page1, layer1));
    for page in &layout.pages {
        let (page_index, layer_index) = match first_page.take() {
            Some(ids) => ids,
            None => doc.add_page(width, height, "Layer 1"),
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            paint(&layer, &fonts, op, signature_image.as_ref());
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("PDF buffer error: {e}")))
}

fn paint(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp, signature: Option<&DynamicImage>) {
    match op {
        DrawOp::Text { text, x, y, size, weight, color } => {
            layer.set_fill_color(fill(*color));
            layer.use_text(text.as_str(), *size, pt(*x), pt(*y), fonts.for_weight(*weight));
        }
        DrawOp::Rect { x, y, width, height, color } => {
            let corners = [(*x, *y), (*x + *width, *y), (*x + *width, *y + *height), (*x, *y + *height)];
            layer.set_fill_color(fill(*color));
            layer.add_polygon(Polygon {
                rings: vec![corners
                    .iter()
                    .map(|&(cx, cy)| (Point::new(pt(cx), pt(cy)), false))
                    .collect()],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        DrawOp::Signature { x, y, scale, max_width, max_height } => {
            let Some(image) = signature else {
                return;
            };
            let (width, height) = image.dimensions();
            let factor = fit_scale(width, height, *scale, *max_width, *max_height);
            Image::from_dynamic_image(image).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(pt(*x)),
                    translate_y: Some(pt(*y)),
                    // 72 dpi makes one pixel one point before scaling.
                    dpi: Some(72.0),
                    scale_x: Some(factor),
                    scale_y: Some(factor),
                    ..Default::default()
                },
            );
        }
    }
}

fn pt(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn fill(color: PdfColor) -> Color {
    Color::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

/// Largest scale not above `scale` that keeps the image inside the box.
fn fit_scale(width: u32, height: u32, scale: f32, max_width: f32, max_height: f32) -> f32 {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    scale.min(max_width / w).min(max_height / h)
}

fn load_signature_image(signature: &Signature) -> Option<DynamicImage> {
    match decode_signature(signature) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!(error = %e, "Signature image skipped");
            None
        }
    }
}

fn decode_signature(signature: &Signature) -> Result<DynamicImage, ReportError> {
    let bytes = signature.decode()?;
    let image = image_crate::load_from_memory(&bytes)
        .map_err(|e| ReportError::Signature(format!("cannot decode image: {e}")))?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ReportError::Signature("image has no pixels".into()));
    }
    Ok(flatten_onto_white(&image))
}

/// PDF image XObjects here carry no alpha, so transparency is composited
/// onto a white page background.
fn flatten_onto_white(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let flat = RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let blend = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        image_crate::Rgb([blend(r), blend(g), blend(b)])
    });
    DynamicImage::ImageRgb8(flat)
}
