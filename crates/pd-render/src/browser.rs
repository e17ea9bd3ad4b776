//! The browser [`ImageFetcher`]: an `<img>` element requests and decodes,
//! an offscreen canvas reads the pixels back.

use crate::error::ImageError;
use crate::images::{Bitmap, ImageFetcher};
use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageElementFetcher;

impl ImageFetcher for ImageElementFetcher {
    async fn fetch(&self, url: String) -> Result<Bitmap, ImageError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ImageError::Browser("no document".into()))?;

        let img = HtmlImageElement::new().map_err(|e| js_error("create <img>", e))?;
        // Cross-origin pixels are unreadable without CORS.
        img.set_cross_origin(Some("anonymous"));
        let loaded = Promise::new(&mut |resolve, reject| {
            img.set_onload(Some(&resolve));
            img.set_onerror(Some(&reject));
        });
        img.set_src(&url);
        let outcome = JsFuture::from(loaded).await;
        img.set_onload(None);
        img.set_onerror(None);
        outcome.map_err(|_| ImageError::Browser(format!("could not load {url}")))?;

        read_pixels(&document, &img)
    }
}

fn read_pixels(document: &Document, img: &HtmlImageElement) -> Result<Bitmap, ImageError> {
    let (width, height) = (img.natural_width(), img.natural_height());
    if width == 0 || height == 0 {
        return Err(ImageError::Browser("image has no intrinsic size".into()));
    }

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| js_error("create <canvas>", e))?
        .dyn_into()
        .map_err(|_| ImageError::Browser("<canvas> is not a canvas element".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| js_error("2d context", e))?
        .ok_or_else(|| ImageError::Browser("no 2d context".into()))?
        .dyn_into()
        .map_err(|_| ImageError::Browser("no 2d context".into()))?;

    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)
        .map_err(|e| js_error("draw image", e))?;
    let data = ctx
        .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
        .map_err(|e| js_error("read pixels", e))?;
    Ok(Bitmap {
        width,
        height,
        pixels: data.data().0,
    })
}

fn js_error(context: &str, value: JsValue) -> ImageError {
    ImageError::Browser(format!("{context}: {value:?}"))
}
