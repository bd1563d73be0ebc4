//! The host-platform surface the widget delegates to: device metrics, image
//! measuring, and rasterizing a canvas into an exportable URL. The widget
//! never decodes or writes image data itself.

use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, HtmlCanvasElement, HtmlImageElement, Url};
use yew::Callback;

use crate::model::ExportFormat;
use crate::state::{CropWindow, Size, design_to_px};

/// Screen/window dimensions and pixel density, queried synchronously at
/// mount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceMetrics {
    pub screen_width: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub pixel_ratio: f64,
}

impl DeviceMetrics {
    /// Derive the centered crop window from this snapshot. The widget samples
    /// metrics once at mount and feeds the same window to clamping, drawing,
    /// and layout, so a mid-session viewport change cannot split them apart.
    pub fn crop_window(&self, clip_width: f64, clip_height: f64) -> CropWindow {
        CropWindow::new(
            design_to_px(clip_width, self.screen_width),
            design_to_px(clip_height, self.screen_width),
            Size {
                width: self.window_width,
                height: self.window_height,
            },
        )
    }
}

pub fn device_metrics() -> DeviceMetrics {
    let window = web_sys::window();
    let width = window
        .as_ref()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let height = window
        .as_ref()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    let pixel_ratio = window.map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    DeviceMetrics {
        screen_width: width,
        window_width: width,
        window_height: height,
        pixel_ratio,
    }
}

/// Metadata of a loaded source image. Replaced wholesale when `src` changes.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageInfo {
    pub path: String,
    /// Natural size in source pixels, EXIF orientation already applied by
    /// the browser.
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("failed to create image element: {0}")]
    Element(String),
    #[error("failed to load image metadata for '{src}'")]
    Metadata { src: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("no source image loaded")]
    NoSource,
    #[error("canvas rasterization failed: {0}")]
    Rasterize(String),
}

/// Measure an image by loading it into a detached `HtmlImageElement`.
/// `on_ready` fires once with the element (kept for drawing) and its
/// metadata, or with a `LoadError` the caller is expected to log and
/// otherwise ignore.
pub fn load_image(src: &str, on_ready: Callback<Result<(HtmlImageElement, ImageInfo), LoadError>>) {
    let element = match HtmlImageElement::new() {
        Ok(el) => el,
        Err(err) => {
            on_ready.emit(Err(LoadError::Element(format!("{err:?}"))));
            return;
        }
    };
    let src_owned = src.to_string();
    let onload = {
        let element = element.clone();
        let src = src_owned.clone();
        let on_ready = on_ready.clone();
        Closure::once(move |_: web_sys::Event| {
            let info = ImageInfo {
                path: src,
                width: element.natural_width() as f64,
                height: element.natural_height() as f64,
            };
            on_ready.emit(Ok((element, info)));
        })
    };
    let onerror = {
        let src = src_owned.clone();
        Closure::once(move |_: web_sys::Event| {
            on_ready.emit(Err(LoadError::Metadata { src }));
        })
    };
    element.set_onload(Some(onload.as_ref().unchecked_ref()));
    element.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // single-shot: the element owns the handlers for its lifetime
    onload.forget();
    onerror.forget();
    element.set_src(&src_owned);
}

/// Cut precondition: without a loaded source there is nothing on the canvas
/// worth exporting, so the cut fails before any rasterization is attempted.
pub fn ensure_source(source: Option<&ImageInfo>) -> Result<(), ExportError> {
    match source {
        Some(_) => Ok(()),
        None => Err(ExportError::NoSource),
    }
}

/// Rasterize the preview canvas into a blob and hand back an object URL as
/// the exported "file path". Single-shot, no cancellation; a platform
/// failure reaches `done` as `ExportError::Rasterize`.
pub fn export_canvas(
    canvas: &HtmlCanvasElement,
    format: ExportFormat,
    quality: f64,
    done: Callback<Result<String, ExportError>>,
) -> Result<(), ExportError> {
    let receive = Closure::once(move |blob: JsValue| {
        let result = blob
            .dyn_into::<Blob>()
            .map_err(|_| ExportError::Rasterize("no blob produced".into()))
            .and_then(|blob| {
                Url::create_object_url_with_blob(&blob)
                    .map_err(|err| ExportError::Rasterize(format!("{err:?}")))
            });
        done.emit(result);
    });
    canvas
        .to_blob_with_type_and_encoder_options(
            receive.as_ref().unchecked_ref(),
            format.mime_type(),
            &JsValue::from_f64(quality.clamp(0.0, 1.0)),
        )
        .map_err(|err| ExportError::Rasterize(format!("{err:?}")))?;
    receive.forget();
    Ok(())
}
