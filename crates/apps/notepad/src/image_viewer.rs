//! Image viewer: validates stored image data and tracks the zoom/rotate/pan view.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use desktop_app_contract::{AppHost, AppLaunchContext, WindowRuntimeId};
use thiserror::Error;
use tracing::warn;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
const MIN_FIT_ZOOM: f64 = 0.05;
const BUTTON_ZOOM_STEP: f64 = 1.3;
const WHEEL_ZOOM_STEP: f64 = 1.1;
const FIT_PADDING: f64 = 32.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Why an image could not be shown.
pub enum ImageError {
    /// The window was opened without a file.
    #[error("No file path provided.")]
    NoPath,
    /// The file could not be read.
    #[error("{0}")]
    Read(String),
    /// The file does not hold a base64 image data URL.
    #[error("Invalid image data in file.")]
    InvalidData,
}

/// Checks that `content` is a `data:image/...;base64,` URL with a decodable payload.
pub fn validate_image_data(content: &str) -> Result<(), ImageError> {
    let rest = content
        .strip_prefix("data:image")
        .ok_or(ImageError::InvalidData)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::InvalidData)?;
    if !header.ends_with(";base64") {
        return Err(ImageError::InvalidData);
    }
    BASE64
        .decode(payload)
        .map(|_| ())
        .map_err(|_| ImageError::InvalidData)
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Zoom, rotation and pan applied to the displayed image.
pub struct ViewTransform {
    /// Scale factor, `1.0` is actual size.
    pub zoom: f64,
    /// Clockwise rotation in degrees, one of 0, 90, 180, 270.
    pub rotation: i32,
    /// Pan offset in pixels.
    pub pan: (f64, f64),
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0,
            pan: (0.0, 0.0),
        }
    }
}

impl ViewTransform {
    fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom button: 30% larger.
    pub fn zoom_in(&mut self) {
        self.zoom_by(BUTTON_ZOOM_STEP);
    }

    /// Zoom button: inverse of [`Self::zoom_in`].
    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / BUTTON_ZOOM_STEP);
    }

    /// Mouse wheel: scrolling up (negative delta) zooms in.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y < 0.0 {
            self.zoom_by(WHEEL_ZOOM_STEP);
        } else {
            self.zoom_by(1.0 / WHEEL_ZOOM_STEP);
        }
    }

    /// Rotates 90 degrees counter-clockwise.
    pub fn rotate_left(&mut self) {
        self.rotation = (self.rotation - 90).rem_euclid(360);
    }

    /// Rotates 90 degrees clockwise.
    pub fn rotate_right(&mut self) {
        self.rotation = (self.rotation + 90).rem_euclid(360);
    }

    /// Drag offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = (self.pan.0 + dx, self.pan.1 + dy);
    }

    /// Actual size, unrotated, centered.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scales `image` to fit inside `container` with padding, never above actual size.
    /// Zero-sized images leave the view unchanged.
    pub fn fit(&mut self, image: (u32, u32), container: (u32, u32)) {
        if image.0 == 0 || image.1 == 0 {
            return;
        }
        let horizontal = (f64::from(container.0) - FIT_PADDING) / f64::from(image.0);
        let vertical = (f64::from(container.1) - FIT_PADDING) / f64::from(image.1);
        *self = Self {
            zoom: horizontal.min(vertical).min(1.0).max(MIN_FIT_ZOOM),
            ..Self::default()
        };
    }

    /// Zoom as a whole percentage, e.g. `130%`.
    pub fn zoom_label(&self) -> String {
        format!("{:.0}%", self.zoom * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// State of one image viewer window.
pub struct ImageViewerModel {
    window_id: WindowRuntimeId,
    path: Option<String>,
    image: Result<String, ImageError>,
    view: ViewTransform,
}

impl ImageViewerModel {
    /// Reads and validates the file named by the launch context.
    pub fn open<H>(host: &H, context: &AppLaunchContext) -> Self
    where
        H: AppHost + ?Sized,
    {
        let path = context.file_path().map(str::to_string);
        let image = match path.as_deref() {
            None => Err(ImageError::NoPath),
            Some(path) => host
                .read_file(path)
                .map_err(|err| ImageError::Read(err.message))
                .and_then(|content| validate_image_data(&content).map(|()| content)),
        };
        if let Err(err) = &image {
            warn!(window_id = context.window_id, error = %err, "image viewer cannot show file");
        }
        Self {
            window_id: context.window_id,
            path,
            image,
            view: ViewTransform::default(),
        }
    }

    /// Window this viewer belongs to.
    pub fn window_id(&self) -> WindowRuntimeId {
        self.window_id
    }

    /// File being shown.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The validated data URL, or why there is none.
    pub fn image(&self) -> Result<&str, &ImageError> {
        self.image.as_deref()
    }

    /// Current view transform.
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Mutable view transform for zoom and pan controls.
    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validates_base64_image_urls() {
        assert_eq!(validate_image_data("data:image/png;base64,iVBORw=="), Ok(()));
        assert_eq!(
            validate_image_data("data:text/plain;base64,aGk="),
            Err(ImageError::InvalidData)
        );
        assert_eq!(
            validate_image_data("data:image/svg+xml,<svg/>"),
            Err(ImageError::InvalidData)
        );
        assert_eq!(
            validate_image_data("data:image/png;base64,@@@"),
            Err(ImageError::InvalidData)
        );
        assert_eq!(validate_image_data(""), Err(ImageError::InvalidData));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = ViewTransform::default();
        view.zoom_in();
        assert_eq!(view.zoom_label(), "130%");
        for _ in 0..20 {
            view.zoom_in();
        }
        assert_eq!(view.zoom, MAX_ZOOM);
        for _ in 0..40 {
            view.wheel(1.0);
        }
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn rotation_wraps_and_reset_restores_defaults() {
        let mut view = ViewTransform::default();
        view.rotate_left();
        assert_eq!(view.rotation, 270);
        view.rotate_right();
        view.rotate_right();
        assert_eq!(view.rotation, 90);
        view.pan_by(5.0, -3.0);
        view.reset();
        assert_eq!(view, ViewTransform::default());
    }

    #[test]
    fn fit_never_upscales() {
        let mut view = ViewTransform::default();
        view.fit((100, 50), (1032, 532));
        assert_eq!(view.zoom, 1.0);
        view.fit((2000, 1000), (1032, 532));
        assert_eq!(view.zoom, 0.5);
        view.fit((0, 10), (100, 100));
        assert_eq!(view.zoom, 0.5);
    }
}
