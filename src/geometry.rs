//! Screen-space to image-space coordinate mapping.
//!
//! The displayed image is scaled with `object-fit: contain` semantics and
//! centered inside its container, so the mapping has two parts: the letterbox
//! offset and a per-axis `natural / display` scale factor. Pointer handling and
//! overlay rendering both go through [`ViewportGeometry`], which keeps the two
//! paths from drifting apart.

use crate::model::{BoundingBox, Point, Size};

/// A rectangle in viewport (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Size of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Move the rectangle by the given delta.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Check if a point is inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}

/// Compute the rendered size of an image scaled to fit a container while
/// keeping its aspect ratio.
///
/// A wider image fits the container width, anything else fits the height.
/// Returns `None` when either size is degenerate.
pub fn fit_contain(container: Size, natural: Size) -> Option<Size> {
    if !container.is_positive() || !natural.is_positive() {
        return None;
    }

    let image_aspect = natural.width / natural.height;
    let container_aspect = container.width / container.height;

    if image_aspect > container_aspect {
        Some(Size::new(container.width, container.width / image_aspect))
    } else {
        Some(Size::new(container.height * image_aspect, container.height))
    }
}

/// Letterbox offset of a centered display box inside its container.
fn letterbox_offset(container: &ScreenRect, display: Size) -> (f64, f64) {
    (
        (container.width - display.width) / 2.0,
        (container.height - display.height) / 2.0,
    )
}

/// Map a pointer position in viewport coordinates to natural image pixels.
///
/// Positions outside the rendered image (letterbox padding, or outside the
/// container entirely) clamp to the nearest image edge. Returns `None` when
/// the display box or natural size is degenerate.
pub fn to_image_space(
    pointer: Point,
    container: &ScreenRect,
    display: Size,
    natural: Size,
) -> Option<Point> {
    if !display.is_positive() || !natural.is_positive() {
        return None;
    }

    let (offset_x, offset_y) = letterbox_offset(container, display);

    let click_x = pointer.x - container.left;
    let click_y = pointer.y - container.top;

    let x = (click_x - offset_x) * natural.width / display.width;
    let y = (click_y - offset_y) * natural.height / display.height;

    Some(Point::new(
        x.clamp(0.0, natural.width),
        y.clamp(0.0, natural.height),
    ))
}

/// Map an image-space rectangle to container-relative screen coordinates.
///
/// This is the inverse of [`to_image_space`] for in-bounds input: the result
/// plus the container origin is the viewport position the rectangle occupies.
pub fn to_screen_space(
    rect: &BoundingBox,
    container: &ScreenRect,
    display: Size,
    natural: Size,
) -> Option<ScreenRect> {
    if !display.is_positive() || !natural.is_positive() {
        return None;
    }

    let (offset_x, offset_y) = letterbox_offset(container, display);
    let scale_x = display.width / natural.width;
    let scale_y = display.height / natural.height;

    Some(ScreenRect::new(
        offset_x + rect.x * scale_x,
        offset_y + rect.y * scale_y,
        rect.width * scale_x,
        rect.height * scale_y,
    ))
}

/// Validated geometry of an image displayed inside a container.
///
/// Can only be built from non-degenerate sizes, so holding one proves that
/// coordinate mapping is safe. Rebuild it on image load and on every
/// container resize; it is never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    container: ScreenRect,
    display: Size,
    natural: Size,
}

impl ViewportGeometry {
    /// Create geometry from an explicit display box.
    pub fn new(container: ScreenRect, display: Size, natural: Size) -> Option<Self> {
        if !display.is_positive() || !natural.is_positive() {
            return None;
        }
        Some(Self {
            container,
            display,
            natural,
        })
    }

    /// Create geometry for an image rendered with `object-fit: contain`.
    pub fn contain(container: ScreenRect, natural: Size) -> Option<Self> {
        let display = fit_contain(container.size(), natural)?;
        Self::new(container, display, natural)
    }

    /// The container's bounding rectangle in viewport coordinates.
    pub fn container(&self) -> ScreenRect {
        self.container
    }

    /// Rendered size of the image.
    pub fn display(&self) -> Size {
        self.display
    }

    /// Natural pixel size of the image.
    pub fn natural(&self) -> Size {
        self.natural
    }

    /// Container-relative rectangle the image is drawn into.
    pub fn display_rect(&self) -> ScreenRect {
        let (offset_x, offset_y) = letterbox_offset(&self.container, self.display);
        ScreenRect::new(offset_x, offset_y, self.display.width, self.display.height)
    }

    /// Map a viewport pointer position to natural image pixels (clamped).
    pub fn to_image_space(&self, pointer: Point) -> Point {
        // Sizes were validated at construction.
        to_image_space(pointer, &self.container, self.display, self.natural)
            .unwrap_or_default()
    }

    /// Map an image-space rectangle to container-relative screen coordinates.
    pub fn to_screen_space(&self, rect: &BoundingBox) -> ScreenRect {
        to_screen_space(rect, &self.container, self.display, self.natural).unwrap_or_default()
    }

    /// Map an image-space point back to a viewport position.
    pub fn to_viewport(&self, point: Point) -> Point {
        let rect = self.to_screen_space(&BoundingBox::new(point.x, point.y, 0.0, 0.0));
        Point::new(rect.left + self.container.left, rect.top + self.container.top)
    }
}
