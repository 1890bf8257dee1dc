/// Most recent pointer position in normalized device coordinates.
///
/// `x` grows to the right and `y` grows upward, both in `[-1, 1]` while the
/// pointer is inside the viewport. Written by the input listener, read once
/// per frame; the last write wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    /// Map client pixel coordinates into the normalized range.
    pub fn from_client(client_x: f64, client_y: f64, width: f64, height: f64) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        Self {
            x: (client_x / width * 2.0 - 1.0) as f32,
            y: (-(client_y / height) * 2.0 + 1.0) as f32,
        }
    }
}
