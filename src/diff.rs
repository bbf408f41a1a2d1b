use crate::bitmap::Bitmap;

/// Decides whether two clipboard samples differ.
///
/// Compares every pixel, so the cost grows with the image area. That is fine
/// at the poll cadence for screenshot-sized images.
pub fn differs(a: Option<&Bitmap>, b: Option<&Bitmap>) -> bool {
    match (a, b) {
        (None, None) => false,
        (Some(_), None) | (None, Some(_)) => true,
        (Some(a), Some(b)) => {
            a.dimensions() != b.dimensions() || a.pixels().zip(b.pixels()).any(|(p, q)| p != q)
        }
    }
}
