//! Side-by-side plane concatenation.
//!
//! Each output row is the left eye's row followed by the right eye's row.
//! Luma rows and the interleaved chroma rows are both `width` bytes per eye,
//! so the chroma plane is just `height / 2` more rows after the luma plane.

use contracts::FrameGeometry;

/// Write `left` and `right` side by side into `out`
///
/// `left` and `right` must be `geometry.eye_len()` bytes and `out` must be
/// `geometry.combined_len()` bytes.
pub fn combine_planes(left: &[u8], right: &[u8], out: &mut [u8], geometry: FrameGeometry) {
    debug_assert_eq!(left.len(), geometry.eye_len());
    debug_assert_eq!(right.len(), geometry.eye_len());
    debug_assert_eq!(out.len(), geometry.combined_len());

    let row = geometry.row_len();
    if row == 0 {
        return;
    }

    let luma = geometry.luma_len();
    let (out_luma, out_chroma) = out.split_at_mut(luma * 2);

    concat_rows(&left[..luma], &right[..luma], out_luma, row);
    concat_rows(&left[luma..], &right[luma..], out_chroma, row);
}

#[inline]
fn concat_rows(left: &[u8], right: &[u8], out: &mut [u8], row: usize) {
    let rows = out
        .chunks_exact_mut(row * 2)
        .zip(left.chunks_exact(row))
        .zip(right.chunks_exact(row));

    for ((dst, l), r) in rows {
        let (dst_left, dst_right) = dst.split_at_mut(row);
        dst_left.copy_from_slice(l);
        dst_right.copy_from_slice(r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye(geometry: FrameGeometry, luma: u8, chroma: u8) -> Vec<u8> {
        let mut buf = vec![luma; geometry.eye_len()];
        buf[geometry.luma_len()..].fill(chroma);
        buf
    }

    #[test]
    fn test_constant_fill_rows() {
        let g = FrameGeometry::new(6, 4);
        let left = eye(g, 0x10, 0x80);
        let right = eye(g, 0x20, 0x90);
        let mut out = vec![0u8; g.combined_len()];

        combine_planes(&left, &right, &mut out, g);

        let w = g.row_len();
        for row in out[..g.luma_len() * 2].chunks_exact(2 * w) {
            assert_eq!(&row[..w], &[0x10; 6]);
            assert_eq!(&row[w..], &[0x20; 6]);
        }
        for row in out[g.luma_len() * 2..].chunks_exact(2 * w) {
            assert_eq!(&row[..w], &[0x80; 6]);
            assert_eq!(&row[w..], &[0x90; 6]);
        }
    }

    #[test]
    fn test_row_order_preserved() {
        // 2x2 eye: luma rows [a, b], one chroma row [c]
        let g = FrameGeometry::new(2, 2);
        let left = vec![1, 2, 3, 4, 5, 6];
        let right = vec![11, 12, 13, 14, 15, 16];
        let mut out = vec![0u8; g.combined_len()];

        combine_planes(&left, &right, &mut out, g);

        assert_eq!(out, vec![1, 2, 11, 12, 3, 4, 13, 14, 5, 6, 15, 16]);
    }
}
