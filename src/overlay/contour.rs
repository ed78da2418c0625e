use image::{Rgb, RgbImage};
use imageproc::{
    contours::{BorderType, Contour, find_contours},
    drawing::draw_filled_rect_mut,
    rect::Rect,
};

use crate::imaging::BinaryMask;

/// Outer borders of the foreground regions that are not nested inside another region.
pub fn external_contours(mask: &BinaryMask) -> Vec<Contour<i32>> {
    find_contours::<i32>(&mask.to_gray8())
        .into_iter()
        .filter(|contour| {
            matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none()
        })
        .collect()
}

/// Stamp a `thickness`-wide square centred on every contour point. Even widths
/// reach one pixel further up and left.
pub fn draw_contours(
    canvas: &mut RgbImage,
    contours: &[Contour<i32>],
    color: Rgb<u8>,
    thickness: u32,
) {
    if thickness == 0 {
        return;
    }

    let offset = thickness as i32 / 2;
    for point in contours.iter().flat_map(|contour| &contour.points) {
        let rect = Rect::at(point.x - offset, point.y - offset).of_size(thickness, thickness);
        draw_filled_rect_mut(canvas, rect, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask(size: usize, from: usize, to: usize) -> BinaryMask {
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                (from..to).contains(&x) && (from..to).contains(&y)
            })
            .collect();
        BinaryMask::new(size, size, data).unwrap()
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = BinaryMask::new(4, 4, vec![false; 16]).unwrap();
        assert!(external_contours(&mask).is_empty());
    }

    #[test]
    fn holes_are_not_external() {
        // ring: filled 2..8 square with a 4..6 hole
        let size = 10;
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                let outer = (2..8).contains(&x) && (2..8).contains(&y);
                let hole = (4..6).contains(&x) && (4..6).contains(&y);
                outer && !hole
            })
            .collect();
        let mask = BinaryMask::new(size, size, data).unwrap();

        let contours = external_contours(&mask);

        assert_eq!(contours.len(), 1);
        assert!(
            contours[0]
                .points
                .iter()
                .all(|p| p.x == 2 || p.x == 7 || p.y == 2 || p.y == 7)
        );
    }

    #[test]
    fn draws_border_but_not_interior() {
        let mask = square_mask(12, 3, 9);
        let contours = external_contours(&mask);
        let color = Rgb([255, 165, 0]);

        let mut canvas = RgbImage::new(12, 12);
        draw_contours(&mut canvas, &contours, color, 2);

        assert_eq!(*canvas.get_pixel(3, 3), color);
        assert_eq!(*canvas.get_pixel(8, 5), color);
        assert_eq!(*canvas.get_pixel(6, 6), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn stamps_straddle_the_border() {
        let mask = square_mask(12, 3, 9);
        let contours = external_contours(&mask);
        let color = Rgb([255, 165, 0]);

        let mut canvas = RgbImage::new(12, 12);
        draw_contours(&mut canvas, &contours, color, 2);
        assert_eq!(*canvas.get_pixel(2, 5), color);
        assert_eq!(*canvas.get_pixel(4, 5), Rgb([0, 0, 0]));

        let mut canvas = RgbImage::new(12, 12);
        draw_contours(&mut canvas, &contours, color, 3);
        for (x, y) in [(2, 5), (4, 5), (7, 5), (9, 5), (5, 2), (5, 9)] {
            assert_eq!(*canvas.get_pixel(x, y), color, "({x}, {y})");
        }
        assert_eq!(*canvas.get_pixel(6, 6), Rgb([0, 0, 0]));
    }

    #[test]
    fn zero_thickness_draws_nothing() {
        let mask = square_mask(6, 1, 5);
        let mut canvas = RgbImage::new(6, 6);

        draw_contours(&mut canvas, &external_contours(&mask), Rgb([1, 2, 3]), 0);

        assert!(canvas.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
