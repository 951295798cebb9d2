//! End-to-end scenarios across core buffers and operations.

use pixmill_core::prelude::*;
use pixmill_ops::alpha::{set_alpha, set_color_to_alpha};
use pixmill_ops::compare::{compare, compare_any, is_solid};
use pixmill_ops::composite::{composite, composite_pixel};
use pixmill_ops::region::{add_border, create_view, fill_any, fill_color, set_rectangle};
use pixmill_ops::CompOp;

fn opaque(r: u8, g: u8, b: u8) -> Color {
    Color::rgb(r, g, b)
}

#[test]
fn border_leaves_interior_untouched() {
    let mut img: Image<Rgba8> = Image::new(4, 4);
    fill_color(&mut img, opaque(255, 0, 0));
    let before = img.clone();

    add_border(&mut img);

    // the top row is drawn in the fill color, so only 8 border pixels change
    assert_eq!(get_pixel::<u32, _>(&img, 0, 0), 0xff0000ff);
    for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
        assert_eq!(img.pixel(x, y), before.pixel(x, y));
    }
    assert_eq!(compare(&img, &before, 0.0, true).unwrap(), 8);
}

#[test]
fn opaque_src_over_is_overwrite_on_any_destination() {
    let mut img: Image<Rgba8> = Image::new(8, 1);
    for x in 0..8u32 {
        let v = (x * 32) as u8;
        img.set_pixel(x, 0, [v / 2, v / 3, v / 4, v]);
    }
    img.set_premultiplied(true);
    for x in 0..8 {
        composite_pixel(&mut img, CompOp::SrcOver, x, 0, 0xff204060, 1.0, 1.0);
    }
    assert!(is_solid(&img));
    assert_eq!(get_pixel::<u32, _>(&img, 7, 0), 0xff204060);
}

#[test]
fn color_key_everywhere_clears_alpha() {
    let key = opaque(40, 80, 120);
    let mut img: Image<Rgba8> = Image::new(6, 5);
    fill_color(&mut img, key);
    set_color_to_alpha(&mut img, key);
    assert!(img.data().iter().all(|px| px[3] == 0));
}

#[test]
fn premultiply_roundtrip_on_gradient() {
    let mut img: Image<Rgba8> = Image::new(64, 4);
    for y in 0..4 {
        for x in 0..64 {
            let a = [255u8, 192, 128, 96][y as usize];
            img.set_pixel(x, y, [(x * 4) as u8, 255 - (x * 4) as u8, 77, a]);
        }
    }
    let original = img.clone();
    assert!(premultiply_alpha(&mut img));
    assert!(demultiply_alpha(&mut img));
    // a >= 96 keeps every channel within 2 steps
    assert_eq!(compare(&img, &original, 2.0, true).unwrap(), 0);
}

#[test]
fn view_blit_and_compare() {
    let mut src = AnyImage::new(PixelKind::Gray16, 8, 8);
    fill_any(&mut src, 1000u32);
    src.set_pixel(5, 5, 2000u32);

    let view = create_view(&src, 4, 4, 4, 4).unwrap();
    assert_eq!(view.get_pixel::<u16>(1, 1), 2000);

    let mut dst: Image<Gray16> = Image::new(4, 4);
    if let AnyView::Gray16(v) = view {
        set_rectangle(&mut dst, &v, 0, 0);
    }
    assert_eq!(dst.pixel(1, 1), 2000);
    assert_eq!(dst.pixel(0, 0), 1000);

    let copied = AnyImage::from(dst);
    let expected = view.to_image();
    assert_eq!(compare_any(&copied, &expected, 0.0, true).unwrap(), 0);
}

#[test]
fn layered_composite_with_opacity() {
    let mut canvas: Image<Rgba8> = Image::new(4, 4);
    canvas.set_premultiplied(true);
    fill_color(&mut canvas, opaque(0, 0, 255));

    let mut layer: Image<Rgba8> = Image::new(2, 2);
    fill_color(&mut layer, opaque(255, 0, 0));
    set_alpha(&mut layer, 0.5);
    premultiply_alpha(&mut layer);

    composite(&mut canvas, &layer, CompOp::SrcOver, 1.0, 1, 1);
    assert_eq!(canvas.pixel(1, 1), [128, 0, 127, 255]);
    assert_eq!(canvas.pixel(0, 0), [0, 0, 255, 255]);
    assert_eq!(canvas.pixel(3, 3), [0, 0, 255, 255]);
}
