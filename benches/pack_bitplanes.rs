// Run with:  cargo bench --bench pack_bitplanes

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use embedded_graphics::pixelcolor::RgbColor;
use ledmatrix_framebuffer::{BitPlaneCodec, Color, Frame, Orientation, PanelGeometry, Rotation};
use std::hint::black_box;

const PANELS: usize = 8;

fn pack_bitplanes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_bitplanes");
    group.throughput(Throughput::Elements((64 * PANELS) as u64));

    let mut frame = Frame::new(PanelGeometry::grid8x8(PANELS));
    frame.fill_palette(&[Color::RED, Color::GREEN, Color::BLACK, Color::YELLOW]);

    group.bench_function("encode_monochrome", |b| {
        let codec = BitPlaneCodec::new(PANELS, Orientation::default());
        b.iter(|| black_box(codec.encode_monochrome(black_box(&frame))));
    });

    group.bench_function("encode_monochrome_rotated", |b| {
        let orientation = Orientation {
            rotation: Rotation::D270,
            flip_horizontal: true,
            reverse_panels: true,
        };
        let codec = BitPlaneCodec::new(PANELS, orientation);
        b.iter(|| black_box(codec.encode_monochrome(black_box(&frame))));
    });

    group.bench_function("encode_dual_color", |b| {
        let codec = BitPlaneCodec::new(PANELS, Orientation::default());
        b.iter(|| black_box(codec.encode_dual_color(black_box(&frame))));
    });

    group.finish();
}

criterion_group!(benches, pack_bitplanes);
criterion_main!(benches);
