use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gifweave::{lzw, Color, ColorGrid, Container};

/// Gradient frames with a moving band
fn frames() -> Vec<ColorGrid> {
    (0..8u16)
        .map(|step| {
            let mut grid = ColorGrid::with_color(64, 64, Color::new(0, 0, 0));
            for y in 0..64u16 {
                for x in 0..64u16 {
                    let v = ((x + y + step * 8) % 64) as u8 * 4;
                    grid.set_pixel(x, y, Color::new(v, 255 - v, v / 2));
                }
            }
            grid
        })
        .collect()
}

fn compress_indices(crit: &mut Criterion) {
    let indices: Vec<u8> = (0..65536u32).map(|i| (i * 7 % 251) as u8).collect();
    crit.bench_function("compress", |b| {
        b.iter(|| lzw::compress(8, black_box(&indices)).unwrap())
    });
}

fn encode_container(crit: &mut Criterion) {
    let frames = frames();
    crit.bench_function("encode_container", |b| {
        b.iter(|| {
            let mut gif = Container::new();
            for grid in &frames {
                gif.add_frame(grid.clone()).unwrap();
            }
            black_box(gif.to_bytes().unwrap())
        })
    });
}

criterion_group!(benches, compress_indices, encode_container);
criterion_main!(benches);
