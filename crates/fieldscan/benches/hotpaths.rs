use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fieldscan::{
    classify_candidates, classify_scan_area, find_green_border_points, fit_circle,
    horizontal_scan, vertical_scan, ClusterParams, ColorClass, FieldObjects, Horizon,
    LookupTable, Pixel, Point2i, Vision, VisionConfig, YcbcrImage,
};

const GREEN: Pixel = Pixel {
    y: 100,
    cb: 90,
    cr: 90,
};
const ORANGE: Pixel = Pixel {
    y: 120,
    cb: 80,
    cr: 200,
};
const YELLOW: Pixel = Pixel {
    y: 180,
    cb: 60,
    cr: 150,
};
const WHITE: Pixel = Pixel {
    y: 240,
    cb: 128,
    cr: 128,
};

fn bench_table() -> LookupTable {
    LookupTable::from_fn(|y, cb, cr| {
        if y >= 220 {
            ColorClass::White
        } else if cr >= 180 {
            ColorClass::Orange
        } else if cb >= 180 {
            ColorClass::Blue
        } else if cb < 100 && cr >= 120 {
            ColorClass::Yellow
        } else if cr < 110 && cb < 130 && y < 200 {
            ColorClass::Green
        } else {
            ColorClass::Unclassified
        }
    })
}

/// A full match scene: sky, field border, a ball and one goal post, with a
/// deterministic dither so the debounce logic sees realistic noise.
fn make_scene(width: u32, height: u32) -> YcbcrImage {
    let border_y = height as i32 / 3;
    let mut img = YcbcrImage::filled(width, height, 0.0, GREEN);
    for y in 0..border_y {
        for x in 0..width as i32 {
            img.set_pixel(x, y, WHITE);
        }
    }
    // Deterministic chroma dither.
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let p = img.pixel(x, y);
            let d = (((x * 31 + y * 17) % 7) - 3) as i16;
            img.set_pixel(
                x,
                y,
                Pixel {
                    y: (p.y as i16 + d).clamp(0, 255) as u8,
                    cb: p.cb,
                    cr: p.cr,
                },
            );
        }
    }
    // Ball in the lower half.
    let (cx, cy, r) = (width as i32 / 3, height as i32 * 2 / 3, height as i32 / 16);
    for y in (cy - r).max(0)..=(cy + r).min(height as i32 - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(width as i32 - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                img.set_pixel(x, y, ORANGE);
            }
        }
    }
    // Goal post straddling the border.
    let post_x = width as i32 * 3 / 4;
    for y in 0..(border_y + height as i32 / 5) {
        for x in post_x..(post_x + width as i32 / 24).min(width as i32) {
            img.set_pixel(x, y, YELLOW);
        }
    }
    img
}

fn bench_classify(c: &mut Criterion) {
    let table = bench_table();
    let img = make_scene(320, 240);
    c.bench_function("classify_320x240_full", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for y in 0..img.height() {
                for x in 0..img.width() {
                    acc += table.classify_at(black_box(&img), x, y) as usize;
                }
            }
            black_box(acc)
        })
    });
}

fn bench_scan_and_segment(c: &mut Criterion) {
    let table = bench_table();
    let img = make_scene(320, 240);
    let horizon = Horizon::level(0.0);
    let border = find_green_border_points(&img, &table, 16, &horizon);

    c.bench_function("border_320x240_s16", |b| {
        b.iter(|| {
            black_box(find_green_border_points(
                black_box(&img),
                black_box(&table),
                16,
                black_box(&horizon),
            ))
        })
    });

    c.bench_function("segments_320x240_s16", |b| {
        b.iter(|| {
            let mut vertical = vertical_scan(black_box(&border), 16, &img);
            classify_scan_area(&mut vertical, &img, &table);
            let mut horizontal = horizontal_scan(black_box(&border), 16, &img);
            classify_scan_area(&mut horizontal, &img, &table);
            black_box(vertical.all_segments().len() + horizontal.all_segments().len())
        })
    });
}

fn bench_clustering(c: &mut Criterion) {
    let table = bench_table();
    let img = make_scene(320, 240);
    let horizon = Horizon::level(0.0);
    let border = find_green_border_points(&img, &table, 16, &horizon);
    let mut vertical = vertical_scan(&border, 16, &img);
    classify_scan_area(&mut vertical, &img, &table);
    let segments = vertical.all_segments();
    let params = ClusterParams::default();
    let colours = [
        ColorClass::RedOrange,
        ColorClass::Orange,
        ColorClass::YellowOrange,
        ColorClass::Yellow,
        ColorClass::Blue,
    ];

    c.bench_function("cluster_vertical_segments", |b| {
        b.iter(|| {
            black_box(classify_candidates(
                black_box(&segments),
                black_box(&colours),
                black_box(&params),
            ))
        })
    });
}

fn bench_circle_fit(c: &mut Criterion) {
    // 48 points on a circle, quantized to pixels.
    let points: Vec<Point2i> = (0..48)
        .map(|i| {
            let t = 2.0 * std::f64::consts::PI * i as f64 / 48.0;
            Point2i::new(
                (160.0 + 22.0 * t.cos()).round() as i32,
                (120.0 + 22.0 * t.sin()).round() as i32,
            )
        })
        .collect();
    c.bench_function("circle_fit_48pts", |b| {
        b.iter(|| {
            let fit = fit_circle(black_box(&points)).expect("fixture circle always fits");
            black_box(fit)
        })
    });
}

fn bench_full_frame(c: &mut Criterion) {
    let table = bench_table();
    let vision = Vision::new(VisionConfig::default());
    let horizon = Horizon::level(0.0);
    let img_320 = make_scene(320, 240);
    let img_640 = make_scene(640, 480);

    c.bench_function("frame_320x240", |b| {
        let mut objects = FieldObjects::default();
        b.iter(|| {
            black_box(vision.process_frame(
                black_box(&img_320),
                black_box(&table),
                black_box(&horizon),
                &mut objects,
            ))
        })
    });

    c.bench_function("frame_640x480", |b| {
        let mut objects = FieldObjects::default();
        b.iter(|| {
            black_box(vision.process_frame(
                black_box(&img_640),
                black_box(&table),
                black_box(&horizon),
                &mut objects,
            ))
        })
    });
}

criterion_group!(
    hotpaths,
    bench_classify,
    bench_scan_and_segment,
    bench_clustering,
    bench_circle_fit,
    bench_full_frame
);
criterion_main!(hotpaths);
