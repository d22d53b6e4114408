use panel_segmentation::prelude::*;

fn main() {
    // Demo stub: a synthetic tile with one bright rotated panel block.
    let _ = env_logger::builder().try_init();
    let (w, h) = (640usize, 640usize);
    let inside = |x: usize, y: usize| x + y >= 600 && x + y < 760 && x.abs_diff(y) < 200;
    let image = ImageRgb8::from_fn(w, h, |x, y| {
        if inside(x, y) {
            [40, 60, 210]
        } else {
            [120, 110, 100]
        }
    });
    let mask = ImageF32::from_fn(w, h, |x, y| if inside(x, y) { 0.98 } else { 0.02 });

    let post = PanelPostprocessor::new(PostprocessParams::default());
    match post.process_one(&image, &mask) {
        Ok(analysis) => println!(
            "azimuth={} panel_pixels={} latency_ms={:.3}",
            analysis.azimuth.azimuth,
            analysis.cropped.mask().count(),
            analysis.timings.total_ms
        ),
        Err(err) => eprintln!("Error: {err}"),
    }
}
