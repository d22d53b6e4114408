use log::info;
use panel_segmentation::config::{load_config, ToolConfig};
use panel_segmentation::image::io::{
    load_mask_image, load_rgb_image, save_binary_mask, save_rgb_image, write_json_file,
};
use panel_segmentation::{PanelError, PanelPostprocessor};
use std::env;

fn main() {
    let _ = env_logger::builder().try_init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> PanelError {
    PanelError::Config("usage: panel_postprocess <config.json>".to_string())
}

fn run() -> Result<(), PanelError> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: ToolConfig = load_config(config_path.as_ref())?;

    let image = load_rgb_image(&config.input)?;
    let mask = load_mask_image(&config.mask)?;
    info!(
        "loaded {} ({}x{}) and mask {}",
        config.input.display(),
        image.w,
        image.h,
        config.mask.display()
    );

    let post = PanelPostprocessor::new(config.params.clone());
    let analysis = post.process_one(&image, &mask)?;

    if let Some(path) = &config.output.cropped_image {
        save_rgb_image(analysis.cropped.image(), path)?;
    }
    if let Some(path) = &config.output.binary_mask {
        save_binary_mask(analysis.cropped.mask(), path)?;
    }
    if let (Some(dir), Some(clusters)) = (&config.output.cluster_dir, &analysis.clusters) {
        for (k, img) in clusters.images.iter().enumerate() {
            save_rgb_image(img, &dir.join(format!("cluster_{k}.png")))?;
        }
    }
    let report = analysis.report();
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
    }

    println!(
        "azimuth={} ({:?}) lines={} panel_pixels={} clusters={:?} latency_ms={:.3}",
        report.azimuth,
        report.resolution,
        report.lines.len(),
        report.panel_pixels,
        report.cluster_sizes,
        report.timings.total_ms
    );
    Ok(())
}
