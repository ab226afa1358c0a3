//! Measure the plate height in a single rectified plate image.
//!
//! Usage: `plate_height_demo <config.json>`. The demo writes
//! - `overlay.png`: the input with coarse edges and refined edges drawn,
//! - `mask.png` (optional): the cleaned threshold mask,
//! - `report.json`: geometry, height and stage timings.

use plate_speed::config::plate_demo::{self, PlateDemoConfig};
use plate_speed::contour::plate_mask;
use plate_speed::diagnostics::{InputDescriptor, PlateReport, TimingBreakdown};
use plate_speed::image::draw::draw_lines;
use plate_speed::image::io::{load_rgb_image, save_grayscale_u8, save_rgb_u8, write_json_file};
use plate_speed::image::ImageView;
use plate_speed::measure::PlateMeasurer;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Run a closure while timing its execution and reporting the elapsed time.
fn run_with_timer<R, F: FnOnce() -> Result<R, String>>(f: F) -> Result<ResultWithTime<R>, String> {
    let start = Instant::now();
    let result = f()?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok(ResultWithTime { result, elapsed_ms })
}

struct ResultWithTime<R> {
    result: R,
    elapsed_ms: f64,
}

fn main() {
    env_logger::init();
    let run_perf = run_with_timer(|| {
        if let Err(err) = run() {
            eprintln!("Error: {err}");
            std::process::exit(1);
        } else {
            Ok(())
        }
    });
    println!(
        "Total execution time: {:.2} ms",
        match run_perf {
            Ok(r) => r.elapsed_ms,
            Err(_) => 0.0,
        }
    );
}

fn run() -> Result<(), String> {
    let config = load_config_from_args()?;
    ensure_output_dir(&config)?;
    let total_start = Instant::now();

    let ResultWithTime {
        result: image,
        elapsed_ms: load_ms,
    } = run_with_timer(|| load_rgb_image(&config.input))?;

    let measurer = PlateMeasurer::new(config.measure.clone());
    let view = image.as_view();
    let outcome = measurer.measure(&view);

    let mut overlay = image.clone();
    if let Ok(plate) = &outcome {
        draw_lines(&mut overlay, &plate.coarse, config.overlay.coarse_color);
        let refined = plate.refined.map(|r| r.line);
        draw_lines(&mut overlay, &refined, config.overlay.refined_color);
    }
    save_rgb_u8(&overlay, &config.output.dir.join("overlay.png"))?;

    if config.overlay.save_mask {
        let params = measurer.params();
        let mask = if params.white_balance {
            let balanced = view.balance_white(params.white_balance_percent);
            plate_mask(&balanced.as_view(), &params.contour)
        } else {
            plate_mask(&view, &params.contour)
        };
        save_grayscale_u8(&mask, &config.output.dir.join("mask.png"))?;
    }

    let mut timings = TimingBreakdown::with_total(total_start.elapsed().as_secs_f64() * 1000.0);
    timings.push("load", load_ms);
    let (measurement, error) = match outcome {
        Ok(plate) => {
            for stage in &plate.timings.stages {
                timings.push(stage.label.clone(), stage.elapsed_ms);
            }
            (Some(plate), None)
        }
        Err(err) => {
            log::warn!("{}: plate not measured: {err}", config.input.display());
            (None, Some(err.to_string()))
        }
    };
    let report = PlateReport {
        input: InputDescriptor {
            path: config.input.display().to_string(),
            width: image.width(),
            height: image.height(),
        },
        measurement,
        error,
        timings,
    };

    let report_path = config.output.dir.join("report.json");
    write_json_file(&report_path, &report)?;
    match (report.height_px(), &report.error) {
        (Some(h), _) => println!("Plate height: {h:.4} px"),
        (None, Some(err)) => println!("Plate not measured: {err}"),
        (None, None) => {}
    }
    println!("Plate report written to {}", report_path.display());
    Ok(())
}

fn usage() -> String {
    "Usage: plate_height_demo <config.json>".to_string()
}

fn load_config_from_args() -> Result<PlateDemoConfig, String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    plate_demo::load_config(Path::new(&config_path))
}

fn ensure_output_dir(config: &PlateDemoConfig) -> Result<(), String> {
    fs::create_dir_all(&config.output.dir)
        .map_err(|e| format!("Failed to create {}: {e}", config.output.dir.display()))
}
