use lane_estimator::config::lane::{self, RuntimeConfig};
use lane_estimator::control::SteeringController;
use lane_estimator::image::io::{load_rgb_image, save_mask_png, save_rgb_png, write_json_file};
use lane_estimator::overlay::render_lane_overlay;
use lane_estimator::{DetailedFrame, FrameReport, LanePipeline, TrackingState};
use log::warn;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameRecord<'a> {
    input: &'a Path,
    report: &'a FrameReport,
    command: lane_estimator::control::ControlCommand,
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "lane_demo".to_string());
    let config = lane::parse_cli(&program)?;
    let Some(first) = config.inputs.first() else {
        return Err("config lists no inputs".to_string());
    };

    let first_frame = load_rgb_image(first).map_err(|e| e.to_string())?;
    let calibration = config.calibration_for(first_frame.width(), first_frame.height());
    let pipeline = LanePipeline::new(&calibration, config.params.clone())
        .map_err(|e| format!("Invalid calibration: {e}"))?;
    let mut state = TrackingState::new();
    let mut controller = config.control.build();
    let mut records = Vec::with_capacity(config.inputs.len());

    for (index, input) in config.inputs.iter().enumerate() {
        let frame = if index == 0 {
            first_frame.clone()
        } else {
            load_rgb_image(input).map_err(|e| e.to_string())?
        };
        let detailed = match pipeline.process_with_diagnostics(&frame.as_view(), &mut state) {
            Ok(detailed) => detailed,
            Err(err) => {
                eprintln!("Skipping {}: {err}", input.display());
                continue;
            }
        };
        let command = controller.update(&detailed.report);

        if config.output.format.includes_text() {
            print_text_summary(input, &detailed, controller.as_ref());
        }
        if let Some(dir) = &config.output.debug_dir {
            let frame_dir = dir.join(format!("frame_{index:04}"));
            let saved = save_debug_artifacts(&frame_dir, &config, &pipeline, &frame, &detailed);
            if let Err(err) = saved {
                warn!("debug output for {} skipped: {err}", input.display());
            }
        }
        records.push((input.clone(), detailed.report, command));
    }

    if config.output.format.includes_json() {
        let json_records: Vec<FrameRecord> = records
            .iter()
            .map(|(input, report, command)| FrameRecord {
                input,
                report,
                command: *command,
            })
            .collect();
        if let Some(path) = &config.output.json_out {
            write_json_file(path, &json_records).map_err(|e| e.to_string())?;
            println!("JSON report written to {}", path.display());
        } else {
            let json = serde_json::to_string_pretty(&json_records)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }

    Ok(())
}

fn print_text_summary(input: &Path, detailed: &DetailedFrame, controller: &dyn SteeringController) {
    let report = &detailed.report;
    println!("Frame {} ({})", report.frame_index, input.display());
    println!("  status: {:?}", report.status);
    match &report.estimate {
        Some(est) => {
            println!("  offset_cm: {:.1}", est.offset_cm());
            println!(
                "  radius_m: left={} right={} mean={:.0} ({:?})",
                format_opt(est.radius_m.left),
                format_opt(est.radius_m.right),
                est.mean_radius_m,
                est.curve_direction
            );
        }
        None => println!("  estimate: none"),
    }
    for (side, s) in report.sides.iter() {
        println!(
            "  {}: search={:?} base={} pixels={} source={:?}{}",
            side.as_str(),
            s.search,
            s.base_x.map_or_else(|| "-".to_string(), |x| x.to_string()),
            s.pixel_count,
            s.source,
            s.issue
                .map(|issue| format!(" issue={issue:?}"))
                .unwrap_or_default()
        );
    }
    let cmd = controller.last_command();
    let (steer, pedal) = cmd.discretize(0.1);
    println!(
        "  command: steering={:.3} throttle={:.3} keys=({steer:?}, {pedal:?})",
        cmd.steering, cmd.throttle
    );
    let stages: Vec<String> = report
        .timing
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "  timings (ms): {} total={:.3}",
        stages.join(" "),
        report.timing.total_ms
    );
}

fn format_opt(val: Option<f64>) -> String {
    val.map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn save_debug_artifacts(
    dir: &Path,
    config: &RuntimeConfig,
    pipeline: &LanePipeline,
    frame: &lane_estimator::image::RgbImage8,
    detailed: &DetailedFrame,
) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;
    let diag = &detailed.diagnostics;

    write_json_file(&dir.join("report.json"), &detailed.report).map_err(|e| e.to_string())?;
    write_json_file(&dir.join("windows.json"), &diag.windows).map_err(|e| e.to_string())?;
    write_json_file(&dir.join("histogram.json"), &diag.histogram).map_err(|e| e.to_string())?;
    if let Some(binary) = &diag.binary {
        save_mask_png(binary, &dir.join("binary.png")).map_err(|e| e.to_string())?;
    }
    save_mask_png(&diag.top_down, &dir.join("top_down.png")).map_err(|e| e.to_string())?;

    let fits = diag.fits.as_ref().map(|_, f| f.as_ref());
    let overlay = render_lane_overlay(
        &frame.as_view(),
        pipeline.transformer(),
        fits,
        &config.overlay,
    )
    .map_err(|e| e.to_string())?;
    save_rgb_png(&overlay, &dir.join("overlay.png")).map_err(|e| e.to_string())?;
    Ok(())
}
