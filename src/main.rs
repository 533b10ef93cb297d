use lane_estimator::image::RgbImage8;
use lane_estimator::{Calibration, LaneDetector, LaneParams};

fn main() {
    env_logger::init();

    // Demo stub: a dark road with two bright vertical stripes in the lower
    // half, processed for a few frames so the prior-guided search kicks in.
    let (w, h) = (640usize, 480usize);
    let mut frame = RgbImage8::filled(w, h, [40, 40, 40]);
    for y in h / 2..h {
        for x in [w / 2 - 120, w / 2 + 120] {
            for dx in 0..6 {
                frame.set(x + dx, y, [255, 255, 255]);
            }
        }
    }

    let calibration = Calibration::proportional(w, h);
    let mut det = match LaneDetector::new(&calibration, LaneParams::default()) {
        Ok(det) => det,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    for _ in 0..3 {
        match det.process(&frame.as_view()) {
            Ok(report) => match &report.estimate {
                Some(est) => println!(
                    "frame={} status={:?} offset_cm={:.1} radius_m={:.0} latency_ms={:.3}",
                    report.frame_index,
                    report.status,
                    est.offset_cm(),
                    est.mean_radius_m,
                    report.timing.total_ms
                ),
                None => println!(
                    "frame={} status={:?} latency_ms={:.3}",
                    report.frame_index, report.status, report.timing.total_ms
                ),
            },
            Err(err) => eprintln!("Error: {err}"),
        }
    }
}
