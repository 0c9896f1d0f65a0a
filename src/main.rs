use ellipse_detector::image::ImageU8;
use ellipse_detector::{DetectorParams, EllipseDetector};

fn main() {
    // Demo: render a filled ellipse on a dark 640x480 frame and detect it
    let (w, h) = (640usize, 480usize);
    let (cx, cy, a, b, angle) = (320.0f32, 240.0f32, 120.0f32, 70.0f32, 0.4f32);
    let (s, c) = angle.sin_cos();
    let mut gray = vec![30u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let u = dx * c + dy * s;
            let v = -dx * s + dy * c;
            if (u / a).powi(2) + (v / b).powi(2) <= 1.0 {
                gray[y * w + x] = 220;
            }
        }
    }

    let mut det = match EllipseDetector::with_params(DetectorParams::default()) {
        Ok(det) => det,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    match det.detect(ImageU8::new(w, h, &gray)) {
        Ok(ellipses) => {
            println!("found={} latency_ms={:.3}", ellipses.len(), det.exec_time_ms());
            for e in &ellipses {
                println!(
                    "  center=({:.1}, {:.1}) axes=({:.1}, {:.1}) angle={:.1}° score={:.2} rel={:.2}",
                    e.cx,
                    e.cy,
                    e.semi_major,
                    e.semi_minor,
                    e.angle.to_degrees(),
                    e.score,
                    e.reliability
                );
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
