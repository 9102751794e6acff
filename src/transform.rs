use egui::Vec2;

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;
pub const ZOOM_STEP: f32 = 1.2;

/// Scale that fits the image into the viewport without exceeding the image's
/// native size. Returns 1.0 when either natural dimension is zero.
pub fn fit_scale(natural: Vec2, viewport: Vec2) -> f32 {
    if natural.x <= 0.0 || natural.y <= 0.0 {
        return 1.0;
    }
    (viewport.x / natural.x)
        .min(viewport.y / natural.y)
        .min(1.0)
}

/// Multiplicative zoom steps so each click feels perceptually even.
pub fn zoom_in(scale: f32) -> f32 {
    (scale * ZOOM_STEP).min(MAX_SCALE)
}

pub fn zoom_out(scale: f32) -> f32 {
    (scale / ZOOM_STEP).max(MIN_SCALE)
}

#[cfg(test)]
mod tests {
    use super::{fit_scale, zoom_in, zoom_out, MAX_SCALE, MIN_SCALE};
    use egui::vec2;

    #[test]
    fn fit_scale_never_upscales() {
        assert_eq!(fit_scale(vec2(400.0, 300.0), vec2(1600.0, 1200.0)), 1.0);
        assert_eq!(fit_scale(vec2(800.0, 600.0), vec2(800.0, 600.0)), 1.0);
    }

    #[test]
    fn fit_scale_uses_tighter_axis() {
        let scale = fit_scale(vec2(1000.0, 500.0), vec2(500.0, 500.0));
        assert_eq!(scale, 0.5);

        let scale = fit_scale(vec2(500.0, 1000.0), vec2(500.0, 250.0));
        assert_eq!(scale, 0.25);
    }

    #[test]
    fn fit_scale_stays_within_bound() {
        for (nw, nh, vw, vh) in [
            (640.0, 480.0, 1024.0, 768.0),
            (3000.0, 2000.0, 900.0, 700.0),
            (123.0, 457.0, 800.0, 600.0),
        ] {
            let scale = fit_scale(vec2(nw, nh), vec2(vw, vh));
            assert!(scale > 0.0 && scale <= 1.0);
            assert!(scale <= (vw / nw).min(vh / nh) + f32::EPSILON);
        }
    }

    #[test]
    fn fit_scale_guards_zero_dimensions() {
        assert_eq!(fit_scale(vec2(0.0, 600.0), vec2(800.0, 600.0)), 1.0);
        assert_eq!(fit_scale(vec2(800.0, 0.0), vec2(800.0, 600.0)), 1.0);
    }

    #[test]
    fn zoom_in_sequence_is_multiplicative() {
        let mut scale = 1.0;
        scale = zoom_in(scale);
        assert!((scale - 1.2).abs() < 1e-5);
        scale = zoom_in(scale);
        assert!((scale - 1.44).abs() < 1e-5);
        scale = zoom_in(scale);
        assert!((scale - 1.728).abs() < 1e-5);
    }

    #[test]
    fn zoom_converges_to_clamps_and_stays() {
        let mut scale = 0.4;
        for _ in 0..64 {
            scale = zoom_in(scale);
        }
        assert_eq!(scale, MAX_SCALE);
        assert_eq!(zoom_in(scale), MAX_SCALE);

        for _ in 0..64 {
            scale = zoom_out(scale);
        }
        assert_eq!(scale, MIN_SCALE);
        assert_eq!(zoom_out(scale), MIN_SCALE);
    }
}
