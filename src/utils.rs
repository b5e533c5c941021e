use rust_decimal::prelude::*;

/// Format a value with an SI suffix, rounded to `digits` significant figures.
pub fn format_si(value: &f64, digits: u32) -> String {
    fn set_suffix(thousands: i8) -> String {
        const POSITIVE: [&str; 9] = ["", "k", "M", "G", "T", "P", "E", "Z", "Y"];
        const NEGATIVE: [&str; 9] = ["", "m", "μ", "n", "p", "f", "a", "z", "y"];
        let suffix = if thousands < 0 && thousands >= -8 {
            NEGATIVE[(thousands * -1) as usize]
        } else if thousands >= 0 && thousands <= 8 {
            POSITIVE[thousands as usize]
        } else {
            ""
        };
        suffix.to_string()
    }

    if *value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }
    let magnitude = value.abs().log10().floor() as i32;
    let thousands = if magnitude < 0 {
        (magnitude - 2) / 3
    } else {
        magnitude / 3
    };
    let thousands = thousands.clamp(-8, 8) as i8;
    let prefix = value / 10f64.powi(3 * thousands as i32);
    let rounded = match Decimal::from_f64_retain(prefix) {
        Some(d) => match d.round_sf_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero) {
            Some(r) => r.normalize().to_string(),
            None => d.normalize().to_string(),
        },
        None => format!("{}", prefix),
    };

    let suffix = set_suffix(thousands);
    format!("{}{}", rounded, suffix)
}

/// Step between ticks so that no more than `count` ticks cover `domain`.
///
/// Steps are drawn from the 1, 2, 2.5, 5 ladder at the power of ten
/// closest below `span / count`.
pub fn tick_step(domain: &[f64; 2], count: usize) -> f64 {
    let span = (domain[1] - domain[0]).abs();
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let target = count.max(1) as f64;
    let divisor = 10f64.powf((span / target).log10().floor());
    let steps = [1.0, 2.0, 2.5, 5.0, 10.0];
    for multiple in steps.iter() {
        let step = divisor * multiple;
        if span / step <= target {
            return step;
        }
    }
    divisor * 10.0
}

/// Nicely spaced tick values inside `domain` (which may be descending).
pub fn ticks(domain: &[f64; 2], count: usize) -> Vec<f64> {
    let step = tick_step(domain, count);
    let (lo, hi) = if domain[0] <= domain[1] {
        (domain[0], domain[1])
    } else {
        (domain[1], domain[0])
    };
    if step == 0.0 {
        return if lo.is_finite() { vec![lo] } else { vec![] };
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Cubic in-out easing on `t` in `[0, 1]`.
pub fn ease_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_si() {
        assert_eq!(format_si(&2500.0, 3), "2.5k");
        assert_eq!(format_si(&40.0, 3), "40");
        assert_eq!(format_si(&0.0, 3), "0");
        assert_eq!(format_si(&0.005, 3), "5m");
        assert_eq!(format_si(&-1500000.0, 3), "-1.5M");
    }

    #[test]
    fn test_format_si_out_of_suffix_range() {
        assert!(format_si(&1e-130, 3).ends_with('y'));
        assert!(format_si(&-1e-300, 3).ends_with('y'));
        assert!(format_si(&1e200, 3).ends_with('Y'));
    }

    #[test]
    fn test_ticks() {
        assert!(approx_eq(tick_step(&[0.0, 1.0], 10), 0.1, 1e-12));
        assert_eq!(tick_step(&[0.0, 40.0], 5), 10.0);
        assert_eq!(ticks(&[0.0, 40.0], 5), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(ticks(&[40.0, 0.0], 5), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(ticks(&[3.0, 3.0], 5), vec![3.0]);
    }

    #[test]
    fn test_ease_cubic() {
        assert_eq!(ease_cubic(0.0), 0.0);
        assert_eq!(ease_cubic(0.5), 0.5);
        assert_eq!(ease_cubic(1.0), 1.0);
        assert!(ease_cubic(0.25) < 0.25);
    }
}
