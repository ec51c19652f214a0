use crate::error::ValidationError;
use crate::types::WorkoutKind;

/// Raw field values as typed into the workout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// Coerced values, ready for validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Submission {
    pub kind: WorkoutKind,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Cadence for running, elevation gain for cycling.
    pub metric: f64,
}

impl FormInput {
    pub fn coerce(&self) -> Result<Submission, ValidationError> {
        let kind: WorkoutKind = self.kind.parse()?;
        let metric = match kind {
            WorkoutKind::Running => &self.cadence,
            WorkoutKind::Cycling => &self.elevation,
        };
        Ok(Submission {
            kind,
            distance_km: coerce_number(&self.distance),
            duration_min: coerce_number(&self.duration),
            metric: coerce_number(metric),
        })
    }
}

/// Numeric coercion of a form field: blank is zero, garbage is NaN.
///
/// Decimal and exponent notation, `Infinity`, and unsigned `0x`/`0o`/`0b`
/// literals are understood, the same as a browser coerces an input value.
/// Validation then rejects NaN and zero, so an empty field reads as "not
/// positive" and a typo as "not a number".
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(v) = radix_literal(s) {
        return v;
    }
    match s {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust would accept these; a form must not.
        _ if s.eq_ignore_ascii_case("inf")
            || s.eq_ignore_ascii_case("+inf")
            || s.eq_ignore_ascii_case("-inf")
            || s.eq_ignore_ascii_case("infinity")
            || s.eq_ignore_ascii_case("+infinity")
            || s.eq_ignore_ascii_case("-infinity")
            || s.eq_ignore_ascii_case("nan") =>
        {
            f64::NAN
        }
        _ => s.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// `0x1F`, `0o17`, `0b101`. A prefix with bad or missing digits is NaN.
fn radix_literal(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
    });
    Some(value.unwrap_or(f64::NAN))
}
