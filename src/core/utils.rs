pub trait Sigmoid {
    fn sigmoid(self) -> Self;
}

impl Sigmoid for f32 {
    fn sigmoid(self) -> Self {
        1.0 / (1.0 + (-self).exp())
    }
}

impl Sigmoid for f64 {
    fn sigmoid(self) -> Self {
        1.0 / (1.0 + (-self).exp())
    }
}

/// Map `value` into [0, 1] relative to the running bounds. Collapsed or
/// untouched bounds give the neutral 0.5.
pub fn normalise(value: f64, low: f64, high: f64) -> f64 {
    if high > low {
        ((value - low) / (high - low)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Perturb `value` by a bounded random factor of magnitude `eps`, where
/// `roll` is a uniform draw from [0, 1). Breaks exact ties without
/// reordering scores that differ by more than the noise floor.
pub fn noise(value: f64, eps: f64, roll: f64) -> f64 {
    (value + eps) * (1.0 + eps * (roll - 0.5))
}
