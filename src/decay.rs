use crate::error::ConfigError;

/// A value that falls over time, used for the exploration rate
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;

    /// The two values the schedule moves between, `(initial, final)`
    ///
    /// For every `t >= 0` the schedule produces a value between them.
    fn endpoints(&self) -> (f32, f32);
}

/// Every schedule starts at `vi` and falls toward `vf` at a non-negative `rate`
fn validate(rate: f32, vi: f32, vf: f32) -> Result<(), ConfigError> {
    if !(rate >= 0.0) {
        return Err(ConfigError::Decay("`rate` must be non-negative"));
    }
    (vi > vf)
        .then_some(())
        .ok_or(ConfigError::Decay("`vi` must be greater than `vf`"))
}

/// A constant value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }

    fn endpoints(&self) -> (f32, f32) {
        (self.value, self.value)
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Exponential {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Exponential {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self, ConfigError> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) * (-rate * t).exp()
    }

    fn endpoints(&self) -> (f32, f32) {
        (self.vi, self.vf)
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) / (1 + rt)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InverseTime {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl InverseTime {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self, ConfigError> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for InverseTime {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) / (1.0 + rate * t)
    }

    fn endpoints(&self) -> (f32, f32) {
        (self.vi, self.vf)
    }
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Linear {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Linear {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self, ConfigError> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        (vi - rate * t).max(vf)
    }

    fn endpoints(&self) -> (f32, f32) {
        (self.vi, self.vf)
    }
}

/// v(t) = max(v<sub>i</sub> * r<sup>floor(t/s)</sup>, v<sub>f</sub>)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Step {
    rate: f32,
    vi: f32,
    vf: f32,
    step: f32,
}

impl Step {
    pub fn new(rate: f32, vi: f32, vf: f32, step: f32) -> Result<Self, ConfigError> {
        if !(rate > 0.0 && rate < 1.0) {
            return Err(ConfigError::Decay("step decay needs a `rate` in (0, 1)"));
        }
        if step <= 0.0 {
            return Err(ConfigError::Decay("step decay needs a positive `step`"));
        }
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf, step })
    }
}

impl Decay for Step {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf, step } = self;
        (vi * rate.powf((t / step).floor())).max(vf)
    }

    fn endpoints(&self) -> (f32, f32) {
        (self.vi, self.vf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 1.0, 0.0).is_ok());
        assert!(validate(0.0, 1.0, 0.0).is_ok());
        assert!(validate(1.0, -1.0, 0.0).is_err());
        assert!(validate(1.0, 0.5, 0.5).is_err());
        assert!(validate(-1.0, 1.0, 0.0).is_err());
        assert!(validate(-1.0, 0.0, 0.5).is_err());
        assert!(validate(f32::NAN, 1.0, 0.0).is_err());
    }

    #[test]
    fn rising_schedules_are_rejected() {
        assert!(Exponential::new(-1.0, 0.0, 0.5).is_err());
        assert!(InverseTime::new(-0.5, 0.0, 0.5).is_err());
        assert!(Linear::new(-0.25, 0.5, 1.0).is_err());
        assert!(Step::new(1.5, 0.5, 1.0, 1.0).is_err());
    }

    fn assert_within_endpoints(decay: &dyn Decay) {
        let (vi, vf) = decay.endpoints();
        let (lo, hi) = (vi.min(vf), vi.max(vf));
        for t in 0..2000 {
            let v = decay.evaluate(t as f32 * 0.25);
            assert!((lo..=hi).contains(&v), "{v} at t = {} outside [{lo}, {hi}]", t as f32 * 0.25);
        }
    }

    #[test]
    fn schedules_stay_between_endpoints() {
        assert_within_endpoints(&Constant::new(0.2));
        assert_within_endpoints(&Exponential::new(1.0, 1.0, 0.25).unwrap());
        assert_within_endpoints(&Exponential::new(0.0, 0.5, 0.0).unwrap());
        assert_within_endpoints(&InverseTime::new(0.5, 1.0, 0.25).unwrap());
        assert_within_endpoints(&Linear::new(0.01, 1.0, 0.0).unwrap());
        assert_within_endpoints(&Step::new(0.5, 1.0, 0.01, 3.0).unwrap());
    }

    #[test]
    fn constant_decay() {
        let x = Constant::new(0.3);
        assert_eq!(x.evaluate(0.0), 0.3);
        assert_eq!(x.evaluate(1000.0), 0.3);
        assert_eq!(x.endpoints(), (0.3, 0.3));
    }

    #[test]
    fn exponential_decay() {
        let x = Exponential::new(2.0, 1.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1.0), 0.5 + 0.5 * f32::exp(-2.0));
    }

    #[test]
    fn inverse_time_decay() {
        let x = InverseTime::new(2.0, 1.0, 0.25).unwrap();
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1.0), 0.5);
    }

    #[test]
    fn linear_decay() {
        let x = Linear::new(0.25, 1.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1.0), 0.75);
        assert_eq!(x.evaluate(10.0), 0.5);
    }

    #[test]
    fn step_decay() {
        let x = Step::new(0.5, 1.0, 0.0, 2.0).unwrap();
        assert_eq!(x.evaluate(1.0), 1.0);
        assert_eq!(x.evaluate(2.0), 0.5);
        assert_eq!(x.evaluate(5.0), 0.25);
        assert!(Step::new(0.5, 1.0, 0.0, 0.0).is_err());
    }
}
