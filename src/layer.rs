use crate::error::ConfigurationError;
use crate::math;

/// A single computation node: the assigned raw value and its activation.
#[derive(Clone, Copy, Debug)]
struct Unit {
    raw: f64,
    activated: f64,
}

impl Unit {
    fn new() -> Unit {
        Unit {
            raw: 0.0,
            activated: 0.0,
        }
    }

    /// Assigns a raw value. The activated slot is seeded with the same value
    /// until the next activation pass.
    fn assign(&mut self, value: f64) {
        self.raw = value;
        self.activated = value;
    }

    /// Recomputes the activated value from the raw slot.
    fn activate(&mut self) {
        self.activated = math::sigmoid(self.raw);
    }
}

/// A fixed-size ordered collection of units.
///
/// Unit order is the creation order and never changes; the connection math
/// relies on it for row/column correspondence.
#[derive(Clone, Debug)]
pub struct Layer {
    units: Vec<Unit>,
}

impl Layer {
    /// Creates a layer of `size` zeroed units. A layer must hold at least
    /// one unit.
    pub fn new(size: usize) -> Result<Layer, ConfigurationError> {
        if size == 0 {
            return Err(ConfigurationError::EmptyLayer);
        }
        Ok(Layer {
            units: vec![Unit::new(); size],
        })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Assigns one raw value per unit, in order. `values` must match the
    /// layer size exactly.
    pub fn set_values(&mut self, values: &[f64]) {
        assert_eq!(values.len(), self.len());
        for (unit, &value) in self.units.iter_mut().zip(values) {
            unit.assign(value);
        }
    }

    /// Returns the activated values, in unit order.
    pub fn values(&self) -> Vec<f64> {
        self.units.iter().map(|unit| unit.activated).collect()
    }

    /// Returns the raw (pre-activation) values, in unit order.
    pub fn raw_values(&self) -> Vec<f64> {
        self.units.iter().map(|unit| unit.raw).collect()
    }

    /// Recomputes every unit's activated value from its raw value.
    pub fn activate(&mut self) {
        for unit in &mut self.units {
            unit.activate();
        }
    }
}
