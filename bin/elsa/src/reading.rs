use mcu::{Command, SensorKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub kind: SensorKind,
    pub value: f64,
    pub source: Command,
}

impl Reading {
    pub fn new(source: Command, value: f64) -> Self {
        Self {
            kind: source.kind(),
            value,
            source,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid(self.value, self.kind)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregatedReading {
    pub kind: SensorKind,
    pub value: f64,
    pub sources: usize,
}

/// Strict range check; NaN and infinities never pass.
pub fn is_valid(value: f64, kind: SensorKind) -> bool {
    let (min, max) = kind.range();
    value > min && value < max
}

/// Mean of the valid readings of `kind`, or `None` when there are none.
pub fn aggregate(readings: &[Reading], kind: SensorKind) -> Option<AggregatedReading> {
    let mut values: Vec<f64> = readings
        .iter()
        .filter(|reading| reading.kind == kind && reading.is_valid())
        .map(|reading| reading.value)
        .collect();

    if values.is_empty() {
        return None;
    }

    // summation order is fixed so the mean does not depend on arrival order
    values.sort_by(f64::total_cmp);

    let sum: f64 = values.iter().sum();

    Some(AggregatedReading {
        kind,
        value: sum / values.len() as f64,
        sources: values.len(),
    })
}
