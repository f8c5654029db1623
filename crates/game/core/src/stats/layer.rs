//! Memoized pipeline layers.
//!
//! A layer caches the value it produced together with the value that flowed
//! into it. A clean layer is reused only while its input is unchanged, and
//! dirtying a layer dirties everything after it, because an earlier layer's
//! new output invalidates every later cache.

use super::step::StatStep;

/// One named tier of modification to a single stat.
#[derive(Clone, Debug)]
pub struct PipelineLayer {
    steps: Vec<StatStep>,
    cached_input: f64,
    cached_result: f64,
    dirty: bool,
}

impl PipelineLayer {
    /// Creates a dirty layer. The NaN input sentinel never compares equal, so
    /// the first read always runs the steps.
    pub fn new(steps: Vec<StatStep>) -> Self {
        Self {
            steps,
            cached_input: f64::NAN,
            cached_result: f64::NAN,
            dirty: true,
        }
    }

    pub fn steps(&self) -> &[StatStep] {
        &self.steps
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn run(&mut self, input: f64) -> f64 {
        if !self.dirty && self.cached_input == input {
            return self.cached_result;
        }

        let output = self.steps.iter().fold(input, |value, step| step.apply(value));
        self.cached_input = input;
        self.cached_result = output;
        self.dirty = false;
        output
    }
}

/// Creates a new layer (alias kept for call sites that read as a pipeline recipe).
pub fn create_layer(steps: Vec<StatStep>) -> PipelineLayer {
    PipelineLayer::new(steps)
}

/// Marks every layer at or after `from` as dirty.
pub fn dirty_layers(layers: &mut [PipelineLayer], from: usize) {
    for layer in layers.iter_mut().skip(from) {
        layer.dirty = true;
    }
}

/// Walks `layers` in order and returns the final value.
///
/// This is the only read path; there is no separate peek.
pub fn compute_layered(base: f64, layers: &mut [PipelineLayer]) -> f64 {
    layers.iter_mut().fold(base, |value, layer| layer.run(value))
}

/// Replaces the steps of `layers[index]` wholesale and invalidates it and every
/// later layer. Steps are never patched in place.
pub fn rebuild_layer(layers: &mut [PipelineLayer], index: usize, steps: Vec<StatStep>) {
    if let Some(layer) = layers.get_mut(index) {
        layer.steps = steps;
        dirty_layers(layers, index);
    }
}
