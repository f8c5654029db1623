//! Pure numeric transformations applied by pipeline layers.

use std::fmt;
use std::sync::Arc;

/// Predicate consulted by [`StatStep::ConditionalAdd`] each time its layer recomputes.
pub type StepCondition = Arc<dyn Fn() -> bool + Send + Sync>;

/// Arbitrary transformation for steps the built-in variants cannot express.
pub type StepFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A single stateless transformation `f64 -> f64`.
///
/// Steps are order-sensitive: `[Add(2), Multiply(3)]` and
/// `[Multiply(3), Add(2)]` produce different results. No step rounds; callers
/// that need whole damage numbers floor at the point of use.
#[derive(Clone)]
pub enum StatStep {
    /// Adds a constant.
    Add(f64),
    /// Multiplies by a constant.
    Multiply(f64),
    /// Raises the value to at least the given floor.
    ClampMin(f64),
    /// Adds `value` only while `condition` holds.
    ///
    /// The condition is read when the owning layer recomputes, so the owner
    /// must dirty the layer when the condition's inputs change.
    ConditionalAdd { value: f64, condition: StepCondition },
    /// Runs a caller-supplied transformation.
    Custom(StepFn),
}

impl StatStep {
    pub fn add(value: f64) -> Self {
        Self::Add(value)
    }

    pub fn multiply(factor: f64) -> Self {
        Self::Multiply(factor)
    }

    pub fn clamp_min(floor: f64) -> Self {
        Self::ClampMin(floor)
    }

    pub fn conditional_add(value: f64, condition: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self::ConditionalAdd {
            value,
            condition: Arc::new(condition),
        }
    }

    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Applies this step to `value`.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Add(n) => value + n,
            Self::Multiply(n) => value * n,
            Self::ClampMin(floor) => value.max(*floor),
            Self::ConditionalAdd { value: n, condition } => {
                if condition() {
                    value + n
                } else {
                    value
                }
            }
            Self::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for StatStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(n) => f.debug_tuple("Add").field(n).finish(),
            Self::Multiply(n) => f.debug_tuple("Multiply").field(n).finish(),
            Self::ClampMin(n) => f.debug_tuple("ClampMin").field(n).finish(),
            Self::ConditionalAdd { value, .. } => f
                .debug_struct("ConditionalAdd")
                .field("value", value)
                .finish_non_exhaustive(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
