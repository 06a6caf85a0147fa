//! Scale ladders
//!
//! A [`Scale`] is the ordered list of sibling ladder units within one
//! (dimension, system) pair, finest step first. Each step carries the
//! multiplier relative to the previous step, so the ladder encodes
//! pairwise factors instead of absolute ones. Converting toward a
//! coarser step divides the value, toward a finer step multiplies.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One rung of a scale ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleStep {
    pub name: String,
    /// How many of the previous (finer) step make one of this step.
    /// The first step carries 1.
    pub multiplier: f64,
    /// Whether best-fit walks may land on this step.
    pub common: bool,
}

impl ScaleStep {
    pub fn new(name: &str, multiplier: f64) -> Self {
        ScaleStep {
            name: name.to_string(),
            multiplier,
            common: true,
        }
    }

    /// Keep the step off the best-fit subset.
    pub fn uncommon(mut self) -> Self {
        self.common = false;
        self
    }
}

/// An ordered ladder of sibling steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    steps: Vec<ScaleStep>,
    base: Option<usize>,
}

impl Scale {
    /// Build a ladder; `base` names the designated base step. A base
    /// name that is not on the ladder leaves the base unset, which the
    /// registry rejects when it builds.
    pub fn new(steps: Vec<ScaleStep>, base: &str) -> Self {
        let base = steps.iter().position(|step| step.name == base);
        Scale { steps, base }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ScaleStep] {
        &self.steps
    }

    pub fn step(&self, position: usize) -> Option<&ScaleStep> {
        self.steps.get(position)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.name == name)
    }

    pub fn base_index(&self) -> Option<usize> {
        self.base
    }

    /// Factor that takes a value at `from` to the step at `to`.
    ///
    /// Toward a coarser step the intervening multipliers divide the
    /// value; toward a finer step they multiply it.
    pub fn step_multiplier(&self, from: usize, to: usize) -> f64 {
        match from.cmp(&to) {
            Ordering::Equal => 1.0,
            Ordering::Less => 1.0 / self.product(from + 1, to),
            Ordering::Greater => self.product(to + 1, from),
        }
    }

    fn product(&self, lo: usize, hi: usize) -> f64 {
        self.steps[lo..=hi].iter().map(|step| step.multiplier).product()
    }

    /// Factor that takes a value at `position` to the base step.
    pub fn to_base(&self, position: usize) -> Option<f64> {
        self.base.map(|base| self.step_multiplier(position, base))
    }

    /// One step coarser, saturating at the top of the ladder.
    pub fn up(&self, position: usize) -> usize {
        if self.steps.is_empty() {
            return position;
        }
        (position + 1).min(self.steps.len() - 1)
    }

    /// One step finer, saturating at the bottom.
    pub fn down(&self, position: usize) -> usize {
        position.saturating_sub(1)
    }

    /// Next coarser step marked common; `None` past the top.
    pub fn up_common(&self, position: usize) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .skip(position + 1)
            .find(|(_, step)| step.common)
            .map(|(index, _)| index)
    }

    /// Next finer step marked common; `None` past the bottom.
    pub fn down_common(&self, position: usize) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .take(position)
            .rev()
            .find(|(_, step)| step.common)
            .map(|(index, _)| index)
    }

    /// Positions of the common subset, finest first.
    pub fn common_positions(&self) -> Vec<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.common)
            .map(|(index, _)| index)
            .collect()
    }
}
