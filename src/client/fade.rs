//! One-shot fade-in activation for page sections.

use serde::{Deserialize, Serialize};

/// An element marked for fade-in, positioned in page coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FadeTarget {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The visible slice of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    fn intersects(&self, target: &FadeTarget) -> bool {
        let bottom = self.top + self.height;
        if target.height <= 0.0 {
            // A zero-area element counts once it sits inside the viewport, edges included.
            return target.top >= self.top && target.top <= bottom;
        }
        target.top < bottom && target.top + target.height > self.top
    }
}

#[derive(Debug)]
struct Tracked {
    target: FadeTarget,
    active: bool,
}

/// Marks targets active the first time they overlap the viewport. Activation
/// is permanent.
#[derive(Debug, Default)]
pub struct FadeObserver {
    tracked: Vec<Tracked>,
}

impl FadeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `target`. Watching the same id twice is a no-op.
    pub fn observe(&mut self, target: FadeTarget) {
        if self.tracked.iter().any(|t| t.target.id == target.id) {
            return;
        }
        self.tracked.push(Tracked {
            target,
            active: false,
        });
    }

    /// Apply a viewport change and return the ids activated by it.
    pub fn update(&mut self, viewport: Viewport) -> Vec<String> {
        self.tracked
            .iter_mut()
            .filter(|t| !t.active && viewport.intersects(&t.target))
            .map(|t| {
                t.active = true;
                t.target.id.clone()
            })
            .collect()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.tracked.iter().any(|t| t.active && t.target.id == id)
    }

    pub fn active_ids(&self) -> Vec<String> {
        self.tracked
            .iter()
            .filter(|t| t.active)
            .map(|t| t.target.id.clone())
            .collect()
    }
}
