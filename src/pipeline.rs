//! Ordered blend pipeline
//!
//! Steps run in insertion order. Each step gets the previous step's output as
//! `fg`; position and the original display pixel pass through unchanged.

use std::fmt;

use crate::effects::{BlendEffect, Capabilities};

pub struct Pipeline {
    /// Each step with the capabilities it declared when added
    steps: Vec<(Box<dyn BlendEffect>, Capabilities)>,
    read_background: bool,
    background_as_source: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            read_background: true,
            background_as_source: false,
        }
    }

    /// Append a step and fold its capabilities into the pipeline flags.
    /// Flags only ever turn on here; `clear` resets them.
    pub fn add_step(&mut self, step: impl BlendEffect + 'static) {
        self.push(Box::new(step));
    }

    pub fn extend(&mut self, steps: Vec<Box<dyn BlendEffect>>) {
        for step in steps {
            self.push(step);
        }
    }

    fn push(&mut self, step: Box<dyn BlendEffect>) {
        let caps = step.capabilities();
        let Capabilities {
            needs_background,
            background_as_source,
        } = caps;

        // An empty pipeline reads by default, the first step decides for itself
        if self.steps.is_empty() {
            self.read_background = needs_background;
        } else {
            self.read_background |= needs_background;
        }
        self.background_as_source |= background_as_source;
        if self.background_as_source {
            self.read_background = true;
        }

        self.steps.push((step, caps));
    }

    /// Run every step over one pixel
    #[inline]
    pub fn apply(&self, x: i32, y: i32, fg: u16, bg: u16) -> u16 {
        let mut color = fg;
        for (step, caps) in &self.steps {
            let input = if caps.background_as_source {
                bg
            } else {
                color
            };
            color = step.blend(x, y, input, bg);
        }
        color
    }

    pub fn clear(&mut self) {
        self.steps.clear();
        self.read_background = true;
        self.background_as_source = false;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether drawing must sample the display before blending
    #[inline]
    pub fn read_background(&self) -> bool {
        self.read_background
    }

    /// Whether some step replaces its input with the display pixel
    #[inline]
    pub fn background_as_source(&self) -> bool {
        self.background_as_source
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.steps.len())
            .field("read_background", &self.read_background)
            .field("background_as_source", &self.background_as_source)
            .finish()
    }
}
