//! Blend effects
//!
//! An effect maps `(x, y, fg, bg)` to a new RGB565 color, where `fg` is the
//! color being drawn (or the previous pipeline step's output) and `bg` is the
//! pixel already on the display. Effects are immutable once built; anything
//! they capture (alpha level, mask texture) is read-only while drawing.

mod alpha;
mod basic;
mod grayscale;
mod mask;

pub use alpha::{alpha_blend, Alpha};
pub use basic::{additive, subtract, Additive, Inverse, Subtract};
pub use grayscale::{grayscale, luminance, Grayscale};
pub use mask::ImageMask;

/// Static capabilities an effect declares to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The effect reads `bg`. When no step needs it the display read is skipped.
    pub needs_background: bool,
    /// The effect takes the current display pixel as its `fg` input
    pub background_as_source: bool,
}

impl Capabilities {
    pub const DEFAULT: Self = Self {
        needs_background: true,
        background_as_source: false,
    };

    pub const NO_BACKGROUND: Self = Self {
        needs_background: false,
        background_as_source: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single pixel transform in a blend pipeline
pub trait BlendEffect {
    fn blend(&self, x: i32, y: i32, fg: u16, bg: u16) -> u16;

    fn capabilities(&self) -> Capabilities {
        Capabilities::DEFAULT
    }
}

/// Plain closures are effects with default capabilities
impl<F> BlendEffect for F
where
    F: Fn(i32, i32, u16, u16) -> u16,
{
    #[inline]
    fn blend(&self, x: i32, y: i32, fg: u16, bg: u16) -> u16 {
        self(x, y, fg, bg)
    }
}

/// Pins a closure to the effect signature so its arguments need no annotations
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(i32, i32, u16, u16) -> u16,
{
    f
}

/// An ordered list of effects acting as a single effect.
/// Member capabilities are read once, when the chain is built.
pub struct Chain {
    effects: Vec<Box<dyn BlendEffect>>,
    /// Per member: take `bg` as input instead of the running color
    from_background: Vec<bool>,
    caps: Capabilities,
}

impl Chain {
    pub fn new(effects: Vec<Box<dyn BlendEffect>>) -> Self {
        let mut caps = Capabilities::NO_BACKGROUND;
        let from_background = effects
            .iter()
            .map(|effect| {
                let member = effect.capabilities();
                caps.needs_background |= member.needs_background;
                caps.background_as_source |= member.background_as_source;
                member.background_as_source
            })
            .collect();
        Self {
            effects,
            from_background,
            caps,
        }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl BlendEffect for Chain {
    #[inline]
    fn blend(&self, x: i32, y: i32, fg: u16, bg: u16) -> u16 {
        self.effects
            .iter()
            .zip(&self.from_background)
            .fold(fg, |current, (effect, &from_background)| {
                let input = if from_background { bg } else { current };
                effect.blend(x, y, input, bg)
            })
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

/// Marks an effect (or a chain) as not reading the display
pub struct NoBackground<E> {
    inner: E,
}

impl<E: BlendEffect> BlendEffect for NoBackground<E> {
    #[inline]
    fn blend(&self, x: i32, y: i32, fg: u16, bg: u16) -> u16 {
        self.inner.blend(x, y, fg, bg)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            needs_background: false,
            ..self.inner.capabilities()
        }
    }
}

/// Feeds the display pixel into the wrapped effect instead of the drawn color.
/// Wrapping a chain hands `bg` to its first member; later members chain as usual.
pub struct BackgroundAsSource<E> {
    inner: E,
}

impl<E: BlendEffect> BlendEffect for BackgroundAsSource<E> {
    #[inline]
    fn blend(&self, x: i32, y: i32, _fg: u16, bg: u16) -> u16 {
        self.inner.blend(x, y, bg, bg)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            needs_background: true,
            background_as_source: true,
        }
    }
}

pub fn no_background<E: BlendEffect>(inner: E) -> NoBackground<E> {
    NoBackground { inner }
}

pub fn background_as_source<E: BlendEffect>(inner: E) -> BackgroundAsSource<E> {
    BackgroundAsSource { inner }
}

/// Build a `Vec<Box<dyn BlendEffect>>` from effect expressions
#[macro_export]
macro_rules! effects {
    ($($effect:expr),* $(,)?) => {
        vec![$(Box::new($effect) as Box<dyn $crate::effects::BlendEffect>),*]
    };
}

/// Build a [`Chain`] from effect expressions
#[macro_export]
macro_rules! chain {
    ($($effect:expr),* $(,)?) => {
        $crate::effects::Chain::new($crate::effects![$($effect),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_closure_default_capabilities() {
        let effect = from_fn(|_, _, fg, _| fg);
        assert_eq!(effect.capabilities(), Capabilities::DEFAULT);
        assert_eq!(effect.blend(0, 0, 0x1234, 0), 0x1234);
    }

    #[test]
    fn test_no_background_wrapper() {
        let wrapped = no_background(Alpha::new(128));
        assert!(!wrapped.capabilities().needs_background);
        assert!(!wrapped.capabilities().background_as_source);
    }

    #[test]
    fn test_background_as_source_single() {
        let seen = RefCell::new(None);
        let spy = from_fn(|_, _, fg, bg| {
            *seen.borrow_mut() = Some((fg, bg));
            fg
        });
        let wrapped = background_as_source(spy);
        assert_eq!(wrapped.blend(0, 0, 0xAAAA, 0x5555), 0x5555);
        assert_eq!(*seen.borrow(), Some((0x5555, 0x5555)));
        assert!(wrapped.capabilities().background_as_source);
        assert!(wrapped.capabilities().needs_background);
    }

    #[test]
    fn test_background_as_source_chain_starts_from_bg() {
        // bg inverted, then inverted back: chain output equals bg
        let wrapped = background_as_source(chain![Inverse, Inverse]);
        assert_eq!(wrapped.blend(0, 0, 0x1234, 0x0F0F), 0x0F0F);
        let single = background_as_source(chain![Inverse]);
        assert_eq!(single.blend(0, 0, 0x1234, 0x0F0F), !0x0F0F);
    }

    #[test]
    fn test_chain_folds_in_order() {
        let chain = chain![Inverse, from_fn(|_, _, fg, _| fg & 0x00FF)];
        assert_eq!(chain.blend(0, 0, 0xFF00, 0), 0x00FF);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_chain_capabilities_merge() {
        let chain = chain![Inverse, Grayscale::new(255)];
        assert!(!chain.capabilities().needs_background);
        let chain = chain![Inverse, Alpha::new(10)];
        assert!(chain.capabilities().needs_background);
    }

    #[test]
    fn test_effects_macro_boxes() {
        let list = effects![Inverse, Alpha::new(1), from_fn(|_, _, fg, _| fg)];
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_no_background_over_chain() {
        let list = no_background(chain![Alpha::new(255), Additive, from_fn(|_, _, fg, _| fg & 0xF800)]);
        let caps = list.capabilities();
        assert!(!caps.needs_background);
        assert!(!caps.background_as_source);

        // alpha 255 keeps fg, additive brings in bg, the mask keeps red only
        assert_eq!(list.blend(0, 0, 0x5000, 0x2841), 0x7800);
        let reversed = no_background(chain![from_fn(|_, _, fg, _| fg & 0xF800), Additive]);
        assert_eq!(reversed.blend(0, 0, 0x5000, 0x2841), 0x7841);

        let mut pipeline = Pipeline::new();
        pipeline.add_step(list);
        assert!(!pipeline.read_background());
        assert_eq!(pipeline.apply(0, 0, 0x5000, 0x2841), 0x7800);

        // a later step that reads the display turns the read back on
        pipeline.add_step(Inverse);
        pipeline.add_step(Subtract);
        assert!(pipeline.read_background());
    }

    #[test]
    fn test_chain_reads_member_capabilities_once() {
        let asked = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&asked);
        struct Counted(Rc<Cell<u32>>);
        impl BlendEffect for Counted {
            fn blend(&self, _x: i32, _y: i32, fg: u16, _bg: u16) -> u16 {
                fg
            }

            fn capabilities(&self) -> Capabilities {
                self.0.set(self.0.get() + 1);
                Capabilities::NO_BACKGROUND
            }
        }

        let chain = chain![Counted(counter), background_as_source(Inverse)];
        assert_eq!(asked.get(), 1);
        for x in 0..50 {
            assert_eq!(chain.blend(x, 0, 0x1234, 0x00FF), !0x00FF);
        }
        assert!(chain.capabilities().background_as_source);
        assert_eq!(asked.get(), 1);
    }
}
