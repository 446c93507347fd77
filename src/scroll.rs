//! Text scrolling and blinking as explicit state machines.
//!
//! [`ScrollEngine`] walks one glyph into the frame a column at a time. Each
//! call to [`ScrollEngine::advance`] performs exactly one buffer mutation, so
//! the caller decides what happens between steps: present the frame, sleep,
//! check for cancellation. After every step the frame is in a complete,
//! drawable state.
//!
//! ```text
//!  Idle ──► EmittingColumn ──► ShiftingEdge ──┐
//!               ▲                             │ more columns (or the
//!               └─────────────────────────────┘ trailing blank)
//!                                             │
//!                                             ▼
//!                                            Done
//! ```
//!
//! In `EmittingColumn` the next glyph column has been painted into the edge
//! column the text enters from; this is the point where a driver loop presents
//! the frame and waits. `ShiftingEdge` follows with a lossy one-column shift
//! away from that edge. Once the glyph is exhausted, one extra blank column is
//! emitted if anything was lit, separating consecutive characters.
//!
//! [`Blink`] is the equivalent for blinking: an iterator over which of two
//! frames (content or blank) to show next.

use embedded_graphics::prelude::RgbColor;

use crate::{Color, Frame};

/// Edge a glyph enters from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    /// Enter at the right edge of the last panel and move left
    #[default]
    FromRight,
    /// Enter at the left edge of the first panel and move right
    FromLeft,
}

/// Where a [`ScrollEngine`] is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollState {
    /// Nothing done yet
    Idle,
    /// A column has been painted at the entry edge (or a blank one emitted)
    EmittingColumn,
    /// The frame has been shifted one column away from the entry edge
    ShiftingEdge,
    /// The glyph and its trailing blank have fully entered
    Done,
}

/// How an animation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollOutcome {
    /// Every step ran
    Completed,
    /// A [`Cancel`] check asked to stop between steps
    Cancelled,
}

/// Cooperative cancellation, polled only between animation steps.
pub trait Cancel {
    /// Return `true` to abandon the animation.
    fn is_cancelled(&mut self) -> bool;
}

impl<F: FnMut() -> bool> Cancel for F {
    fn is_cancelled(&mut self) -> bool {
        self()
    }
}

/// A [`Cancel`] that never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverCancel;

impl Cancel for NeverCancel {
    fn is_cancelled(&mut self) -> bool {
        false
    }
}

/// Steps one glyph into a frame. See the [module docs](self).
#[derive(Debug, Clone)]
pub struct ScrollEngine<'a> {
    glyph: &'a [u8],
    direction: ScrollDirection,
    color: Color,
    emitted: usize,
    pixel_found: bool,
    trailing_emitted: bool,
    state: ScrollState,
}

impl<'a> ScrollEngine<'a> {
    /// Prepare to scroll `glyph` (column bytes, bit `r` = row `r`) in from
    /// `direction`, painting lit bits in `color`.
    #[must_use]
    pub fn new(glyph: &'a [u8], direction: ScrollDirection, color: Color) -> Self {
        Self {
            glyph,
            direction,
            color,
            emitted: 0,
            pixel_found: false,
            trailing_emitted: false,
            state: ScrollState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// `true` once [`ScrollState::Done`] is reached
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == ScrollState::Done
    }

    /// Perform the next transition on `frame` and return the new state.
    ///
    /// Calling this after [`ScrollState::Done`] leaves the frame alone.
    pub fn advance(&mut self, frame: &mut Frame) -> ScrollState {
        self.state = match self.state {
            ScrollState::Idle | ScrollState::ShiftingEdge => self.emit(frame),
            ScrollState::EmittingColumn => {
                match self.direction {
                    ScrollDirection::FromRight => frame.shift_left(),
                    ScrollDirection::FromLeft => frame.shift_right(),
                }
                ScrollState::ShiftingEdge
            }
            ScrollState::Done => ScrollState::Done,
        };
        self.state
    }

    fn emit(&mut self, frame: &mut Frame) -> ScrollState {
        if self.emitted < self.glyph.len() {
            // Right entry shows columns in reading order, left entry backwards.
            let column = match self.direction {
                ScrollDirection::FromRight => self.emitted,
                ScrollDirection::FromLeft => self.glyph.len() - 1 - self.emitted,
            };
            self.paint(frame, self.glyph[column]);
            self.emitted += 1;
            ScrollState::EmittingColumn
        } else if self.pixel_found && !self.trailing_emitted {
            self.trailing_emitted = true;
            ScrollState::EmittingColumn
        } else {
            ScrollState::Done
        }
    }

    fn paint(&mut self, frame: &mut Frame, bits: u8) {
        let geometry = *frame.geometry();
        let columns = geometry.columns_per_panel();
        if columns == 0 {
            return;
        }
        let (panel, first) = match self.direction {
            ScrollDirection::FromRight => (geometry.panel_count() - 1, columns - 1),
            ScrollDirection::FromLeft => (0, 0),
        };
        for row in 0..geometry.rows_per_panel().min(8) {
            if bits & (1 << row) != 0 {
                let position = row * columns + first;
                frame.set_in_panel(position as i32, panel as i32, self.color);
                self.pixel_found = true;
            }
        }
    }
}

/// Run a glyph scroll to completion without presenting intermediate frames.
pub fn scroll_into(frame: &mut Frame, glyph: &[u8], direction: ScrollDirection, color: Color) {
    let mut engine = ScrollEngine::new(glyph, direction, color);
    while !engine.is_done() {
        engine.advance(frame);
    }
}

/// Which of the two blink frames is on the panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    /// The frame contents
    Content,
    /// An all-black frame of the same geometry
    Blank,
}

impl BlinkPhase {
    /// The other phase
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Content => Self::Blank,
            Self::Blank => Self::Content,
        }
    }
}

/// Two-frame blink toggle.
///
/// Iterating yields the phase to show next: `Blank, Content` repeated
/// `repeat` times, so the content is always what remains once it finishes.
/// `usize::MAX` blinks for as long as anyone keeps iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    remaining: usize,
    showing: BlinkPhase,
}

impl Blink {
    /// Blink `repeat` times, starting from the content being shown.
    #[must_use]
    pub const fn new(repeat: usize) -> Self {
        Self {
            remaining: repeat.saturating_mul(2),
            showing: BlinkPhase::Content,
        }
    }

    /// Phase currently on the panels
    #[must_use]
    pub const fn showing(&self) -> BlinkPhase {
        self.showing
    }
}

impl Iterator for Blink {
    type Item = BlinkPhase;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.showing = self.showing.toggled();
        Some(self.showing)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Build the blank counterpart of `frame`.
#[must_use]
pub fn blank_like(frame: &Frame) -> Frame {
    let mut blank = Frame::new(*frame.geometry());
    blank.fill(Color::BLACK);
    blank
}
