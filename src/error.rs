//! Error type shared by the geometry, codec and driver layers.

use core::convert::Infallible;
use core::fmt;

/// Errors reported by this crate.
///
/// Only construction-time and caller-contract failures are errors. Negative
/// indices, negative repeat counts and degenerate shapes are silent no-ops and
/// never surface here.
///
/// # Type Parameters
///
/// * `E` - Error type of the bus collaborator. Pure operations that never touch
///   a bus use the default `Infallible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E = Infallible> {
    /// Negative panel dimensions, or a buffer whose length does not match the
    /// geometry it is bound to.
    InvalidGeometry,
    /// A frame was handed to a codec or driver configured for a different
    /// number of chained panels.
    PanelCountMismatch {
        /// Panel count the codec or driver was configured for
        expected: usize,
        /// Panel count of the frame that was passed in
        found: usize,
    },
    /// The bus collaborator failed; the error is passed through untouched.
    Interface(E),
}

impl Error<Infallible> {
    /// Lift a bus-free error into an error type carrying a bus error.
    #[must_use]
    pub fn widen<E>(self) -> Error<E> {
        match self {
            Error::InvalidGeometry => Error::InvalidGeometry,
            Error::PanelCountMismatch { expected, found } => {
                Error::PanelCountMismatch { expected, found }
            }
            Error::Interface(never) => match never {},
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidGeometry => f.write_str("invalid panel geometry"),
            Error::PanelCountMismatch { expected, found } => write!(
                f,
                "panel count mismatch: expected {expected} panels, frame has {found}"
            ),
            Error::Interface(e) => write!(f, "display interface error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidGeometry => defmt::write!(f, "InvalidGeometry"),
            Error::PanelCountMismatch { expected, found } => defmt::write!(
                f,
                "PanelCountMismatch {{ expected: {}, found: {} }}",
                expected,
                found
            ),
            Error::Interface(_) => defmt::write!(f, "Interface(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;

    #[test]
    fn test_widen_preserves_variant() {
        let e: Error<u8> = Error::InvalidGeometry.widen();
        assert_eq!(e, Error::InvalidGeometry);

        let e: Error<u8> = Error::PanelCountMismatch {
            expected: 4,
            found: 2,
        }
        .widen();
        assert_eq!(
            e,
            Error::PanelCountMismatch {
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn test_display_messages() {
        let e: Error = Error::PanelCountMismatch {
            expected: 4,
            found: 2,
        };
        assert_eq!(
            format!("{e}"),
            "panel count mismatch: expected 4 panels, frame has 2"
        );

        let e: Error<&str> = Error::Interface("nak");
        assert_eq!(format!("{e}"), "display interface error: \"nak\"");
    }
}
