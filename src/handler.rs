//! Receivers of parse events.

use crate::alphabet::Alphabet;
use crate::fault::Fault;

/// Receives the events produced while a background file is parsed.
///
/// Every method has an empty default body, so an implementation only needs to
/// provide the events it cares about.
pub trait Handler {
    /// Called once, before any character is processed, with the size of the
    /// input in bytes.
    fn begin(&mut self, _size: u64) {}

    /// Called at least once per chunk with the fraction of the input
    /// processed so far and the alphabet as currently understood.
    fn progress(&mut self, _fraction: f64, _alphabet: Alphabet) {}

    /// Called for every fault, in the order the faults were found.
    fn error(&mut self, _fault: Fault) {}

    /// Called exactly once when the parse ends, unless it was cancelled.
    fn end(&mut self, _alphabet: Alphabet) {}
}

/// A [`Handler`] that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

impl Handler for Noop {}

impl<H> Handler for &mut H
where
    H: Handler + ?Sized,
{
    fn begin(&mut self, size: u64) {
        (**self).begin(size)
    }

    fn progress(&mut self, fraction: f64, alphabet: Alphabet) {
        (**self).progress(fraction, alphabet)
    }

    fn error(&mut self, fault: Fault) {
        (**self).error(fault)
    }

    fn end(&mut self, alphabet: Alphabet) {
        (**self).end(alphabet)
    }
}
