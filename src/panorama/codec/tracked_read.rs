use std::cell::Cell;
use std::io::{self, Read};
use std::rc::Rc;

/// Reader wrapper that records when the underlying stream reports end of data.
///
/// Decoders buffer their input internally, so the flag is shared rather than read back
/// through the decoder.
pub(crate) struct TrackedRead<R> {
    inner: R,
    exhausted: Rc<Cell<bool>>,
}

impl<R: Read> TrackedRead<R> {
    pub(crate) fn new(inner: R) -> (Self, Rc<Cell<bool>>) {
        let exhausted = Rc::new(Cell::new(false));
        (
            Self {
                inner,
                exhausted: Rc::clone(&exhausted),
            },
            exhausted,
        )
    }
}

impl<R: Read> Read for TrackedRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.exhausted.set(true);
        }
        Ok(n)
    }
}
