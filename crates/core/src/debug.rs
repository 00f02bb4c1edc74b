use core::fmt::Display;
use std::io::{self, Write};

use crate::cursor::PullCursor;
use crate::error::CursorError;
use crate::source::Source;

impl<S> PullCursor<S>
where
    S: Source,
    S::Item: Display,
    S::Context: Display,
{
    /// Writes every REMAINING element to `sink` in a debug format and leaves
    /// the cursor finished.
    ///
    /// This consumes the cursor: afterwards `is_end` is always `true`, and
    /// `current` and `advance` yield nothing, even when writing failed part
    /// way. Each element becomes one line,
    /// `  <element> with context <context>. ` (the context clause only when the
    /// element has one). The format is for debugging and should not be parsed.
    pub fn write_remaining<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<(), CursorError> {
        let written = self.drain_into(sink);
        self.finish();
        written
    }

    /// [`write_remaining`](Self::write_remaining) to standard output. Also
    /// exhausts the cursor.
    pub fn print_remaining(&mut self) -> Result<(), CursorError> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_remaining(&mut lock)?;
        lock.flush()?;
        Ok(())
    }

    fn drain_into<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<(), CursorError> {
        while !self.is_end() {
            let Some((item, context)) = self.entry() else {
                break;
            };
            write!(sink, "  {item}")?;
            if let Some(context) = context {
                write!(sink, " with context {context}")?;
            }
            sink.write_all(b". \n")?;
            self.advance();
        }
        Ok(())
    }
}
