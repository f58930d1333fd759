//! CSV output line: `"<horizontal>,<vertical>\n"`

use heapless::String;
use ufmt::uwrite;

use crate::config::LINE_CAPACITY;
use crate::sensors::Sample;

/// One formatted output line
pub type Line = String<LINE_CAPACITY>;

/// Widest line the host parser accepts: two signed 16-bit fields.
pub const MAX_LINE_LEN: usize = "-32768,-32768\n".len();

const _: () = assert!(LINE_CAPACITY >= MAX_LINE_LEN, "output line buffer too small");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOverflow;

/// Horizontal reading first, vertical second.
pub fn format(sample: &Sample) -> Result<Line, LineOverflow> {
    let mut line = Line::new();
    uwrite!(line, "{},{}\n", sample.horizontal, sample.vertical).map_err(|_| LineOverflow)?;
    Ok(line)
}
