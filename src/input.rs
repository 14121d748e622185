//! # Input Source for `READ`
//!
//! `READ` draws one line at a time from the `--input` file if one was given,
//! falling back to standard input once that buffer is exhausted or if no
//! `--input` file was given at all (spec §4.7 "I/O", §6 "Input line
//! format"). Buffered lines come pre-split and newline-stripped from
//! `cli::read_input_lines`; the standard-input fallback strips its own
//! trailing newline to match.

use std::io::BufRead;

/// A line source for `READ`: a pre-read buffer, consumed front-to-back,
/// then standard input for any further reads.
#[derive(Debug, Default)]
pub struct InputSource {
    buffered: std::collections::VecDeque<String>,
}

impl InputSource {
    pub fn new(buffered: Vec<String>) -> Self {
        InputSource {
            buffered: buffered.into(),
        }
    }

    /// The next line, or `None` at true end-of-input (both the buffer and
    /// standard input are exhausted).
    pub fn next_line(&mut self) -> Option<String> {
        if let Some(line) = self.buffered.pop_front() {
            return Some(line);
        }
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(_) => None,
        }
    }
}
