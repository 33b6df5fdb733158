use chrono::Local;
use std::io::{self, Write};

use crate::plugins::traits::NotifierPlugin;
use crate::utils::error::Result;

const CURSOR_UP: &str = "\x1b[1A";
const CLEAR_LINE: &str = "\x1b[K";

/// Writes one line per report, prefixed with a local timestamp.
pub struct ConsoleNotifier<W: Write + Send = io::Stdout> {
    writer: W,
    ansi: bool,
    timestamps: bool,
}

impl ConsoleNotifier<io::Stdout> {
    pub fn stdout(ansi: bool) -> Self {
        Self::new(io::stdout(), ansi)
    }
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn new(writer: W, ansi: bool) -> Self {
        Self {
            writer,
            ansi,
            timestamps: true,
        }
    }

    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> NotifierPlugin for ConsoleNotifier<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn report(&mut self, message: &str, overwrite_previous: bool) -> Result<()> {
        if overwrite_previous && self.ansi {
            write!(self.writer, "{}{}", CURSOR_UP, CLEAR_LINE)?;
        }

        if self.timestamps {
            let now = Local::now().format("%Y/%m/%d %H:%M:%S");
            writeln!(self.writer, "{} {}", now, message)?;
        } else {
            writeln!(self.writer, "{}", message)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(notifier: ConsoleNotifier<Vec<u8>>) -> String {
        String::from_utf8(notifier.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_lines() {
        let mut notifier = ConsoleNotifier::new(Vec::new(), false).without_timestamps();
        notifier.report("PRICE FETCHED (at 10.00)", false).unwrap();
        notifier.report("PRICE IS STABLE (at 10.00)", false).unwrap();
        notifier.report("PRICE IS STABLE (at 10.00)", true).unwrap();

        assert_eq!(
            output(notifier),
            "PRICE FETCHED (at 10.00)\nPRICE IS STABLE (at 10.00)\nPRICE IS STABLE (at 10.00)\n"
        );
    }

    #[test]
    fn test_overwrite_moves_cursor_up() {
        let mut notifier = ConsoleNotifier::new(Vec::new(), true).without_timestamps();
        notifier.report("PRICE IS STABLE (at 10.00)", false).unwrap();
        notifier.report("PRICE IS STABLE (at 10.00)", true).unwrap();

        assert_eq!(
            output(notifier),
            "PRICE IS STABLE (at 10.00)\n\x1b[1A\x1b[KPRICE IS STABLE (at 10.00)\n"
        );
    }

    #[test]
    fn test_timestamp_prefix() {
        let mut notifier = ConsoleNotifier::new(Vec::new(), false);
        notifier.report("PRICE FETCHED (at 1.00)", false).unwrap();

        let line = output(notifier);
        // "YYYY/MM/DD HH:MM:SS " is 20 characters
        assert!(line.ends_with(" PRICE FETCHED (at 1.00)\n"));
        assert_eq!(line.len(), 20 + "PRICE FETCHED (at 1.00)\n".len());
        assert_eq!(&line[4..5], "/");
    }
}
