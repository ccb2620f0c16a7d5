use core::fmt::{self, Arguments, Write};

/// Kind of a console line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Category {
    Info,
    /// A card was seen
    Detected,
    AuthError,
    WriteError,
    ReadError,
}

impl Category {
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Category::AuthError | Category::WriteError | Category::ReadError
        )
    }
}

/// Append-only, human readable output of the poll loop.
pub trait Console {
    /// Write a fragment without ending the line (progress marks)
    fn print(&mut self, args: Arguments);

    /// Write one complete line
    fn line(&mut self, category: Category, args: Arguments);
}

impl<C: Console + ?Sized> Console for &mut C {
    fn print(&mut self, args: Arguments) {
        (**self).print(args)
    }

    fn line(&mut self, category: Category, args: Arguments) {
        (**self).line(category, args)
    }
}

/// Console over any `fmt::Write` serial port.
///
/// Error lines are prefixed with `ERROR > `, lines end in CRLF.
pub struct SerialConsole<W: Write> {
    serial: W,
}

impl<W: Write> SerialConsole<W> {
    pub fn new(serial: W) -> Self {
        SerialConsole { serial }
    }

    pub fn release(self) -> W {
        self.serial
    }

    fn write_line(&mut self, category: Category, args: Arguments) -> fmt::Result {
        if category.is_error() {
            self.serial.write_str("ERROR > ")?;
        }
        self.serial.write_fmt(args)?;
        self.serial.write_str("\r\n")
    }
}

// A console that cannot be written to has nowhere to report that either
impl<W: Write> Console for SerialConsole<W> {
    fn print(&mut self, args: Arguments) {
        let _ = self.serial.write_fmt(args);
    }

    fn line(&mut self, category: Category, args: Arguments) {
        let _ = self.write_line(category, args);
    }
}

/// Write a formatted line to a [`Console`]
#[macro_export]
macro_rules! console_line {
    ($console: expr, $category: expr, $fmt: expr) => {
        $crate::Console::line(&mut $console, $category, format_args!($fmt))
    };
    ($console: expr, $category: expr, $fmt: expr, $($args: tt)+) => {
        $crate::Console::line(&mut $console, $category, format_args!($fmt, $($args)+))
    };
}
