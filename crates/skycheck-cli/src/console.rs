//! Terminal I/O as seen by the requester.

use std::io::{self, BufRead, Write};

/// Prompts and messages. The session and menu only ever talk through this.
pub trait Console {
    /// Print one line.
    fn show(&mut self, line: &str);

    /// Print `prompt` and read one line of input, without its line ending.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Clear the screen, if the console supports it.
    fn clear(&mut self) {}

    /// Block until the user acknowledges.
    fn pause(&mut self) -> io::Result<()> {
        self.ask("Press enter to continue...").map(|_| ())
    }
}

/// Console over the process's stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole {
    clear_screen: bool,
}

impl StdConsole {
    pub fn new(clear_screen: bool) -> Self {
        Self { clear_screen }
    }
}

impl Console for StdConsole {
    fn show(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn clear(&mut self) {
        if self.clear_screen {
            print!("\x1b[2J\x1b[H");
        }
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn show(&mut self, line: &str) {
        (**self).show(line)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        (**self).ask(prompt)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn pause(&mut self) -> io::Result<()> {
        (**self).pause()
    }
}
