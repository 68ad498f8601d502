//! Interactive text menu
//!
//! Errors from a command are reported and the menu is shown again; only
//! I/O failures on the terminal itself end the loop.

use crate::app::App;
use crate::error::Result;
use crate::sync::Destination;
use std::io::{self, BufRead, Write};

const MENU: &str = "
=======================================
                 MENU
=======================================
1. Show tables in XML
2. Show table DDL
3. Create tables in database
4. Update all data
5. Update a specific table
6. Show table columns
7. Validate database structure
0. Exit
Choose an option: ";

pub struct Menu<'a, D, R, W> {
    app: &'a mut App<D>,
    input: R,
    output: W,
}

impl<'a, D: Destination, R: BufRead, W: Write> Menu<'a, D, R, W> {
    pub fn new(app: &'a mut App<D>, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Run until the user picks `0` or input ends
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(choice) = self.read_line()? else {
                break;
            };

            match self.process(&choice)? {
                Some(Ok(message)) => writeln!(self.output, "\n{}", message)?,
                Some(Err(e)) => {
                    log::debug!("Menu command failed: {:?}", e);
                    writeln!(self.output, "\nError: {}", e)?
                }
                None => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
            }
        }
        Ok(())
    }

    /// `None` means exit; otherwise the command outcome to display
    fn process(&mut self, choice: &str) -> io::Result<Option<Result<String>>> {
        let outcome = match choice {
            "1" => self.app.show_tables(),
            "2" => {
                let table = self.prompt("Table name (currency/categories/offers): ")?;
                self.app.show_ddl(&table)
            }
            "3" => self.app.create_tables(),
            "4" => self.app.update_all().map(|counts| counts.summary()),
            "5" => {
                let table = self.prompt("Table to update: ")?;
                self.app.update_table(&table)
            }
            "6" => {
                let table = self.prompt("Table name: ")?;
                self.app.show_columns(&table)
            }
            "7" => self.app.validate(),
            "0" => return Ok(None),
            _ => Ok("Invalid option".to_string()),
        };
        Ok(Some(outcome))
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    /// Next trimmed input line, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
