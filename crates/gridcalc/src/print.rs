//! Tab-separated dumps of the printable area

use std::io::{self, Write};

use gridcalc_core::Position;

use crate::cell::CellView;
use crate::sheet::Sheet;

impl Sheet {
    /// Write the value of every cell in the printable area.
    ///
    /// One line per row, cells separated by a tab, absent cells empty.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |cell| cell.value().to_string())
    }

    /// Write the text of every cell in the printable area
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |cell| cell.text())
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&CellView<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                if let Some(cell) = self.view(Position::new(row, col)) {
                    out.write_all(render(&cell).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
