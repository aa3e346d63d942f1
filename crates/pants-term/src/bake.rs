// SPDX-License-Identifier: MIT
//
// Baker — turns a rectangular grid of cells into one escape-laden string.
//
// Layout of the output:
//
//   CUP(offset)                          position the first row
//   plate + ch, plate + ch, ...          one full color pair per cell
//   RESET  CR LF  CUF(offset_x)          end of row, back to the offset
//   ...                                  next row
//
// Each row ends with an explicit CR LF rather than a bare LF, then moves
// right to the grid's left edge. The result is a fresh string per call; the
// baker keeps no state between calls.

use std::io::Write;

use crate::ansi;
use crate::cell::Cell;
use crate::color::Color;
use crate::error::{Error, Result};

/// Check that every row has as many cells as the first.
///
/// # Errors
///
/// [`Error::IrregularGrid`] for the first row whose length differs.
pub fn check_rectangular<R: AsRef<[T]>, T>(rows: &[R]) -> Result<usize> {
    let expected = rows.first().map_or(0, |r| r.as_ref().len());
    for (row, cells) in rows.iter().enumerate() {
        let found = cells.as_ref().len();
        if found != expected {
            return Err(Error::IrregularGrid {
                row,
                expected,
                found,
            });
        }
    }
    Ok(expected)
}

/// Write a baked grid to `w`.
///
/// The grid is validated before anything is written, so an irregular grid
/// leaves `w` untouched.
///
/// # Errors
///
/// [`Error::IrregularGrid`] for ragged input, [`Error::Io`] from the writer.
pub fn write_grid<R: AsRef<[Cell]>>(
    w: &mut impl Write,
    grid: &[R],
    offset_x: u16,
    offset_y: u16,
) -> Result<()> {
    check_rectangular(grid)?;

    ansi::cursor_to(w, offset_x, offset_y)?;
    for row in grid {
        for cell in row.as_ref() {
            cell.write_to(w)?;
        }
        ansi::reset(w)?;
        ansi::line_set(w)?;
        ansi::cursor_forward(w, offset_x)?;
    }
    Ok(())
}

/// Bake a grid into a string.
///
/// # Errors
///
/// [`Error::IrregularGrid`] if the rows are not all the same length.
///
/// # Examples
///
/// ```
/// use pants_term::bake::bake;
/// use pants_term::cell::Cell;
///
/// let s = bake(&[[Cell::new('x')]], 0, 0).unwrap();
/// assert!(s.starts_with("\x1b[1;1H"));
/// assert!(s.ends_with("x\x1b[0m\r\n"));
/// ```
pub fn bake<R: AsRef<[Cell]>>(grid: &[R], offset_x: u16, offset_y: u16) -> Result<String> {
    let mut buf = Vec::with_capacity(grid.len() * 32);
    write_grid(&mut buf, grid, offset_x, offset_y)?;
    // Cells contribute whole chars and everything else is ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Check a color table against the character table's shape. The first row
/// of the wrong width is reported; a missing row counts as a row of zero
/// cells.
fn check_shape<R: AsRef<[T]>, T>(rows: &[R], height: usize, width: usize) -> Result<()> {
    for (row, cells) in rows.iter().enumerate().take(height) {
        let found = cells.as_ref().len();
        if found != width {
            return Err(Error::IrregularGrid {
                row,
                expected: width,
                found,
            });
        }
    }
    if rows.len() != height {
        return Err(Error::IrregularGrid {
            row: rows.len().min(height),
            expected: width,
            found: 0,
        });
    }
    Ok(())
}

/// Bake three parallel tables: characters, foregrounds, backgrounds.
///
/// All three must have the same shape, and each must be rectangular.
///
/// # Errors
///
/// [`Error::IrregularGrid`] on any shape mismatch.
pub fn bake_tables<C, F, B>(
    chars: &[C],
    fg: &[F],
    bg: &[B],
    offset_x: u16,
    offset_y: u16,
) -> Result<String>
where
    C: AsRef<[char]>,
    F: AsRef<[Color]>,
    B: AsRef<[Color]>,
{
    let width = check_rectangular(chars)?;
    check_shape(fg, chars.len(), width)?;
    check_shape(bg, chars.len(), width)?;

    let grid: Vec<Vec<Cell>> = chars
        .iter()
        .zip(fg)
        .zip(bg)
        .map(|((c, f), b)| {
            c.as_ref()
                .iter()
                .zip(f.as_ref())
                .zip(b.as_ref())
                .map(|((&ch, &fg), &bg)| Cell::styled(ch, fg, bg))
                .collect()
        })
        .collect();

    bake(&grid, offset_x, offset_y)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
