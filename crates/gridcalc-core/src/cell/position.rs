//! Grid positions and A1 notation

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_COL_LETTERS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A zero-based grid coordinate.
///
/// Positions order by row first, then column. A position may be *invalid*
/// (outside `MAX_ROWS` x `MAX_COLS`); formulas keep such positions around so
/// that a reference like `Z9999999` can evaluate to `#REF!` instead of being
/// rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u32,
}

impl Position {
    /// The canonical invalid position
    pub const NONE: Position = Position {
        row: u32::MAX,
        col: u32::MAX,
    };

    /// Create a new position
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Whether the position lies inside the supported grid
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Return `self` if valid, otherwise an [`Error::InvalidPosition`]
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidPosition(format!(
                "({}, {}) is outside {}x{}",
                self.row, self.col, MAX_ROWS, MAX_COLS
            )))
        }
    }

    /// Parse A1 notation without enforcing grid bounds.
    ///
    /// Returns `None` when `s` is not shaped like a reference (letters
    /// followed by digits). A well-shaped reference that falls outside the
    /// grid, has too many column letters, or names row 0 yields an invalid
    /// position instead.
    ///
    /// # Examples
    /// ```
    /// use gridcalc_core::Position;
    ///
    /// assert_eq!(Position::from_a1("C2"), Some(Position::new(1, 2)));
    /// assert!(!Position::from_a1("Z9999999").unwrap().is_valid());
    /// assert_eq!(Position::from_a1("12"), None);
    /// ```
    pub fn from_a1(s: &str) -> Option<Self> {
        let letters_end = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(letters_end);

        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let col = match Self::letters_to_column(letters) {
            Some(col) => col,
            None => return Some(Self::NONE),
        };

        // Leading zeros are fine, but the number itself may not fit in u32
        let row = match digits.parse::<u32>() {
            Ok(0) | Err(_) => return Some(Self::NONE),
            Ok(row) => row - 1,
        };

        let pos = Self::new(row, col);
        Some(if pos.is_valid() { pos } else { Self::NONE })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.).
    ///
    /// Case insensitive. Returns `None` for non-letters or more than
    /// [`MAX_COL_LETTERS`] letters.
    pub fn letters_to_column(letters: &str) -> Option<u32> {
        if letters.is_empty() || letters.len() > MAX_COL_LETTERS {
            return None;
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return None;
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        Some(col - 1)
    }

    /// Format as A1-style string. Invalid positions format as `#REF!`.
    pub fn to_a1_string(&self) -> String {
        if !self.is_valid() {
            return "#REF!".to_string();
        }
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Strict parse: malformed or out-of-range text is an error
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match Self::from_a1(s) {
            Some(pos) if pos.is_valid() => Ok(pos),
            Some(_) => Err(Error::InvalidPosition(format!("'{}' is out of range", s))),
            None => Err(Error::InvalidPosition(format!("'{}' is not an A1 reference", s))),
        }
    }
}

/// Number of rows and columns of a printable area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub rows: u32,
    pub cols: u32,
}

impl Size {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}
