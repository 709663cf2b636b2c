//! Character cursor for traversing source code.
//!
//! The cursor keeps the current byte position plus line/column state while
//! the lexer walks the input. Columns are counted in characters so spans
//! stay meaningful for non-ASCII text inside string literals.

/// A cursor over source text.
///
/// # Example
///
/// ```
/// use skai_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new("let x");
/// assert_eq!(cursor.current_char(), 'l');
/// cursor.advance();
/// assert_eq!(cursor.current_char(), 'e');
/// ```
pub struct Cursor<'a> {
    /// The source text being traversed.
    source: &'a str,

    /// Current byte position in the source.
    position: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (1-based, in characters).
    column: u32,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the character at the cursor, or `'\0'` at end of input.
    #[inline]
    pub fn current_char(&self) -> char {
        self.peek_char(0)
    }

    /// Returns the character `offset` characters ahead of the cursor, or
    /// `'\0'` past the end.
    ///
    /// # Example
    ///
    /// ```
    /// use skai_lex::cursor::Cursor;
    ///
    /// let cursor = Cursor::new("ab");
    /// assert_eq!(cursor.peek_char(0), 'a');
    /// assert_eq!(cursor.peek_char(1), 'b');
    /// assert_eq!(cursor.peek_char(2), '\0');
    /// ```
    #[inline]
    pub fn peek_char(&self, offset: usize) -> char {
        self.source[self.position..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    /// Advances past the current character, updating line/column tracking.
    /// Does nothing at end of input.
    pub fn advance(&mut self) {
        let Some(c) = self.source[self.position..].chars().next() else {
            return;
        };
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// True when the whole input has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Current byte position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current line (1-based).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column (1-based).
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }
}
