//! ECMAScript lexer (scanner).
//!
//! See [`Scanner`] for the main entry point.
//!
//! The scanner never decides on its own whether a `/` starts a regular
//! expression: it always produces a [`TokenKind::Slash`] or
//! [`TokenKind::SlashEqual`] token, and the parser calls
//! [`Scanner::rescan_as_regexp`] when that token sits where an expression may
//! begin.

use crate::error::{Diagnostic, DiagnosticKind, Message, ParseResult};
use crate::parser::position::{Mark, Position};

// ─────────────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic category of an ECMAScript lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────────────────
    /// Decimal, hex (`0x…`), binary (`0b…`), octal (`0o…` / legacy `0…`).
    NumericLiteral,
    /// String literal enclosed in `"` or `'`.
    StringLiteral,
    /// Regular expression literal `/pattern/flags`.
    RegExpLiteral,

    // ── Identifiers ───────────────────────────────────────────────────────
    /// An identifier that is not a reserved word.  Strict-mode-only reserved
    /// words (`let`, `yield`, `static`, …) are scanned as identifiers.
    Identifier,

    // ── Reserved words ────────────────────────────────────────────────────
    /// `break`
    Break,
    /// `case`
    Case,
    /// `catch`
    Catch,
    /// `class` (future reserved)
    Class,
    /// `const`
    Const,
    /// `continue`
    Continue,
    /// `debugger`
    Debugger,
    /// `default`
    Default,
    /// `delete`
    Delete,
    /// `do`
    Do,
    /// `else`
    Else,
    /// `enum` (future reserved)
    Enum,
    /// `export` (future reserved)
    Export,
    /// `extends` (future reserved)
    Extends,
    /// `false`
    False,
    /// `finally`
    Finally,
    /// `for`
    For,
    /// `function`
    Function,
    /// `if`
    If,
    /// `import` (future reserved)
    Import,
    /// `in`
    In,
    /// `instanceof`
    Instanceof,
    /// `new`
    New,
    /// `null`
    Null,
    /// `return`
    Return,
    /// `super` (future reserved)
    Super,
    /// `switch`
    Switch,
    /// `this`
    This,
    /// `throw`
    Throw,
    /// `true`
    True,
    /// `try`
    Try,
    /// `typeof`
    Typeof,
    /// `var`
    Var,
    /// `void`
    Void,
    /// `while`
    While,
    /// `with`
    With,

    // ── Punctuators ───────────────────────────────────────────────────────
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `.`
    Dot,
    /// `...`
    DotDotDot,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `===`
    EqualEqualEqual,
    /// `!==`
    BangEqualEqual,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `<<`
    LessLess,
    /// `>>`
    GreaterGreater,
    /// `>>>`
    GreaterGreaterGreater,
    /// `&`
    Ampersand,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `&&`
    AmpersandAmpersand,
    /// `||`
    PipePipe,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `=`
    Equal,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `*=`
    StarEqual,
    /// `/=`
    SlashEqual,
    /// `%=`
    PercentEqual,
    /// `<<=`
    LessLessEqual,
    /// `>>=`
    GreaterGreaterEqual,
    /// `>>>=`
    GreaterGreaterGreaterEqual,
    /// `&=`
    AmpersandEqual,
    /// `|=`
    PipeEqual,
    /// `^=`
    CaretEqual,
    /// `=>`
    Arrow,

    // ── End of file ───────────────────────────────────────────────────────
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Source text of a punctuator or reserved word; `None` for literals,
    /// identifiers and EOF.
    pub fn as_str(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            Break => "break",
            Case => "case",
            Catch => "catch",
            Class => "class",
            Const => "const",
            Continue => "continue",
            Debugger => "debugger",
            Default => "default",
            Delete => "delete",
            Do => "do",
            Else => "else",
            Enum => "enum",
            Export => "export",
            Extends => "extends",
            False => "false",
            Finally => "finally",
            For => "for",
            Function => "function",
            If => "if",
            Import => "import",
            In => "in",
            Instanceof => "instanceof",
            New => "new",
            Null => "null",
            Return => "return",
            Super => "super",
            Switch => "switch",
            This => "this",
            Throw => "throw",
            True => "true",
            Try => "try",
            Typeof => "typeof",
            Var => "var",
            Void => "void",
            While => "while",
            With => "with",
            LeftBrace => "{",
            RightBrace => "}",
            LeftParen => "(",
            RightParen => ")",
            LeftBracket => "[",
            RightBracket => "]",
            Dot => ".",
            DotDotDot => "...",
            Semicolon => ";",
            Comma => ",",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            EqualEqual => "==",
            BangEqual => "!=",
            EqualEqualEqual => "===",
            BangEqualEqual => "!==",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            PlusPlus => "++",
            MinusMinus => "--",
            LessLess => "<<",
            GreaterGreater => ">>",
            GreaterGreaterGreater => ">>>",
            Ampersand => "&",
            Pipe => "|",
            Caret => "^",
            Bang => "!",
            Tilde => "~",
            AmpersandAmpersand => "&&",
            PipePipe => "||",
            Question => "?",
            Colon => ":",
            Equal => "=",
            PlusEqual => "+=",
            MinusEqual => "-=",
            StarEqual => "*=",
            SlashEqual => "/=",
            PercentEqual => "%=",
            LessLessEqual => "<<=",
            GreaterGreaterEqual => ">>=",
            GreaterGreaterGreaterEqual => ">>>=",
            AmpersandEqual => "&=",
            PipeEqual => "|=",
            CaretEqual => "^=",
            Arrow => "=>",
            NumericLiteral | StringLiteral | RegExpLiteral | Identifier | Eof => return None,
        })
    }

    /// `true` for every reserved word, including the literal words
    /// `true`/`false`/`null` and the future reserved words.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Break
                | Case
                | Catch
                | Class
                | Const
                | Continue
                | Debugger
                | Default
                | Delete
                | Do
                | Else
                | Enum
                | Export
                | Extends
                | False
                | Finally
                | For
                | Function
                | If
                | Import
                | In
                | Instanceof
                | New
                | Null
                | Return
                | Super
                | Switch
                | This
                | Throw
                | True
                | Try
                | Typeof
                | Var
                | Void
                | While
                | With
        )
    }

    /// `true` for `class`, `enum`, `export`, `extends`, `import`, `super`.
    pub fn is_future_reserved(self) -> bool {
        use TokenKind::*;
        matches!(self, Class | Enum | Export | Extends | Import | Super)
    }

    /// `true` for `=` and every compound assignment operator.
    pub fn is_assignment_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Equal
                | PlusEqual
                | MinusEqual
                | StarEqual
                | SlashEqual
                | PercentEqual
                | LessLessEqual
                | GreaterGreaterEqual
                | GreaterGreaterGreaterEqual
                | AmpersandEqual
                | PipeEqual
                | CaretEqual
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenValue
// ─────────────────────────────────────────────────────────────────────────────

/// The payload value associated with a [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No semantic value (punctuators, reserved words, EOF, …).
    None,
    /// Identifier name or cooked string value (escapes decoded).
    Str(String),
    /// Parsed numeric value for [`TokenKind::NumericLiteral`].
    Number(f64),
    /// Body and flags of a regular-expression literal.
    RegExp {
        /// Text between the slashes.
        pattern: String,
        /// Trailing flag letters.
        flags: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────────────

/// A single lexical token produced by the [`Scanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category.
    pub kind: TokenKind,
    /// The associated value, if any.
    pub value: TokenValue,
    /// Location of the first character.
    pub start: Mark,
    /// Location just past the last character.
    pub end: Mark,
    /// `true` when at least one *LineTerminator* (possibly inside a block
    /// comment) appeared between the previous token and this one.
    ///
    /// The parser uses this flag for Automatic Semicolon Insertion (ASI).
    pub had_line_terminator_before: bool,
    /// `true` for legacy octal numeric literals (`017`) and string literals
    /// containing an octal escape (`"\07"`).  Both are errors in strict code.
    pub octal: bool,
}

impl Token {
    /// The raw source text of this token.
    pub fn raw<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.offset..self.end.offset]
    }

    /// The identifier name or string value, if this token carries one.
    pub fn str_value(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Character-classification helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` for *LineTerminator* code points.
pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Returns `true` for *WhiteSpace* characters (line terminators excluded).
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'                      // CHARACTER TABULATION
        | '\x0B'                  // LINE TABULATION
        | '\x0C'                  // FORM FEED
        | ' '                     // SPACE
        | '\u{00A0}'              // NO-BREAK SPACE
        | '\u{FEFF}'              // ZERO WIDTH NO-BREAK SPACE (BOM)
        | '\u{1680}'              // OGHAM SPACE MARK
        | '\u{2000}'
            ..='\u{200A}' // EN QUAD … HAIR SPACE
        | '\u{202F}'              // NARROW NO-BREAK SPACE
        | '\u{205F}'              // MEDIUM MATHEMATICAL SPACE
        | '\u{3000}' // IDEOGRAPHIC SPACE
    )
}

/// Returns `true` for characters that may *start* an identifier.
pub(crate) fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

/// Returns `true` for characters that may *continue* an identifier.
pub(crate) fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

/// Map an identifier string to a reserved-word [`TokenKind`], or return
/// `None` for plain identifiers.
fn keyword_kind(s: &str) -> Option<TokenKind> {
    match s {
        "break" => Some(TokenKind::Break),
        "case" => Some(TokenKind::Case),
        "catch" => Some(TokenKind::Catch),
        "class" => Some(TokenKind::Class),
        "const" => Some(TokenKind::Const),
        "continue" => Some(TokenKind::Continue),
        "debugger" => Some(TokenKind::Debugger),
        "default" => Some(TokenKind::Default),
        "delete" => Some(TokenKind::Delete),
        "do" => Some(TokenKind::Do),
        "else" => Some(TokenKind::Else),
        "enum" => Some(TokenKind::Enum),
        "export" => Some(TokenKind::Export),
        "extends" => Some(TokenKind::Extends),
        "false" => Some(TokenKind::False),
        "finally" => Some(TokenKind::Finally),
        "for" => Some(TokenKind::For),
        "function" => Some(TokenKind::Function),
        "if" => Some(TokenKind::If),
        "import" => Some(TokenKind::Import),
        "in" => Some(TokenKind::In),
        "instanceof" => Some(TokenKind::Instanceof),
        "new" => Some(TokenKind::New),
        "null" => Some(TokenKind::Null),
        "return" => Some(TokenKind::Return),
        "super" => Some(TokenKind::Super),
        "switch" => Some(TokenKind::Switch),
        "this" => Some(TokenKind::This),
        "throw" => Some(TokenKind::Throw),
        "true" => Some(TokenKind::True),
        "try" => Some(TokenKind::Try),
        "typeof" => Some(TokenKind::Typeof),
        "var" => Some(TokenKind::Var),
        "void" => Some(TokenKind::Void),
        "while" => Some(TokenKind::While),
        "with" => Some(TokenKind::With),
        _ => None,
    }
}

/// `true` when `name` spells a reserved word, which only an escaped
/// identifier token can carry.
pub fn is_reserved_word(name: &str) -> bool {
    keyword_kind(name).is_some()
}

/// Words reserved only in strict mode code.
pub fn is_strict_mode_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "implements"
            | "interface"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
            | "let"
    )
}

/// `eval` and `arguments`, which strict code may not bind or assign.
pub fn is_restricted_word(name: &str) -> bool {
    matches!(name, "eval" | "arguments")
}

/// Returns `true` when a `/` should open a regular-expression literal rather
/// than act as a division operator, given the most recent significant token.
///
/// The parser knows the answer exactly; this heuristic only serves
/// [`Scanner::tokenize_all`], which has no grammar to ask.  `/` is
/// *division* only after tokens that produce a value (identifier, literal,
/// `)`, `]`, `}`, `++`, `--`, or `true`/`false`/`null`/`this`).
fn slash_is_regexp(last: Option<TokenKind>) -> bool {
    match last {
        None => true,
        Some(k) => !matches!(
            k,
            TokenKind::Identifier
                | TokenKind::NumericLiteral
                | TokenKind::StringLiteral
                | TokenKind::RegExpLiteral
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::This
        ),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner state
// ─────────────────────────────────────────────────────────────────────────────

/// A copyable snapshot of the scanner's cursor.
///
/// Restoring a snapshot with [`Scanner::restore`] rewinds the scanner so the
/// same tokens are produced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerState {
    pos: usize,
    line: u32,
    column: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// ECMAScript lexer.
///
/// Produces a stream of [`Token`]s from a UTF-8 source string.  Call
/// [`Scanner::next_token`] repeatedly until a token with
/// [`TokenKind::Eof`] is returned.  Whitespace and comments are skipped;
/// their line terminators are reported through
/// [`Token::had_line_terminator_before`].
///
/// # Example
///
/// ```
/// use esparto_core::parser::scanner::{Scanner, TokenKind};
///
/// let mut sc = Scanner::new("var x = 42;");
/// loop {
///     let tok = sc.next_token().unwrap();
///     if tok.kind == TokenKind::Eof { break; }
///     println!("{:?}", tok.kind);
/// }
/// ```
pub struct Scanner<'src> {
    /// The complete source string.
    source: &'src str,
    /// Current byte position within `source`.
    pos: usize,
    /// Current 1-based line number.
    line: u32,
    /// Current 0-based column number.
    column: u32,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner for the given UTF-8 source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    /// The source text being scanned.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns `true` when all input has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Capture the current cursor.
    pub fn snapshot(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Rewind to a cursor previously captured with [`Scanner::snapshot`].
    pub fn restore(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.column = state.column;
    }

    // ── Low-level character helpers ─────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.source[self.pos..].chars();
        it.next();
        it.next()
    }

    /// Advance past the current character and update line/column tracking.
    ///
    /// `\r\n` is treated as a single line terminator; the `\n` is consumed
    /// automatically so callers never see a stray `\r`.  Must not be called
    /// at end of input.
    fn advance(&mut self) -> char {
        let Some(ch) = self.peek() else {
            return '\0';
        };
        self.pos += ch.len_utf8();
        match ch {
            '\r' => {
                if self.source[self.pos..].starts_with('\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.column = 0;
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
            }
            _ => {
                self.column += 1;
            }
        }
        ch
    }

    fn current_mark(&self) -> Mark {
        Mark {
            offset: self.pos,
            position: Position {
                line: self.line,
                column: self.column,
            },
        }
    }

    fn error(&self, at: Mark, message: Message) -> Diagnostic {
        Diagnostic::at(
            DiagnosticKind::Lexical,
            message.to_string(),
            at.offset,
            at.position,
        )
        .with_snippet_from(self.source)
    }

    fn illegal(&self, at: Mark) -> Diagnostic {
        self.error(at, Message::UnexpectedToken("ILLEGAL".into()))
    }

    fn token(&self, kind: TokenKind, value: TokenValue, start: Mark, had_lt: bool) -> Token {
        Token {
            kind,
            value,
            start,
            end: self.current_mark(),
            had_line_terminator_before: had_lt,
            octal: false,
        }
    }

    // ── Whitespace and comments ─────────────────────────────────────────────

    /// Consume whitespace and comments; return `true` if any line
    /// terminators were encountered.
    fn skip_trivia(&mut self) -> ParseResult<bool> {
        let mut had_lt = false;
        // Shebang, only valid at byte 0.
        if self.pos == 0 && self.source.starts_with("#!") {
            while matches!(self.peek(), Some(c) if !is_line_terminator(c)) {
                self.advance();
            }
        }
        while let Some(c) = self.peek() {
            if is_js_whitespace(c) {
                self.advance();
            } else if is_line_terminator(c) {
                had_lt = true;
                self.advance();
            } else if c == '/' && self.peek2() == Some('/') {
                while matches!(self.peek(), Some(c) if !is_line_terminator(c)) {
                    self.advance();
                }
            } else if c == '/' && self.peek2() == Some('*') {
                let start = self.current_mark();
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.peek() {
                        None => return Err(self.error(start, Message::UnexpectedEos)),
                        Some('*') if self.peek2() == Some('/') => {
                            self.advance();
                            self.advance();
                            break;
                        }
                        Some(ch) => {
                            if is_line_terminator(ch) {
                                had_lt = true;
                            }
                            self.advance();
                        }
                    }
                }
            } else {
                break;
            }
        }
        Ok(had_lt)
    }

    // ── Digit-run helpers ───────────────────────────────────────────────────

    fn scan_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if c.is_digit(radix)) {
            self.advance();
            count += 1;
        }
        count
    }

    // ── String literal ──────────────────────────────────────────────────────

    /// Consume one escape sequence starting *after* the leading `\`, append
    /// its cooked value to `out`, and return `true` for a legacy octal
    /// escape.
    fn scan_escape_sequence(&mut self, start: Mark, out: &mut String) -> ParseResult<bool> {
        let Some(c) = self.peek() else {
            return Err(self.illegal(start));
        };
        self.advance();
        let mut octal = false;
        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            'u' => out.push(self.scan_unicode_escape(start)?),
            'x' => {
                let hex_start = self.pos;
                if self.scan_hex_exact(2) {
                    let code = u32::from_str_radix(&self.source[hex_start..self.pos], 16)
                        .map_err(|_| self.illegal(start))?;
                    out.push(char::from_u32(code).ok_or_else(|| self.illegal(start))?);
                } else {
                    return Err(self.illegal(start));
                }
            }
            '0'..='7' => {
                // `\0` not followed by a digit is the NUL escape; anything
                // else is a legacy octal escape of up to three digits.
                let mut code = c.to_digit(8).unwrap_or(0);
                if c != '0' || matches!(self.peek(), Some('0'..='9')) {
                    octal = true;
                }
                let max_len = if c <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.advance();
                            len += 1;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            // Line continuation.
            c if is_line_terminator(c) => {}
            other => out.push(other),
        }
        Ok(octal)
    }

    /// After `\u`, consume `XXXX` or `{X…}` and return the code point.
    fn scan_unicode_escape(&mut self, start: Mark) -> ParseResult<char> {
        let code = if self.peek() == Some('{') {
            self.advance();
            let hex_start = self.pos;
            if self.scan_digits(16) == 0 || self.peek() != Some('}') {
                return Err(self.illegal(start));
            }
            let digits = &self.source[hex_start..self.pos];
            self.advance(); // }
            u32::from_str_radix(digits, 16).map_err(|_| self.illegal(start))?
        } else {
            let hex_start = self.pos;
            if !self.scan_hex_exact(4) {
                return Err(self.illegal(start));
            }
            u32::from_str_radix(&self.source[hex_start..self.pos], 16)
                .map_err(|_| self.illegal(start))?
        };
        // Lone surrogates cannot be represented in a Rust string.
        Ok(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    fn scan_hex_exact(&mut self, n: usize) -> bool {
        for _ in 0..n {
            match self.peek() {
                Some(d) if d.is_ascii_hexdigit() => {
                    self.advance();
                }
                _ => return false,
            }
        }
        true
    }

    fn scan_string(&mut self, quote: char, start: Mark, had_lt: bool) -> ParseResult<Token> {
        let mut cooked = String::new();
        let mut octal = false;
        loop {
            match self.peek() {
                None => return Err(self.illegal(start)),
                Some(c) if is_line_terminator(c) => return Err(self.illegal(start)),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance(); // consume '\'
                    octal |= self.scan_escape_sequence(start, &mut cooked)?;
                }
                Some(c) => {
                    cooked.push(c);
                    self.advance();
                }
            }
        }
        let mut tok = self.token(
            TokenKind::StringLiteral,
            TokenValue::Str(cooked),
            start,
            had_lt,
        );
        tok.octal = octal;
        Ok(tok)
    }

    // ── Regular-expression literal ──────────────────────────────────────────

    /// Re-scan `slash` (a [`TokenKind::Slash`] or [`TokenKind::SlashEqual`]
    /// token) as the start of a regular-expression literal.
    ///
    /// The parser calls this when the token sits where an expression may
    /// begin.  The scanner is rewound to the slash, so any token scanned
    /// after it is discarded.
    pub fn rescan_as_regexp(&mut self, slash: &Token) -> ParseResult<Token> {
        self.pos = slash.start.offset;
        self.line = slash.start.position.line;
        self.column = slash.start.position.column;
        let start = slash.start;
        self.advance(); // opening '/'
        let body_start = self.pos;
        let mut in_class = false;

        loop {
            match self.peek() {
                None => return Err(self.error(start, Message::UnterminatedRegExp)),
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error(start, Message::UnterminatedRegExp));
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => break,
                Some('\\') => {
                    self.advance(); // '\'
                    match self.peek() {
                        Some(c) if !is_line_terminator(c) => {
                            self.advance();
                        }
                        _ => return Err(self.error(start, Message::UnterminatedRegExp)),
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let pattern = self.source[body_start..self.pos].to_string();
        self.advance(); // closing '/'

        let flags_start = self.pos;
        while matches!(self.peek(), Some(c) if is_id_continue(c)) {
            self.advance();
        }
        if self.peek() == Some('\\') {
            return Err(self.error(start, Message::InvalidRegExpFlags));
        }
        let flags = self.source[flags_start..self.pos].to_string();

        Ok(self.token(
            TokenKind::RegExpLiteral,
            TokenValue::RegExp { pattern, flags },
            start,
            slash.had_line_terminator_before,
        ))
    }

    // ── Numeric literal ─────────────────────────────────────────────────────

    /// Scan a numeric literal given that `first` has already been consumed.
    fn scan_numeric(&mut self, first: char, start: Mark, had_lt: bool) -> ParseResult<Token> {
        let mut octal = false;
        let value = if first == '0' && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            let radix = match self.advance() {
                'x' | 'X' => 16,
                'o' | 'O' => 8,
                _ => 2,
            };
            let digits_start = self.pos;
            if self.scan_digits(radix) == 0 {
                return Err(self.illegal(start));
            }
            parse_radix(&self.source[digits_start..self.pos], radix)
        } else if first == '0' && matches!(self.peek(), Some('0'..='7')) {
            // Legacy octal `017`; an 8 or 9 anywhere makes it decimal (`019`).
            let digits_start = self.pos;
            self.scan_digits(8);
            if matches!(self.peek(), Some('8' | '9')) {
                self.scan_digits(10);
                self.scan_fraction_and_exponent(start)?;
                self.parse_decimal(start)?
            } else {
                octal = true;
                parse_radix(&self.source[digits_start..self.pos], 8)
            }
        } else {
            if first != '.' {
                self.scan_digits(10);
                if self.peek() == Some('.') {
                    self.advance();
                    self.scan_digits(10);
                }
            } else {
                self.scan_digits(10);
            }
            self.scan_exponent(start)?;
            self.parse_decimal(start)?
        };

        // `3in`, `1x`, `08a`: an identifier may not touch a number.
        if matches!(self.peek(), Some(c) if is_id_start(c) || c.is_ascii_digit() || c == '\\') {
            return Err(self.illegal(start));
        }

        let mut tok = self.token(
            TokenKind::NumericLiteral,
            TokenValue::Number(value),
            start,
            had_lt,
        );
        tok.octal = octal;
        Ok(tok)
    }

    fn scan_fraction_and_exponent(&mut self, start: Mark) -> ParseResult<()> {
        if self.peek() == Some('.') {
            self.advance();
            self.scan_digits(10);
        }
        self.scan_exponent(start)
    }

    /// Consume an optional exponent part (`e` / `E`, optional sign, digits).
    fn scan_exponent(&mut self, start: Mark) -> ParseResult<()> {
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.scan_digits(10) == 0 {
                return Err(self.illegal(start));
            }
        }
        Ok(())
    }

    fn parse_decimal(&self, start: Mark) -> ParseResult<f64> {
        self.source[start.offset..self.pos]
            .parse::<f64>()
            .map_err(|_| self.illegal(start))
    }

    // ── Identifier / keyword ────────────────────────────────────────────────

    /// Scan an identifier or reserved word starting at `start`.  Nothing has
    /// been consumed yet.
    fn scan_identifier(&mut self, start: Mark, had_lt: bool) -> ParseResult<Token> {
        let mut name = String::new();
        let mut escaped = false;
        loop {
            match self.peek() {
                Some('\\') => {
                    self.advance();
                    if self.peek() != Some('u') {
                        return Err(self.illegal(start));
                    }
                    self.advance();
                    let ch = self.scan_unicode_escape(start)?;
                    let valid = if name.is_empty() {
                        is_id_start(ch)
                    } else {
                        is_id_continue(ch)
                    };
                    if !valid {
                        return Err(self.illegal(start));
                    }
                    escaped = true;
                    name.push(ch);
                }
                Some(c) if (name.is_empty() && is_id_start(c)) || (!name.is_empty() && is_id_continue(c)) => {
                    name.push(c);
                    self.advance();
                }
                _ => break,
            }
        }
        // An escaped reserved word is still an identifier token; the parser
        // rejects it wherever a reserved word is not allowed.
        let kind = if escaped {
            TokenKind::Identifier
        } else {
            keyword_kind(&name).unwrap_or(TokenKind::Identifier)
        };
        let value = match kind {
            TokenKind::Identifier => TokenValue::Str(name),
            _ => TokenValue::None,
        };
        Ok(self.token(kind, value, start, had_lt))
    }

    // ── Punctuators ─────────────────────────────────────────────────────────

    /// Consume the longest operator whose first character `c` has already
    /// been consumed.
    fn scan_punctuator(&mut self, c: char) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match c {
            '{' => LeftBrace,
            '}' => RightBrace,
            '(' => LeftParen,
            ')' => RightParen,
            '[' => LeftBracket,
            ']' => RightBracket,
            ';' => Semicolon,
            ',' => Comma,
            '~' => Tilde,
            '?' => Question,
            ':' => Colon,
            '.' => {
                if self.peek() == Some('.') && self.peek2() == Some('.') {
                    self.advance();
                    self.advance();
                    DotDotDot
                } else {
                    Dot
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') { LessLessEqual } else { LessLess }
                } else if self.eat('=') {
                    LessEqual
                } else {
                    Less
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            GreaterGreaterGreaterEqual
                        } else {
                            GreaterGreaterGreater
                        }
                    } else if self.eat('=') {
                        GreaterGreaterEqual
                    } else {
                        GreaterGreater
                    }
                } else if self.eat('=') {
                    GreaterEqual
                } else {
                    Greater
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') { EqualEqualEqual } else { EqualEqual }
                } else if self.eat('>') {
                    Arrow
                } else {
                    Equal
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') { BangEqualEqual } else { BangEqual }
                } else {
                    Bang
                }
            }
            '+' => {
                if self.eat('+') {
                    PlusPlus
                } else if self.eat('=') {
                    PlusEqual
                } else {
                    Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    MinusMinus
                } else if self.eat('=') {
                    MinusEqual
                } else {
                    Minus
                }
            }
            '*' => if self.eat('=') { StarEqual } else { Star },
            '/' => if self.eat('=') { SlashEqual } else { Slash },
            '%' => if self.eat('=') { PercentEqual } else { Percent },
            '^' => if self.eat('=') { CaretEqual } else { Caret },
            '&' => {
                if self.eat('&') {
                    AmpersandAmpersand
                } else if self.eat('=') {
                    AmpersandEqual
                } else {
                    Ampersand
                }
            }
            '|' => {
                if self.eat('|') {
                    PipePipe
                } else if self.eat('=') {
                    PipeEqual
                } else {
                    Pipe
                }
            }
            _ => return None,
        };
        Some(kind)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Main public API ─────────────────────────────────────────────────────

    /// Scan and return the next [`Token`].
    ///
    /// Returns a token with [`TokenKind::Eof`] when the input is exhausted.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        let had_lt = self.skip_trivia()?;
        let start = self.current_mark();

        let Some(c) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, TokenValue::None, start, had_lt));
        };

        if is_id_start(c) || c == '\\' {
            return self.scan_identifier(start, had_lt);
        }
        if c == '"' || c == '\'' {
            self.advance();
            return self.scan_string(c, start, had_lt);
        }
        if c.is_ascii_digit() || (c == '.' && matches!(self.peek2(), Some(d) if d.is_ascii_digit())) {
            self.advance();
            return self.scan_numeric(c, start, had_lt);
        }

        self.advance();
        match self.scan_punctuator(c) {
            Some(kind) => Ok(self.token(kind, TokenValue::None, start, had_lt)),
            // Includes the backtick: template literals are not supported.
            None => Err(self.illegal(start)),
        }
    }

    /// Convenience: tokenize the entire `source` string and return all tokens
    /// (the [`TokenKind::Eof`] sentinel is **not** included).
    ///
    /// Without a grammar to consult, a `/` is read as a regular expression
    /// whenever the previous token cannot end an operand.
    ///
    /// # Errors
    ///
    /// Returns the first lexical [`Diagnostic`] encountered.
    pub fn tokenize_all(source: &'src str) -> ParseResult<Vec<Token>> {
        let mut scanner = Scanner::new(source);
        let mut tokens: Vec<Token> = Vec::new();
        loop {
            let mut tok = scanner.next_token()?;
            if tok.kind == TokenKind::Eof {
                break;
            }
            if matches!(tok.kind, TokenKind::Slash | TokenKind::SlashEqual)
                && slash_is_regexp(tokens.last().map(|t| t.kind))
            {
                tok = scanner.rescan_as_regexp(&tok)?;
            }
            tokens.push(tok);
        }
        Ok(tokens)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Numeric parsing helper
// ─────────────────────────────────────────────────────────────────────────────

/// Value of a digit run in `radix`.  Accumulates in `f64` so literals wider
/// than 64 bits lose precision instead of failing.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::tokenize_all(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn tokens(src: &str) -> Vec<Token> {
        Scanner::tokenize_all(src).unwrap()
    }

    // ── Keywords ─────────────────────────────────────────────────────────────

    #[test]
    fn test_keywords_reserved() {
        let src = "break case catch class const continue debugger default \
                   delete do else enum export extends false finally for \
                   function if import in instanceof new null return \
                   super switch this throw true try typeof var void \
                   while with";
        let toks = kinds(src);
        assert_eq!(toks.len(), 36);
        assert!(toks.iter().all(|k| k.is_keyword()));
        assert_eq!(toks[0], TokenKind::Break);
        assert_eq!(toks[35], TokenKind::With);
    }

    #[test]
    fn test_strict_reserved_words_are_identifiers() {
        for t in tokens("let yield static implements") {
            assert_eq!(t.kind, TokenKind::Identifier);
        }
        assert!(is_strict_mode_reserved_word("yield"));
        assert!(!is_strict_mode_reserved_word("yielded"));
    }

    #[test]
    fn test_future_reserved() {
        assert!(TokenKind::Enum.is_future_reserved());
        assert!(!TokenKind::Const.is_future_reserved());
    }

    // ── Identifiers ───────────────────────────────────────────────────────────

    #[test]
    fn test_identifier_simple() {
        let toks = tokens("foo _bar $baz");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].value, TokenValue::Str("foo".into()));
        assert_eq!(toks[1].kind, TokenKind::Identifier);
        assert_eq!(toks[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_identifier_unicode() {
        let toks = tokens("café");
        assert_eq!(toks[0].value, TokenValue::Str("café".into()));
    }

    #[test]
    fn test_identifier_unicode_escape_is_decoded() {
        let toks = tokens(r"\u0061bc");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].value, TokenValue::Str("abc".into()));
    }

    #[test]
    fn test_escaped_keyword_stays_identifier() {
        let toks = tokens(r"v\u0061r");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].str_value(), Some("var"));
    }

    // ── Numeric literals ──────────────────────────────────────────────────────

    #[test]
    fn test_numeric_decimal() {
        let toks = tokens("0 42 1.5 .5 1e3 1.5e-2 3.");
        let values: Vec<_> = toks.iter().map(|t| t.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                TokenValue::Number(0.0),
                TokenValue::Number(42.0),
                TokenValue::Number(1.5),
                TokenValue::Number(0.5),
                TokenValue::Number(1000.0),
                TokenValue::Number(0.015),
                TokenValue::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_numeric_radix_prefixes() {
        let toks = tokens("0xFF 0o17 0b1010");
        assert_eq!(toks[0].value, TokenValue::Number(255.0));
        assert_eq!(toks[1].value, TokenValue::Number(15.0));
        assert_eq!(toks[2].value, TokenValue::Number(10.0));
        assert!(toks.iter().all(|t| !t.octal));
    }

    #[test]
    fn test_numeric_legacy_octal_is_flagged() {
        let toks = tokens("017 019");
        assert_eq!(toks[0].value, TokenValue::Number(15.0));
        assert!(toks[0].octal);
        assert_eq!(toks[1].value, TokenValue::Number(19.0));
        assert!(!toks[1].octal);
    }

    #[test]
    fn test_identifier_touching_number_is_illegal() {
        let err = Scanner::tokenize_all("var 1x = 2;").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Lexical);
        assert_eq!(err.message, "Unexpected token ILLEGAL");
        assert_eq!(err.index, Some(4));
        assert_eq!(err.position, Position::new(1, 4).unwrap());
    }

    #[test]
    fn test_missing_exponent_digits() {
        assert!(Scanner::tokenize_all("1e+").is_err());
        assert!(Scanner::tokenize_all("0x").is_err());
    }

    // ── String literals ───────────────────────────────────────────────────────

    #[test]
    fn test_string_quotes() {
        let toks = tokens(r#""hello" 'world'"#);
        assert_eq!(toks[0].value, TokenValue::Str("hello".into()));
        assert_eq!(toks[1].value, TokenValue::Str("world".into()));
    }

    #[test]
    fn test_string_escape_sequences_are_cooked() {
        let toks = tokens(r#""a\nb\t\x41B\u{43}\'""#);
        assert_eq!(toks[0].value, TokenValue::Str("a\nb\tABC'".into()));
        assert!(!toks[0].octal);
    }

    #[test]
    fn test_string_octal_escape_is_flagged() {
        let toks = tokens(r#""\101" "\0""#);
        assert_eq!(toks[0].value, TokenValue::Str("A".into()));
        assert!(toks[0].octal);
        assert_eq!(toks[1].value, TokenValue::Str("\0".into()));
        assert!(!toks[1].octal);
    }

    #[test]
    fn test_string_line_continuation() {
        let toks = tokens("'a\\\nb'");
        assert_eq!(toks[0].value, TokenValue::Str("ab".into()));
    }

    #[test]
    fn test_string_unterminated_error() {
        let err = Scanner::tokenize_all("'abc").unwrap_err();
        assert_eq!(err.message, "Unexpected token ILLEGAL");
        assert!(Scanner::tokenize_all("'abc\ndef'").is_err());
    }

    #[test]
    fn test_string_bad_hex_escape() {
        assert!(Scanner::tokenize_all(r#""\xZZ""#).is_err());
    }

    #[test]
    fn test_raw_text() {
        let src = r#"x = "a\n""#;
        let toks = tokens(src);
        assert_eq!(toks[2].raw(src), r#""a\n""#);
    }

    // ── Regular expressions ───────────────────────────────────────────────────

    #[test]
    fn test_regexp_basic() {
        let toks = tokens("/ab+c/gi");
        assert_eq!(toks[0].kind, TokenKind::RegExpLiteral);
        assert_eq!(
            toks[0].value,
            TokenValue::RegExp {
                pattern: "ab+c".into(),
                flags: "gi".into()
            }
        );
    }

    #[test]
    fn test_regexp_with_char_class_and_escape() {
        let toks = tokens(r"/[/]\//");
        assert_eq!(
            toks[0].value,
            TokenValue::RegExp {
                pattern: r"[/]\/".into(),
                flags: String::new()
            }
        );
    }

    #[test]
    fn test_division_after_identifier() {
        assert_eq!(
            kinds("a / b / c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_regexp_after_assignment() {
        assert_eq!(
            kinds("x = /y/"),
            vec![TokenKind::Identifier, TokenKind::Equal, TokenKind::RegExpLiteral]
        );
    }

    #[test]
    fn test_rescan_slash_equal() {
        let mut sc = Scanner::new("/=x/");
        let slash = sc.next_token().unwrap();
        assert_eq!(slash.kind, TokenKind::SlashEqual);
        let re = sc.rescan_as_regexp(&slash).unwrap();
        assert_eq!(
            re.value,
            TokenValue::RegExp {
                pattern: "=x".into(),
                flags: String::new()
            }
        );
        assert_eq!(sc.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_error_unterminated_regexp() {
        let err = Scanner::tokenize_all("/abc").unwrap_err();
        assert_eq!(err.message, "Invalid regular expression: missing /");
        assert!(Scanner::tokenize_all("/abc\n/").is_err());
    }

    // ── Comments / trivia ─────────────────────────────────────────────────────

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // line\n/* block */ b"),
            vec![TokenKind::Identifier, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_block_comment_with_line_terminator_sets_flag() {
        let toks = tokens("a /*\n*/ b");
        assert!(toks[1].had_line_terminator_before);
        let toks = tokens("a /* */ b");
        assert!(!toks[1].had_line_terminator_before);
    }

    #[test]
    fn test_error_unterminated_block_comment() {
        let err = Scanner::tokenize_all("/* never closed").unwrap_err();
        assert_eq!(err.message, "Unexpected end of input");
    }

    #[test]
    fn test_shebang_is_skipped() {
        assert_eq!(kinds("#!/usr/bin/env node\nx"), vec![TokenKind::Identifier]);
    }

    // ── Punctuators ───────────────────────────────────────────────────────────

    #[test]
    fn test_punctuators_longest_match() {
        assert_eq!(
            kinds("a >>>= b !== c => ... <<= &&"),
            vec![
                TokenKind::Identifier,
                TokenKind::GreaterGreaterGreaterEqual,
                TokenKind::Identifier,
                TokenKind::BangEqualEqual,
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::DotDotDot,
                TokenKind::LessLessEqual,
                TokenKind::AmpersandAmpersand,
            ]
        );
    }

    #[test]
    fn test_punctuator_text_round_trips() {
        for src in ["{", ">>>=", "!==", "=>", "...", "&&", "%="] {
            let tok = &tokens(src)[0];
            assert_eq!(tok.kind.as_str(), Some(src));
        }
        assert!(TokenKind::StarEqual.is_assignment_operator());
        assert!(!TokenKind::EqualEqual.is_assignment_operator());
    }

    #[test]
    fn test_backtick_is_illegal() {
        let err = Scanner::tokenize_all("`x`").unwrap_err();
        assert_eq!(err.message, "Unexpected token ILLEGAL");
    }

    #[test]
    fn test_unknown_character_is_illegal() {
        let err = Scanner::tokenize_all("a @ b").unwrap_err();
        assert_eq!(err.position, Position::new(1, 2).unwrap());
        assert_eq!(err.snippet.as_deref(), Some("a @ b"));
    }

    // ── Positions ─────────────────────────────────────────────────────────────

    #[test]
    fn test_line_column_tracking() {
        let toks = tokens("a\n  bb\r\n c");
        assert_eq!(toks[0].start.position, Position::new(1, 0).unwrap());
        assert_eq!(toks[1].start.position, Position::new(2, 2).unwrap());
        assert_eq!(toks[1].end.position, Position::new(2, 4).unwrap());
        assert_eq!(toks[2].start.position, Position::new(3, 1).unwrap());
        assert_eq!(toks[2].start.offset, 9);
    }

    #[test]
    fn test_asi_flag() {
        let toks = tokens("return\n1");
        assert!(!toks[0].had_line_terminator_before);
        assert!(toks[1].had_line_terminator_before);
        let toks = tokens("return 1");
        assert!(!toks[1].had_line_terminator_before);
    }

    #[test]
    fn test_snapshot_restore_replays_tokens() {
        let mut sc = Scanner::new("a + b");
        let first = sc.next_token().unwrap();
        let saved = sc.snapshot();
        let plus = sc.next_token().unwrap();
        let b = sc.next_token().unwrap();
        sc.restore(saved);
        assert_eq!(sc.next_token().unwrap(), plus);
        assert_eq!(sc.next_token().unwrap(), b);
        assert_eq!(first.kind, TokenKind::Identifier);
    }
}
