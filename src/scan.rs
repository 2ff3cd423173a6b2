//! `scanf`-style field extraction.
//!
//! Supported conversions: `%d`, `%i`, `%u`, `%x`, `%f` (also `%e`, `%g`),
//! `%c`, `%s` and `%%`, each with an optional field width and ignored
//! `l`/`h` length modifiers. Whitespace in the format matches any run of
//! input whitespace, other characters must match literally. Parsing stops at
//! the first field that does not match.

use alloc::string::String;
use alloc::vec::Vec;
use core::iter::Peekable;
use core::str::Chars;

/// One converted field.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanValue {
    Int(i64),
    Unsigned(u64),
    Float(f64),
    Char(char),
    Str(String),
}

impl ScanValue {
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ScanValue::Int(v) => Some(v),
            ScanValue::Unsigned(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            ScanValue::Unsigned(v) => Some(v),
            ScanValue::Int(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ScanValue::Float(v) => Some(v),
            ScanValue::Int(v) => Some(v as f64),
            ScanValue::Unsigned(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match *self {
            ScanValue::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScanValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

struct Spec {
    width: Option<usize>,
    conversion: char,
}

fn next_spec(format: &mut Peekable<Chars<'_>>) -> Option<Spec> {
    let mut width = None;
    while let Some(d) = format.peek().and_then(|c| c.to_digit(10)) {
        width = Some(width.unwrap_or(0usize).saturating_mul(10).saturating_add(d as usize));
        format.next();
    }
    while matches!(format.peek(), Some('l' | 'h')) {
        format.next();
    }
    format.next().map(|conversion| Spec { width, conversion })
}

/// Conversions [`parse`] understands, besides `%%`.
const CONVERSIONS: &str = "diuxXfeEgGcs";

/// Number of fields `format` asks for, or `None` if it uses a conversion
/// [`parse`] cannot handle (`%[`, `%n`, `%p`, ...).
pub fn placeholder_count(format: &str) -> Option<usize> {
    let mut format = format.chars().peekable();
    let mut count = 0;
    while let Some(c) = format.next() {
        if c != '%' {
            continue;
        }
        match next_spec(&mut format) {
            Some(spec) if spec.conversion == '%' => {}
            Some(spec) if CONVERSIONS.contains(spec.conversion) => count += 1,
            Some(_) => return None,
            None => break,
        }
    }
    Some(count)
}

struct Input<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Input<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume up to `limit` characters matching `pred`.
    fn take_while(&mut self, limit: usize, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let mut taken = 0;
        while taken < limit && self.peek().is_some_and(&pred) {
            self.bump();
            taken += 1;
        }
        let text = self.text;
        &text[start..self.pos]
    }

    /// Optional sign followed by digits of `radix`, within `limit` chars.
    fn number(&mut self, limit: usize, radix: u32) -> Option<&'a str> {
        let start = self.pos;
        let mut limit = limit;
        if limit > 0 && matches!(self.peek(), Some('+' | '-')) {
            self.bump();
            limit -= 1;
        }
        let digits = self.take_while(limit, |c| c.is_digit(radix));
        if digits.is_empty() {
            self.pos = start;
            return None;
        }
        let text = self.text;
        Some(&text[start..self.pos])
    }

    fn hex(&mut self, limit: usize) -> Option<u64> {
        let mut limit = limit;
        if limit >= 3 && self.text[self.pos..].len() > 2 {
            let rest = &self.text[self.pos..];
            if (rest.starts_with("0x") || rest.starts_with("0X")) && rest[2..].starts_with(|c: char| c.is_ascii_hexdigit()) {
                self.pos += 2;
                limit -= 2;
            }
        }
        let digits = self.take_while(limit, |c| c.is_ascii_hexdigit());
        u64::from_str_radix(digits, 16).ok()
    }

    /// Like [`Input::take_while`] but charges the taken count to `left`.
    fn take_counted(&mut self, left: &mut usize, pred: impl Fn(char) -> bool) -> usize {
        let n = self.take_while(*left, pred).chars().count();
        *left -= n;
        n
    }

    fn float(&mut self, limit: usize) -> Option<f64> {
        let start = self.pos;
        let mut left = limit;
        if left > 0 && matches!(self.peek(), Some('+' | '-')) {
            self.bump();
            left -= 1;
        }
        let int_digits = self.take_counted(&mut left, |c| c.is_ascii_digit());
        let mut frac_digits = 0;
        if left > 0 && self.peek() == Some('.') {
            self.bump();
            left -= 1;
            frac_digits = self.take_counted(&mut left, |c| c.is_ascii_digit());
        }
        if int_digits + frac_digits == 0 {
            self.pos = start;
            return None;
        }
        let mantissa_end = self.pos;
        if left > 1 && matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            left -= 1;
            if left > 0 && matches!(self.peek(), Some('+' | '-')) {
                self.bump();
                left -= 1;
            }
            if self.take_counted(&mut left, |c| c.is_ascii_digit()) == 0 {
                self.pos = mantissa_end;
            }
        }
        self.text[start..self.pos].parse().ok()
    }
}

/// Convert `input` according to `format`. Returns the fields converted
/// before the first mismatch.
pub fn parse(input: &str, format: &str) -> Vec<ScanValue> {
    let mut values = Vec::new();
    let mut input = Input { text: input, pos: 0 };
    let mut format = format.chars().peekable();

    while let Some(f) = format.next() {
        if f.is_whitespace() {
            input.skip_whitespace();
            continue;
        }
        if f != '%' {
            if input.bump() != Some(f) {
                break;
            }
            continue;
        }

        let Some(spec) = next_spec(&mut format) else {
            break;
        };
        let limit = spec.width.unwrap_or(usize::MAX);
        if spec.conversion != 'c' {
            input.skip_whitespace();
        }

        let value = match spec.conversion {
            '%' => {
                if input.bump() != Some('%') {
                    break;
                }
                continue;
            }
            'd' => input.number(limit, 10).and_then(|s| s.parse().ok()).map(ScanValue::Int),
            'i' => {
                let save = input.pos;
                let negative = input.peek() == Some('-');
                if matches!(input.peek(), Some('+' | '-')) {
                    input.bump();
                }
                let rest = &input.text[input.pos..];
                if rest.starts_with("0x") || rest.starts_with("0X") {
                    input
                        .hex(limit)
                        .and_then(|v| i64::try_from(v).ok())
                        .map(|v| ScanValue::Int(if negative { -v } else { v }))
                } else {
                    input.pos = save;
                    input.number(limit, 10).and_then(|s| s.parse().ok()).map(ScanValue::Int)
                }
            }
            'u' => input
                .number(limit, 10)
                .and_then(|s| s.trim_start_matches('+').parse().ok())
                .map(ScanValue::Unsigned),
            'x' | 'X' => input.hex(limit).map(ScanValue::Unsigned),
            'f' | 'e' | 'g' | 'F' | 'E' | 'G' => input.float(limit).map(ScanValue::Float),
            'c' => {
                let width = spec.width.unwrap_or(1);
                let taken = input.take_while(width, |_| true);
                if taken.chars().count() < width {
                    None
                } else if width == 1 {
                    taken.chars().next().map(ScanValue::Char)
                } else {
                    Some(ScanValue::Str(taken.into()))
                }
            }
            's' => {
                let word = input.take_while(limit, |c| !c.is_whitespace());
                (!word.is_empty()).then(|| ScanValue::Str(word.into()))
            }
            _ => None,
        };

        match value {
            Some(v) => values.push(v),
            None => break,
        }
    }
    values
}
