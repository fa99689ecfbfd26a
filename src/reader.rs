use crate::{
    unicode::{combine_surrogate_pair, digit_to_int, is_lead_surrogate, is_trail_surrogate},
    wtf16::Wtf16,
};

pub type CodePoint = u32;

fn is_surrogate_code_point(value: u16) -> bool {
    (0xd800..=0xdfff).contains(&value)
}

/// Character-level lexical service over a pattern source: O(1) peek/advance
/// with code-unit offset tracking, and the escape-decoding helpers the
/// validator drives the grammar with.
pub struct Reader {
    use_unicode_impl: bool,
    source: Vec<u16>,
    i: usize,
    start: usize,
    end: usize,
    cp1: Option<CodePoint>,
    w1: usize,
    cp2: Option<CodePoint>,
    w2: usize,
    cp3: Option<CodePoint>,
    w3: usize,
    cp4: Option<CodePoint>,
}

impl Default for Reader {
    fn default() -> Self {
        Self {
            use_unicode_impl: false,
            source: Default::default(),
            i: 0,
            start: 0,
            end: 0,
            cp1: None,
            w1: 1,
            cp2: None,
            w2: 1,
            cp3: None,
            w3: 1,
            cp4: None,
        }
    }
}

impl Reader {
    fn at(&self, i: usize) -> Option<CodePoint> {
        if i >= self.end {
            return None;
        }
        let index = i - self.start;
        let unit = self.source[index];
        if !self.use_unicode_impl || !is_surrogate_code_point(unit) {
            return Some(unit.into());
        }
        if is_lead_surrogate(unit.into()) {
            if let Some(&trail) = self.source.get(index + 1) {
                if is_trail_surrogate(trail.into()) {
                    return Some(combine_surrogate_pair(unit.into(), trail.into()));
                }
            }
        }
        Some(unit.into())
    }

    fn width(&self, c: Option<CodePoint>) -> usize {
        match c {
            Some(c) if c > 0xffff => 2,
            _ => 1,
        }
    }

    pub fn offset(&self) -> usize {
        self.i
    }

    pub fn index(&self) -> usize {
        self.i
    }

    pub fn reset(&mut self, source: &Wtf16, start: usize, end: usize, unicode: bool) {
        self.use_unicode_impl = unicode;
        self.start = start;
        self.source = source.slice(start, end).to_vec();
        self.end = end;
        self.rewind(start);
    }

    pub fn rewind(&mut self, index: usize) {
        assert!(
            index >= self.start,
            "Not expecting to rewind past initial start"
        );
        self.i = index;
        self.cp1 = self.at(index);
        self.w1 = self.width(self.cp1);
        self.cp2 = self.at(index + self.w1);
        self.w2 = self.width(self.cp2);
        self.cp3 = self.at(index + self.w1 + self.w2);
        self.w3 = self.width(self.cp3);
        self.cp4 = self.at(index + self.w1 + self.w2 + self.w3);
    }

    pub fn current(&self) -> Option<CodePoint> {
        self.cp1
    }

    pub fn next(&self) -> Option<CodePoint> {
        self.cp2
    }

    pub fn peek(&self, k: usize) -> Option<CodePoint> {
        match k {
            0 => self.cp1,
            1 => self.cp2,
            2 => self.cp3,
            3 => self.cp4,
            _ => {
                let mut offset = self.i;
                for _ in 0..k {
                    offset += self.width(self.at(offset));
                }
                self.at(offset)
            }
        }
    }

    pub fn advance(&mut self) {
        if self.cp1.is_none() {
            return;
        }
        self.rewind(self.i + self.w1);
    }

    pub fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    pub fn eat(&mut self, cp: CodePoint) -> bool {
        if self.cp1 == Some(cp) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat2(&mut self, cp1: CodePoint, cp2: CodePoint) -> bool {
        if self.cp1 == Some(cp1) && self.cp2 == Some(cp2) {
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat3(&mut self, cp1: CodePoint, cp2: CodePoint, cp3: CodePoint) -> bool {
        if self.cp1 == Some(cp1) && self.cp2 == Some(cp2) && self.cp3 == Some(cp3) {
            self.advance();
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_decimal_digits(&mut self) -> Option<u64> {
        let start = self.i;
        let mut value: u64 = 0;
        let mut found = false;
        while let Some(cp) = self.current() {
            if !(0x30..=0x39).contains(&cp) {
                break;
            }
            value = value.saturating_mul(10).saturating_add((cp - 0x30) as u64);
            found = true;
            self.advance();
        }
        if found {
            Some(value)
        } else {
            self.rewind(start);
            None
        }
    }

    fn is_hex_digit(cp: CodePoint) -> bool {
        (0x30..=0x39).contains(&cp) || (0x41..=0x46).contains(&cp) || (0x61..=0x66).contains(&cp)
    }

    /// Consumes exactly `n` hex digits (if `at_most` is false) or up to `n`
    /// (if `at_most` is true), returning the decoded value.
    pub fn eat_hex_digits(&mut self, n: usize, at_most: bool) -> Option<u32> {
        let start = self.i;
        let mut value: u32 = 0;
        let mut count = 0;
        while count < n {
            match self.current() {
                Some(cp) if Self::is_hex_digit(cp) => {
                    value = value * 16 + digit_to_int(cp);
                    self.advance();
                    count += 1;
                }
                _ => break,
            }
        }
        if count == n || (at_most && count > 0) {
            Some(value)
        } else {
            self.rewind(start);
            None
        }
    }

    pub fn eat_octal_digits(&mut self, max: usize) -> Option<u32> {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            match self.current() {
                Some(cp) if (0x30..=0x37).contains(&cp) => {
                    value = value * 8 + (cp - 0x30);
                    self.advance();
                    count += 1;
                }
                _ => break,
            }
        }
        if count > 0 {
            Some(value)
        } else {
            None
        }
    }

    /// `\uXXXX`, `\u{X...}` or a surrogate pair of `\uXXXX\uXXXX`, assuming
    /// the caller already consumed the leading `\u`.
    pub fn eat_reg_exp_unicode_escape_sequence(&mut self, unicode: bool) -> Option<CodePoint> {
        let start = self.i;

        if unicode && self.eat(0x7b) {
            // '{'
            if let Some(value) = self.eat_hex_digits(6, true) {
                if value <= 0x10ffff && self.eat(0x7d) {
                    // '}'
                    return Some(value);
                }
            }
            self.rewind(start);
            return None;
        }

        let lead = self.eat_hex_digits(4, false)?;
        if !unicode || !(0xd800..=0xdbff).contains(&lead) {
            return Some(lead);
        }

        let lead_end = self.i;
        if !self.eat2(0x5c, 0x75) {
            // '\u'
            return Some(lead);
        }
        match self.eat_hex_digits(4, false) {
            Some(trail) if (0xdc00..=0xdfff).contains(&trail) => {
                Some(combine_surrogate_pair(lead, trail))
            }
            _ => {
                self.rewind(lead_end);
                Some(lead)
            }
        }
    }
}
