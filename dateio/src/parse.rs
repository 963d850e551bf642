//! Date string recognition
//!
//! Two grammars are tried:
//!
//! - ISO 8601: `YYYY-MM-DDTHH:MM[:SS[.fff]][Z|±HH[:]MM]` (also signed
//!   years of 3 to 6 digits, such as `+002018` or `-044`, and a space
//!   instead of `T`). Without a zone designator the time is wall-clock.
//! - Loose: whitespace separated pieces in any order: a `Y/M/D`, `Y/M` or
//!   `M/D/Y` group, English month and weekday names, a bare year, a
//!   `H:I[:S[.fff|:fff]]` time, `AM`/`PM`, `GMT`/`UTC` with an optional
//!   `±h`, `±hh:mm` or `±hhmm` offset, and parenthesized comments.
//!
//! Dash-separated dates such as `2018-4-1` parse inconsistently when read as
//! ISO, so every `-` is rewritten to `/` before the loose grammar runs,
//! unless the text has a `T` time designator or ends in `Z` (where dashes
//! may be offsets, as in `GMT-0500`) or starts with a signed year.

use dateio_core::calendar::{days_in_month, make_date, make_day, make_time, MS_PER_MINUTE};
use dateio_core::{Error, Instant, Zone};

/// A parsed timestamp, before the zone is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stamp {
    /// Wall-clock milliseconds, resolved through the configured zone
    Wall(i64),
    /// Exact milliseconds since the epoch
    Exact(i64),
}

pub(crate) fn parse(text: &str, zone: Zone) -> Result<Instant, Error> {
    let trimmed = text.trim();
    let stamp = if trimmed.is_empty() {
        None
    } else if keeps_dashes(trimmed) {
        tracing::trace!(text, "parsing as ISO 8601");
        parse_iso(trimmed).or_else(|| parse_loose(trimmed))
    } else {
        tracing::trace!(text, "parsing as loose date");
        parse_loose(&trimmed.replace('-', "/"))
    };
    match stamp {
        Some(Stamp::Wall(wall)) => zone.from_wall(wall),
        Some(Stamp::Exact(millis)) => Instant::from_millis(millis),
        None => Err(Error::parse(text, "string")),
    }
}

/// A `T` followed by anything, a trailing `Z` or a leading signed year
fn keeps_dashes(text: &str) -> bool {
    let designator = text
        .char_indices()
        .any(|(i, c)| c.eq_ignore_ascii_case(&'t') && i + 1 < text.len());
    let signed_year = text
        .strip_prefix(['+', '-'])
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
    designator || signed_year || text.ends_with(['Z', 'z'])
}

fn wall_millis(year: i64, month: i64, day: i64, time: [i64; 4]) -> Option<i64> {
    let [hour, minute, second, millisecond] = time;
    make_date(make_day(year, month - 1, day)?, make_time(hour, minute, second, millisecond)?)
}

fn valid_time([hour, minute, second, millisecond]: [i64; 4]) -> bool {
    let midnight = hour == 24 && minute == 0 && second == 0 && millisecond == 0;
    (hour < 24 || midnight) && minute < 60 && second < 60 && millisecond < 1000
}

/// Milliseconds from the digits after a decimal point
fn fraction_millis(value: i64, digits: usize) -> i64 {
    match digits {
        0 => 0,
        1 => value * 100,
        2 => value * 10,
        3 => value,
        n => value / 10_i64.pow((n - 3) as u32),
    }
}

// ============================================================================
// ISO 8601
// ============================================================================

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { bytes: text.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Exactly `n` ASCII digits
    fn digits(&mut self, n: usize) -> Option<i64> {
        let end = self.pos.checked_add(n)?;
        let run = self.bytes.get(self.pos..end)?;
        if !run.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.pos = end;
        Some(run.iter().fold(0, |acc, b| acc * 10 + (b - b'0') as i64))
    }

    /// One or more digits, returned with their count
    fn digit_run(&mut self) -> Option<(i64, usize)> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) && self.pos - start < 18 {
            self.pos += 1;
        }
        let run = &self.bytes[start..self.pos];
        if run.is_empty() {
            return None;
        }
        Some((run.iter().fold(0, |acc, b| acc * 10 + (b - b'0') as i64), run.len()))
    }

    fn done(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

fn parse_iso(text: &str) -> Option<Stamp> {
    let mut cur = Cursor::new(text);

    let year = match cur.peek()? {
        sign @ (b'+' | b'-') => {
            cur.pos += 1;
            let (magnitude, len) = cur.digit_run()?;
            if !(3..=6).contains(&len) {
                return None;
            }
            if sign == b'-' { -magnitude } else { magnitude }
        }
        _ => cur.digits(4)?,
    };
    let (mut month, mut day) = (1, 1);
    if cur.eat(b'-') {
        month = cur.digits(2)?;
        if cur.eat(b'-') {
            day = cur.digits(2)?;
        }
    }
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month as u32) as i64 {
        return None;
    }

    let mut time = [0; 4];
    if cur.eat(b'T') || cur.eat(b't') || cur.eat(b' ') {
        time[0] = cur.digits(2)?;
        if !cur.eat(b':') {
            return None;
        }
        time[1] = cur.digits(2)?;
        if cur.eat(b':') {
            time[2] = cur.digits(2)?;
            if cur.eat(b'.') || cur.eat(b',') {
                let (value, digits) = cur.digit_run()?;
                time[3] = fraction_millis(value, digits);
            }
        }
        if !valid_time(time) {
            return None;
        }
    }

    let offset_minutes = match cur.peek() {
        None => None,
        Some(b'Z' | b'z') => {
            cur.pos += 1;
            Some(0)
        }
        Some(sign @ (b'+' | b'-')) => {
            cur.pos += 1;
            let hours = cur.digits(2)?;
            cur.eat(b':');
            let minutes = if cur.done() { 0 } else { cur.digits(2)? };
            if hours > 23 || minutes > 59 {
                return None;
            }
            let total = hours * 60 + minutes;
            Some(if sign == b'-' { -total } else { total })
        }
        Some(_) => return None,
    };
    if !cur.done() {
        return None;
    }

    let wall = wall_millis(year, month, day, time)?;
    Some(match offset_minutes {
        Some(offset) => Stamp::Exact(wall.checked_sub(offset * MS_PER_MINUTE)?),
        None => Stamp::Wall(wall),
    })
}

// ============================================================================
// Loose grammar
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Number { value: i64, digits: usize },
    Word(String),
    Sign(i64),
    Colon,
    Slash,
    Dot,
}

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

const WEEKDAYS: [&str; 7] = ["sunday", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday"];

fn lex(text: &str) -> Option<Vec<Lexeme>> {
    let mut out = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() || c == ',' => {
                chars.next();
            }
            '(' => {
                let mut depth = 0usize;
                for c in chars.by_ref() {
                    match c {
                        '(' => depth += 1,
                        ')' => depth -= 1,
                        _ => {}
                    }
                    if depth == 0 {
                        break;
                    }
                }
            }
            '0'..='9' => {
                let (mut value, mut digits) = (0i64, 0usize);
                while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                    if digits == 18 {
                        return None;
                    }
                    value = value * 10 + d as i64;
                    digits += 1;
                    chars.next();
                }
                out.push(Lexeme::Number { value, digits });
            }
            c if c.is_alphabetic() => {
                let mut word = String::new();
                while let Some(&c) = chars.peek().filter(|c| c.is_alphabetic() || **c == '.') {
                    if c != '.' {
                        word.extend(c.to_lowercase());
                    }
                    chars.next();
                }
                out.push(Lexeme::Word(word));
            }
            '+' | '-' => {
                out.push(Lexeme::Sign(if c == '-' { -1 } else { 1 }));
                chars.next();
            }
            ':' => {
                out.push(Lexeme::Colon);
                chars.next();
            }
            '/' => {
                out.push(Lexeme::Slash);
                chars.next();
            }
            '.' => {
                out.push(Lexeme::Dot);
                chars.next();
            }
            _ => return None,
        }
    }
    Some(out)
}

fn name_index(names: &[&str], word: &str) -> Option<usize> {
    if word.len() < 3 {
        return None;
    }
    names.iter().position(|name| name.starts_with(word))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Num {
    value: i64,
    digits: usize,
}

impl Num {
    fn year_like(self) -> bool {
        self.digits >= 3 || self.value > 31
    }

    /// Two-digit years fall in 1950-2049
    fn as_year(self) -> i64 {
        match (self.digits, self.value) {
            (d, v) if d <= 2 && v < 50 => 2000 + v,
            (d, v) if d <= 2 => 1900 + v,
            (_, v) => v,
        }
    }
}

#[derive(Default)]
struct Pieces {
    group: Option<Vec<Num>>,
    loose: Vec<Num>,
    month_name: Option<i64>,
    time: Option<[i64; 4]>,
    meridiem: Option<bool>,
    utc: bool,
    offset_minutes: Option<i64>,
}

fn parse_loose(text: &str) -> Option<Stamp> {
    let lexemes = lex(text)?;
    let mut pieces = Pieces::default();
    let mut i = 0;

    let number_at = |i: usize| match lexemes.get(i) {
        Some(Lexeme::Number { value, digits }) => Some(Num { value: *value, digits: *digits }),
        _ => None,
    };

    while i < lexemes.len() {
        match &lexemes[i] {
            Lexeme::Number { value, digits } => {
                let first = Num { value: *value, digits: *digits };
                i += 1;
                match lexemes.get(i) {
                    Some(Lexeme::Colon) => {
                        if pieces.time.is_some() {
                            return None;
                        }
                        let mut parts = vec![first.value];
                        while parts.len() < 4 && lexemes.get(i) == Some(&Lexeme::Colon) {
                            parts.push(number_at(i + 1)?.value);
                            i += 2;
                        }
                        let mut time = [0; 4];
                        time[..parts.len()].copy_from_slice(&parts);
                        if lexemes.get(i) == Some(&Lexeme::Dot) && parts.len() == 3 {
                            let fraction = number_at(i + 1)?;
                            time[3] = fraction_millis(fraction.value, fraction.digits);
                            i += 2;
                        }
                        pieces.time = Some(time);
                    }
                    Some(Lexeme::Slash) => {
                        if pieces.group.is_some() {
                            return None;
                        }
                        let mut group = vec![first];
                        while group.len() < 3 && lexemes.get(i) == Some(&Lexeme::Slash) {
                            group.push(number_at(i + 1)?);
                            i += 2;
                        }
                        pieces.group = Some(group);
                    }
                    _ => pieces.loose.push(first),
                }
            }
            Lexeme::Word(word) => {
                i += 1;
                if let Some(month) = name_index(&MONTHS, word) {
                    if pieces.month_name.replace(month as i64 + 1).is_some() {
                        return None;
                    }
                } else if name_index(&WEEKDAYS, word).is_some() || word == "t" {
                    // ignored
                } else if matches!(word.as_str(), "gmt" | "utc" | "ut" | "z") {
                    pieces.utc = true;
                } else if word == "am" || word == "pm" {
                    pieces.meridiem = Some(word == "pm");
                } else {
                    return None;
                }
            }
            Lexeme::Sign(sign) => {
                if pieces.offset_minutes.is_some() || !(pieces.utc || pieces.time.is_some()) {
                    return None;
                }
                let n = number_at(i + 1)?;
                i += 2;
                let (hours, minutes) = match n.digits {
                    1 | 2 if lexemes.get(i) == Some(&Lexeme::Colon) => {
                        let minutes = number_at(i + 1)?.value;
                        i += 2;
                        (n.value, minutes)
                    }
                    1 | 2 => (n.value, 0),
                    4 => (n.value / 100, n.value % 100),
                    _ => return None,
                };
                if hours > 23 || minutes > 59 {
                    return None;
                }
                pieces.offset_minutes = Some(sign * (hours * 60 + minutes));
            }
            Lexeme::Colon | Lexeme::Slash | Lexeme::Dot => return None,
        }
    }

    let (year, month, day) = resolve_date(&pieces)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let mut time = pieces.time.unwrap_or_default();
    if let Some(pm) = pieces.meridiem {
        if !(1..=12).contains(&time[0]) {
            return None;
        }
        time[0] = match (pm, time[0]) {
            (false, 12) => 0,
            (true, h) if h < 12 => h + 12,
            (_, h) => h,
        };
    }
    if !valid_time(time) {
        return None;
    }

    let wall = wall_millis(year, month, day, time)?;
    Some(match (pieces.offset_minutes, pieces.utc) {
        (Some(offset), _) => Stamp::Exact(wall.checked_sub(offset * MS_PER_MINUTE)?),
        (None, true) => Stamp::Exact(wall),
        (None, false) => Stamp::Wall(wall),
    })
}

fn resolve_date(pieces: &Pieces) -> Option<(i64, i64, i64)> {
    match (&pieces.group, pieces.month_name, pieces.loose.as_slice()) {
        // Y/M/D or M/D/Y
        (Some(group), None, []) if group.len() == 3 => {
            if group[0].year_like() {
                Some((group[0].value, group[1].value, group[2].value))
            } else {
                Some((group[2].as_year(), group[0].value, group[1].value))
            }
        }
        // Y/M
        (Some(group), None, []) if group.len() == 2 && group[0].year_like() => {
            Some((group[0].value, group[1].value, 1))
        }
        // M/D Y
        (Some(group), None, [year]) if group.len() == 2 && year.year_like() => {
            Some((year.value, group[0].value, group[1].value))
        }
        // Mon YYYY
        (None, Some(month), [year]) if year.year_like() => Some((year.value, month, 1)),
        // DD Mon YYYY, Mon DD YYYY, Mon YYYY DD
        (None, Some(month), [a, b]) => {
            if b.year_like() {
                Some((b.value, month, a.value))
            } else if a.year_like() {
                Some((a.value, month, b.value))
            } else {
                Some((b.as_year(), month, a.value))
            }
        }
        // YYYY
        (None, None, [year]) if year.year_like() => Some((year.value, 1, 1)),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dateio_core::calendar::{days_from_civil, MS_PER_DAY, MS_PER_HOUR, MS_PER_SECOND};

    fn wall(y: i64, m: u32, d: u32, h: i64, i: i64, s: i64, ms: i64) -> i64 {
        days_from_civil(y, m, d) * MS_PER_DAY + h * MS_PER_HOUR + i * MS_PER_MINUTE + s * MS_PER_SECOND + ms
    }

    fn utc(text: &str) -> i64 {
        parse(text, Zone::UTC).unwrap().as_millis()
    }

    #[test]
    fn test_dash_dates_are_wall_clock() {
        let east = Zone::Fixed(8 * 3600);
        let at = parse("2018-04-24", east).unwrap().as_millis();
        assert_eq!(at, wall(2018, 4, 24, 0, 0, 0, 0) - 8 * MS_PER_HOUR);
        assert_eq!(utc("2018-4-1"), wall(2018, 4, 1, 0, 0, 0, 0));
        assert_eq!(utc("2013/01/08"), wall(2013, 1, 8, 0, 0, 0, 0));
    }

    #[test]
    fn test_loose_shapes() {
        assert_eq!(utc("2018-04-24 11:12"), wall(2018, 4, 24, 11, 12, 0, 0));
        assert_eq!(utc("2018-05-02 11:12:13"), wall(2018, 5, 2, 11, 12, 13, 0));
        assert_eq!(utc("2018-05-02 11:12:13.998"), wall(2018, 5, 2, 11, 12, 13, 998));
        assert_eq!(utc("2018-4-1 1:1:1:023"), wall(2018, 4, 1, 1, 1, 1, 23));
        assert_eq!(utc("2019-10-5 6:5:4:321"), wall(2019, 10, 5, 6, 5, 4, 321));
        assert_eq!(utc("2018-01"), wall(2018, 1, 1, 0, 0, 0, 0));
        assert_eq!(utc("2018"), wall(2018, 1, 1, 0, 0, 0, 0));
        assert_eq!(utc("01/08/2013"), wall(2013, 1, 8, 0, 0, 0, 0));
        assert_eq!(utc("2018-05-02 1:10 PM"), wall(2018, 5, 2, 13, 10, 0, 0));
        assert_eq!(utc("2018-05-02 12:10 am"), wall(2018, 5, 2, 0, 10, 0, 0));
        assert_eq!(utc("  2018-05-02  "), wall(2018, 5, 2, 0, 0, 0, 0));
    }

    #[test]
    fn test_iso() {
        assert_eq!(utc("2018-04-04T16:00:00.000Z"), wall(2018, 4, 4, 16, 0, 0, 0));
        assert_eq!(utc("2019-10-11T10:13:19.123Z"), 1_570_788_799_123);
        let east = Zone::Fixed(3600);
        // the zone designator wins over the configured zone
        assert_eq!(parse("2018-05-02T11:12:13.432Z", east).unwrap().as_millis(), wall(2018, 5, 2, 11, 12, 13, 432));
        assert_eq!(utc("2018-05-02T11:12:13+08:00"), wall(2018, 5, 2, 3, 12, 13, 0));
        assert_eq!(utc("2018-05-02T11:12:13-0530"), wall(2018, 5, 2, 16, 42, 13, 0));
        // no designator: wall clock in the configured zone
        assert_eq!(parse("2018-05-02T11:12", east).unwrap().as_millis(), wall(2018, 5, 2, 10, 12, 0, 0));
        assert_eq!(utc("+002018-05-02T00:00Z"), wall(2018, 5, 2, 0, 0, 0, 0));
    }

    #[test]
    fn test_signed_years() {
        assert_eq!(utc("-044-03-15 00:00:00"), wall(-44, 3, 15, 0, 0, 0, 0));
        assert_eq!(utc("-000044-03-15"), wall(-44, 3, 15, 0, 0, 0, 0));
        assert_eq!(utc("-005-12-31 23:59:59"), wall(-5, 12, 31, 23, 59, 59, 0));
        assert_eq!(utc("+2018-05-02 11:12"), wall(2018, 5, 2, 11, 12, 0, 0));
        assert!(parse("-44-03-15", Zone::UTC).is_err());
        assert!(parse("-0000044-03-15", Zone::UTC).is_err());
    }

    #[test]
    fn test_rfc2822_and_native_strings() {
        let expected = utc("2019-02-11T08:46:50.000Z");
        assert_eq!(utc("Mon, 11 Feb 2019 16:46:50 GMT+8"), expected);

        let expected = utc("2019-02-11T10:01:37.000Z");
        assert_eq!(utc("Mon Feb 11 2019 11:01:37 GMT+0100 (Mitteleuropäische Normalzeit)"), expected);
        assert_eq!(utc("Mon Feb 11 2019 05:01:37 GMT-0500"), expected);
        assert_eq!(utc("11 February 2019 10:01:37 UTC"), expected);
        assert_eq!(utc("2019-02-11 18:01:37 +0800"), expected);
    }

    #[test]
    fn test_rejects() {
        for text in [
            "",
            "   ",
            "otherString",
            "2018-13-01",
            "2018-02-32",
            "2018-05-02 25:00",
            "2018-05-02 10:61",
            "Feb 11",
            "11/12",
            "2018-05-02 +0800",
            "2018/05/02/03",
            "::",
            "2018-05-02T11:12:13+2",
            "日一二",
        ] {
            assert_eq!(parse(text, Zone::UTC), Err(Error::parse(text, "string")), "{:?}", text);
        }
    }

    #[test]
    fn test_day_overflow_rolls_forward() {
        // like a native date, Feb 30 in the loose grammar is Mar 2
        assert_eq!(utc("2019/02/30"), wall(2019, 3, 2, 0, 0, 0, 0));
    }

    #[test]
    fn test_keeps_dashes() {
        assert!(keeps_dashes("2018-05-02T11:12"));
        assert!(keeps_dashes("Mon Feb 11 2019 11:01:37 GMT-0500"));
        assert!(keeps_dashes("2018-05-02Z"));
        assert!(keeps_dashes("-044-03-15 00:00:00"));
        assert!(!keeps_dashes("-"));
        assert!(!keeps_dashes("2018-05-02"));
        assert!(!keeps_dashes("2018-05-02 11:12"));
        assert!(!keeps_dashes("2018-05-0T"));
    }
}
