//! Reference-time datetime layouts.
//!
//! A layout spells out how the reference time `Mon Jan 2 15:04:05 MST 2006`
//! (`01/02 03:04:05PM '06 -0700`) would be written. Each recognised piece of
//! that reference time becomes a `chrono` parse item; everything else is
//! matched literally.
//!
//! | Layout | Meaning |
//! |---|---|
//! | `2006` / `06` | year / two-digit year |
//! | `01` / `1` / `Jan` / `January` | month |
//! | `02` / `2` / `_2` | day of month |
//! | `002` / `__2` | day of year |
//! | `Mon` / `Monday` | weekday name |
//! | `15` / `03` / `3` | hour (24h / 12h) |
//! | `04` / `4` | minute |
//! | `05` / `5` | second |
//! | `.000` / `.999` | fractional seconds |
//! | `PM` / `pm` | AM/PM marker |
//! | `MST` | zone abbreviation |
//! | `-07:00:00` / `-070000` / `-0700` / `-07:00` / `-07` | numeric zone offset |
//! | `Z0700` / `Z07:00` / `Z07` | `Z` or numeric zone offset |
//!
//! Zero-padded pieces (`2006`, `01`, `02`, `002`, `03`, `04`, `05`, `06`)
//! take exactly that many digits; unpadded ones take one or two.

use chrono::format::{self, Fixed, Item, Numeric, Pad, ParseErrorKind, Parsed};

/// A layout translated into `chrono` parse items.
#[derive(Debug, Clone)]
pub struct DatetimeLayout<'a> {
    steps: Vec<Step<'a>>,
}

/// One parse item, plus the exact digit count it must consume when the
/// layout piece is zero-padded.
#[derive(Debug, Clone)]
struct Step<'a> {
    item: Item<'a>,
    digits: Option<usize>,
}

impl<'a> DatetimeLayout<'a> {
    pub fn new(layout: &'a str) -> Self {
        Self {
            steps: translate(layout),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &Item<'a>> {
        self.steps.iter().map(|step| &step.item)
    }

    /// Whether `input` is a valid time written in this layout.
    ///
    /// The whole input must be consumed, zero-padded fields must have their
    /// full width, every field must be in range, and when the layout names
    /// a full date that date must exist.
    pub fn matches(&self, input: &str) -> bool {
        let mut parsed = Parsed::new();
        let mut rest = input;
        for step in &self.steps {
            let Ok(remainder) =
                format::parse_and_remainder(&mut parsed, rest, std::iter::once(&step.item))
            else {
                return false;
            };
            if let Some(width) = step.digits {
                let taken = &rest[..rest.len() - remainder.len()];
                if taken.len() != width || !taken.bytes().all(|b| b.is_ascii_digit()) {
                    return false;
                }
            }
            rest = remainder;
        }
        if !rest.is_empty() {
            return false;
        }

        match parsed.to_naive_date() {
            Ok(_) => true,
            // layout without a complete date, e.g. "15:04"
            Err(e) => e.kind() == ParseErrorKind::NotEnough,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    LongMonthName,
    ShortMonthName,
    LongWeekday,
    ShortWeekday,
    ZoneName,
    ZeroMonth,
    Month,
    ZeroDay,
    Day,
    SpaceDay,
    ZeroOrdinal,
    SpaceOrdinal,
    Hour24,
    ZeroHour12,
    Hour12,
    ZeroMinute,
    Minute,
    ZeroSecond,
    Second,
    Year,
    YearMod100,
    UpperAmPm,
    LowerAmPm,
    Offset { colon: bool, seconds: bool, zulu: bool },
    Fraction,
}

impl Piece {
    fn item(self) -> Item<'static> {
        use Piece::*;
        match self {
            LongMonthName => Item::Fixed(Fixed::LongMonthName),
            ShortMonthName => Item::Fixed(Fixed::ShortMonthName),
            LongWeekday => Item::Fixed(Fixed::LongWeekdayName),
            ShortWeekday => Item::Fixed(Fixed::ShortWeekdayName),
            ZoneName => Item::Fixed(Fixed::TimezoneName),
            ZeroMonth => Item::Numeric(Numeric::Month, Pad::Zero),
            Month => Item::Numeric(Numeric::Month, Pad::None),
            ZeroDay => Item::Numeric(Numeric::Day, Pad::Zero),
            Day => Item::Numeric(Numeric::Day, Pad::None),
            SpaceDay => Item::Numeric(Numeric::Day, Pad::Space),
            ZeroOrdinal => Item::Numeric(Numeric::Ordinal, Pad::Zero),
            SpaceOrdinal => Item::Numeric(Numeric::Ordinal, Pad::Space),
            Hour24 => Item::Numeric(Numeric::Hour, Pad::Zero),
            ZeroHour12 => Item::Numeric(Numeric::Hour12, Pad::Zero),
            Hour12 => Item::Numeric(Numeric::Hour12, Pad::None),
            ZeroMinute => Item::Numeric(Numeric::Minute, Pad::Zero),
            Minute => Item::Numeric(Numeric::Minute, Pad::None),
            ZeroSecond => Item::Numeric(Numeric::Second, Pad::Zero),
            Second => Item::Numeric(Numeric::Second, Pad::None),
            Year => Item::Numeric(Numeric::Year, Pad::Zero),
            YearMod100 => Item::Numeric(Numeric::YearMod100, Pad::Zero),
            UpperAmPm => Item::Fixed(Fixed::UpperAmPm),
            LowerAmPm => Item::Fixed(Fixed::LowerAmPm),
            Offset { zulu: true, colon: true, .. } => Item::Fixed(Fixed::TimezoneOffsetColonZ),
            Offset { zulu: true, .. } => Item::Fixed(Fixed::TimezoneOffsetZ),
            Offset { seconds: true, .. } => Item::Fixed(Fixed::TimezoneOffsetDoubleColon),
            Offset { colon: true, .. } => Item::Fixed(Fixed::TimezoneOffsetColon),
            Offset { .. } => Item::Fixed(Fixed::TimezoneOffset),
            Fraction => Item::Fixed(Fixed::Nanosecond),
        }
    }

    /// Exact digit count for zero-padded numeric pieces
    fn digits(self) -> Option<usize> {
        use Piece::*;
        match self {
            Year => Some(4),
            ZeroOrdinal => Some(3),
            ZeroMonth | ZeroDay | ZeroHour12 | ZeroMinute | ZeroSecond | YearMod100 => Some(2),
            _ => None,
        }
    }

    fn is_second(self) -> bool {
        matches!(self, Piece::Second | Piece::ZeroSecond)
    }
}

fn translate(layout: &str) -> Vec<Step<'_>> {
    let mut items = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < layout.len() {
        let Some((len, piece)) = next_piece(&layout[i..]) else {
            i += layout[i..].chars().next().map_or(1, char::len_utf8);
            continue;
        };

        push_literal(&mut items, &layout[literal_start..i]);
        items.push(Step {
            item: piece.item(),
            digits: piece.digits(),
        });
        i += len;
        literal_start = i;

        // Seconds accept a fraction even when the layout does not spell one out
        if piece.is_second() && !matches!(next_piece(&layout[i..]), Some((_, Piece::Fraction))) {
            items.push(Step {
                item: Item::Fixed(Fixed::Nanosecond),
                digits: None,
            });
        }
    }

    push_literal(&mut items, &layout[literal_start..]);
    items
}

/// Recognise a reference-time piece at the start of `s`.
fn next_piece(s: &str) -> Option<(usize, Piece)> {
    use Piece::*;
    let bytes = s.as_bytes();
    let starts = |prefix: &str| s.starts_with(prefix);

    let piece = match bytes.first()? {
        b'J' if starts("January") => (7, LongMonthName),
        b'J' if starts("Jan") && !lowercase_at(s, 3) => (3, ShortMonthName),
        b'M' if starts("Monday") => (6, LongWeekday),
        b'M' if starts("Mon") && !lowercase_at(s, 3) => (3, ShortWeekday),
        b'M' if starts("MST") => (3, ZoneName),
        b'0' if starts("002") => (3, ZeroOrdinal),
        b'0' => match bytes.get(1)? {
            b'1' => (2, ZeroMonth),
            b'2' => (2, ZeroDay),
            b'3' => (2, ZeroHour12),
            b'4' => (2, ZeroMinute),
            b'5' => (2, ZeroSecond),
            b'6' => (2, YearMod100),
            _ => return None,
        },
        b'1' if starts("15") => (2, Hour24),
        b'1' => (1, Month),
        b'2' if starts("2006") => (4, Year),
        b'2' => (1, Day),
        b'_' if starts("__2") => (3, SpaceOrdinal),
        // "_2006" is a literal underscore followed by a year
        b'_' if starts("_2") && !starts("_2006") => (2, SpaceDay),
        b'3' => (1, Hour12),
        b'4' => (1, Minute),
        b'5' => (1, Second),
        b'P' if starts("PM") => (2, UpperAmPm),
        b'p' if starts("pm") => (2, LowerAmPm),
        b'-' | b'Z' => return offset_piece(s),
        b'.' | b',' => return fraction_piece(bytes),
        _ => return None,
    };
    Some(piece)
}

fn offset_piece(s: &str) -> Option<(usize, Piece)> {
    let zulu = s.starts_with('Z');
    let body = &s[1..];
    let (len, colon, seconds) = if body.starts_with("07:00:00") {
        (8, true, true)
    } else if body.starts_with("070000") {
        (6, false, true)
    } else if body.starts_with("07:00") {
        (5, true, false)
    } else if body.starts_with("0700") {
        (4, false, false)
    } else if body.starts_with("07") {
        (2, false, false)
    } else {
        return None;
    };
    // chrono has no `Z`-or-offset form carrying seconds
    if zulu && seconds {
        return None;
    }
    Some((1 + len, Piece::Offset { colon, seconds, zulu }))
}

/// `.000` or `.999` (any run length), not followed by another digit.
fn fraction_piece(bytes: &[u8]) -> Option<(usize, Piece)> {
    let digit = *bytes.get(1)?;
    if digit != b'0' && digit != b'9' {
        return None;
    }
    let run = bytes[1..].iter().take_while(|&&b| b == digit).count();
    if bytes.get(1 + run).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    Some((1 + run, Piece::Fraction))
}

fn lowercase_at(s: &str, index: usize) -> bool {
    s.as_bytes().get(index).is_some_and(u8::is_ascii_lowercase)
}

/// Push literal text, turning whitespace runs into flexible spaces.
fn push_literal<'a>(items: &mut Vec<Step<'a>>, text: &'a str) {
    let mut start = 0;
    let mut in_space = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() != in_space {
            push_run(items, &text[start..i], in_space);
            start = i;
            in_space = c.is_whitespace();
        }
    }
    push_run(items, &text[start..], in_space);
}

fn push_run<'a>(items: &mut Vec<Step<'a>>, run: &'a str, space: bool) {
    if run.is_empty() {
        return;
    }
    let item = if space {
        Item::Space(run)
    } else {
        Item::Literal(run)
    };
    items.push(Step { item, digits: None });
}
