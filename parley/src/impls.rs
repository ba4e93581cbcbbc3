/*!
Implementations of the [`value`][crate::value] traits for various primitive,
standard library, and `chrono` types
 */

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::model::{DateTimeKind, ScalarKind};
use crate::util::{strip_float_grouping, try_parse_bool};
use crate::value::{ParsedValue, Value, ValueError};

macro_rules! from_str {
    ($(
        $type:ident $(:: $path:ident)* => $kind:expr;
    )*) => {
        $(
            impl ParsedValue for $type $(:: $path)* {
                const KIND: ScalarKind = $kind;
            }
        )*
    };
}

macro_rules! integers {
    ($($type:ident)*) => {
        from_str! {
            $(
                $type => ScalarKind::Integer {
                    bits: $type::BITS as u8,
                    signed: $type::MIN != 0,
                };
            )*
        }
    };
}

// `FromStr` for the integers is base-10, culture-free, and rejects
// overflow, which is exactly what we want.
integers! {
    u8 u16 u32 u64 u128 usize
    i8 i16 i32 i64 i128 isize
}

from_str! {
    String => ScalarKind::Text;
    std::path::PathBuf => ScalarKind::Text;
    std::ffi::OsString => ScalarKind::Text;

    core::net::Ipv4Addr => ScalarKind::Parsable;
    core::net::Ipv6Addr => ScalarKind::Parsable;
    core::net::IpAddr => ScalarKind::Parsable;
    core::net::SocketAddrV4 => ScalarKind::Parsable;
    core::net::SocketAddrV6 => ScalarKind::Parsable;
    core::net::SocketAddr => ScalarKind::Parsable;

    NaiveDate => ScalarKind::DateTime(DateTimeKind::Date);
    NaiveTime => ScalarKind::DateTime(DateTimeKind::Time);
}

impl Value for bool {
    const KIND: ScalarKind = ScalarKind::Flag;

    /// Flags are normally set by presence; this is only reached when a
    /// nullable flag is followed by an explicit `true` or `false`.
    #[inline]
    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        try_parse_bool(arg).ok_or_else(|| ValueError::should_be(arg, &["true", "false"]))
    }
}

impl Value for char {
    const KIND: ScalarKind = ScalarKind::Char;

    #[inline]
    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        let mut chars = arg.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ValueError::parse(arg, "expected exactly one character")),
        }
    }
}

macro_rules! floats {
    ($($type:ident)*) => {
        $(
            impl Value for $type {
                const KIND: ScalarKind = ScalarKind::Float {
                    bits: (::core::mem::size_of::<$type>() * 8) as u8,
                };

                fn from_arg(arg: &str) -> Result<Self, ValueError> {
                    strip_float_grouping(arg)
                        .ok_or_else(|| ValueError::parse(arg, "misplaced digit group separator"))?
                        .parse()
                        .map_err(|err| ValueError::parse(arg, err))
                }
            }
        )*
    };
}

floats! { f32 f64 }

impl Value for NaiveDateTime {
    const KIND: ScalarKind = ScalarKind::DateTime(DateTimeKind::DateTime);

    /// Accepts `2024-01-31T10:30:00`, the same with a space instead of `T`,
    /// or a bare date (which means midnight).
    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        arg.parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(arg, "%Y-%m-%d %H:%M:%S%.f"))
            .or_else(|err| {
                arg.parse::<NaiveDate>()
                    .map(|date| date.and_time(NaiveTime::MIN))
                    .map_err(|_| err)
            })
            .map_err(|err| ValueError::parse(arg, err))
    }
}

impl Value for DateTime<FixedOffset> {
    const KIND: ScalarKind = ScalarKind::DateTime(DateTimeKind::DateTimeOffset);

    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        arg.parse().map_err(|err| ValueError::parse(arg, err))
    }
}

impl Value for DateTime<Utc> {
    const KIND: ScalarKind = ScalarKind::DateTime(DateTimeKind::DateTimeUtc);

    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        arg.parse().map_err(|err| ValueError::parse(arg, err))
    }
}

/// Durations use the `[-][d.]hh:mm[:ss[.fffffff]]` form
impl Value for TimeDelta {
    const KIND: ScalarKind = ScalarKind::DateTime(DateTimeKind::Duration);

    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        parse_duration(arg).ok_or_else(|| {
            ValueError::parse(arg, "expected a duration like `1.02:30:00` or `00:00:05.5`")
        })
    }
}

fn parse_duration(arg: &str) -> Option<TimeDelta> {
    let (negative, body) = match arg.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, arg),
    };

    let mut pieces = body.split(':');
    let head = pieces.next()?;
    let minutes = pieces.next()?;
    let seconds = pieces.next();

    if pieces.next().is_some() {
        return None;
    }

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (parse_digits(days)?, parse_digits(hours)?),
        None => (0, parse_digits(head)?),
    };

    let minutes = parse_digits(minutes)?;

    let (seconds, nanos) = match seconds {
        None => (0, 0),
        Some(seconds) => match seconds.split_once('.') {
            None => (parse_digits(seconds)?, 0),
            Some((seconds, fraction)) => (parse_digits(seconds)?, parse_fraction(fraction)?),
        },
    };

    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    let delta = TimeDelta::try_days(days)?
        .checked_add(&TimeDelta::try_hours(hours)?)?
        .checked_add(&TimeDelta::try_minutes(minutes)?)?
        .checked_add(&TimeDelta::try_seconds(seconds)?)?
        .checked_add(&TimeDelta::nanoseconds(nanos))?;

    Some(match negative {
        true => -delta,
        false => delta,
    })
}

fn parse_digits(digits: &str) -> Option<i64> {
    match !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        true => digits.parse().ok(),
        false => None,
    }
}

/// Parse the digits after a decimal point as nanoseconds. Precision past
/// nanoseconds is dropped.
fn parse_fraction(fraction: &str) -> Option<i64> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(
        fraction
            .bytes()
            .chain(core::iter::repeat(b'0'))
            .take(9)
            .fold(0, |nanos, digit| nanos * 10 + i64::from(digit - b'0')),
    )
}
