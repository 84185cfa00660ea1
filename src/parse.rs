//! Typed parser combinators.
//!
//! A [`Parser`] turns a `&str` into a value or a [`ParseError`] naming the
//! offending input. Any `Fn(&str) -> Result<T, ParseError>` is a parser, so
//! ad-hoc parsers are plain closures. Compound inputs are cut into pieces by a
//! [`Splitter`] and each piece handed to an element parser.
//!
//! ```
//! use aoc::parse::{self, Parser};
//! use aoc::split::Regexp;
//!
//! struct Tag {
//!     name: String,
//!     n: i64,
//! }
//!
//! impl From<(String, i64)> for Tag {
//!     fn from((name, n): (String, i64)) -> Self {
//!         Tag { name, n }
//!     }
//! }
//!
//! let p = parse::structure::<Tag, _, _>(
//!     Regexp::new(r"(\w+)-(\d+)").unwrap(),
//!     (parse::string::<String>(), parse::signed::<i64>()),
//! );
//! let tag = p.parse("foo-42").unwrap();
//! assert_eq!((tag.name.as_str(), tag.n), ("foo", 42));
//! ```

use crate::error::ParseError;
use crate::split::{self, Splitter};
use num_traits::{PrimInt, Signed, Unsigned};
use rustc_hash::FxHashMap;
use std::any::type_name;
use std::hash::Hash;
use std::str::FromStr;

pub trait Parser {
    type Output;

    fn parse(&self, s: &str) -> Result<Self::Output, ParseError>;

    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { p: self, f }
    }

    /// Like [`Parser::map`], for conversions that can reject the value.
    fn try_map<U, F>(self, f: F) -> TryMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Result<U, ParseError>,
    {
        TryMap { p: self, f }
    }

    fn boxed<'a>(self) -> Box<dyn Parser<Output = Self::Output> + 'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<T, F> Parser for F
where
    F: Fn(&str) -> Result<T, ParseError>,
{
    type Output = T;

    fn parse(&self, s: &str) -> Result<T, ParseError> {
        self(s)
    }
}

#[derive(Clone, Copy)]
pub struct Map<P, F> {
    p: P,
    f: F,
}

impl<P: Parser, U, F: Fn(P::Output) -> U> Parser for Map<P, F> {
    type Output = U;

    fn parse(&self, s: &str) -> Result<U, ParseError> {
        self.p.parse(s).map(&self.f)
    }
}

#[derive(Clone, Copy)]
pub struct TryMap<P, F> {
    p: P,
    f: F,
}

impl<P: Parser, U, F: Fn(P::Output) -> Result<U, ParseError>> Parser for TryMap<P, F> {
    type Output = U;

    fn parse(&self, s: &str) -> Result<U, ParseError> {
        self.p.parse(s).and_then(&self.f)
    }
}

/// Decimal integer with an optional sign; fails on overflow.
pub fn signed<T: PrimInt + Signed + FromStr>() -> impl Parser<Output = T> + Copy {
    |s: &str| {
        s.parse::<T>()
            .map_err(|_| ParseError::mismatch(format!("a signed integer ({})", type_name::<T>()), s))
    }
}

pub fn unsigned<T: PrimInt + Unsigned + FromStr>() -> impl Parser<Output = T> + Copy {
    |s: &str| {
        s.parse::<T>()
            .map_err(|_| ParseError::mismatch(format!("an unsigned integer ({})", type_name::<T>()), s))
    }
}

/// The input itself, converted into a string-like type.
pub fn string<T: for<'a> From<&'a str>>() -> impl Parser<Output = T> + Copy {
    |s: &str| Ok(T::from(s))
}

/// Exactly one codepoint.
pub fn rune() -> impl Parser<Output = char> + Copy {
    |s: &str| {
        let mut cs = s.chars();
        match (cs.next(), cs.next()) {
            (Some(c), None) => Ok(c),
            (None, _) => Err(ParseError::Empty {
                expected: "a single character".to_owned(),
            }),
            _ => Err(ParseError::mismatch("a single character", s)),
        }
    }
}

/// Index of the option equal to the input.
pub fn enumeration<'o>(options: &'o [&'o str]) -> impl Parser<Output = usize> + Copy + 'o {
    move |s: &str| {
        options
            .iter()
            .position(|&o| o == s)
            .ok_or_else(|| ParseError::mismatch(format!("one of {:?}", options), s))
    }
}

pub fn prefix<'a, P: Parser + 'a>(pre: &'a str, p: P) -> impl Parser<Output = P::Output> + 'a {
    move |s: &str| match s.strip_prefix(pre) {
        Some(rest) => p.parse(rest),
        None => Err(ParseError::mismatch(format!("prefix {:?}", pre), s)),
    }
}

pub fn trim_space<P: Parser>(p: P) -> impl Parser<Output = P::Output> {
    move |s: &str| p.parse(s.trim())
}

/// `p`, or `q` if `p` fails. The error is `q`'s.
pub fn either<T, P, Q>(p: P, q: Q) -> impl Parser<Output = T>
where
    P: Parser<Output = T>,
    Q: Parser<Output = T>,
{
    move |s: &str| p.parse(s).or_else(|_| q.parse(s))
}

/// The first of `ps` that accepts the input.
pub fn first_of<'a, T: 'a>(ps: Vec<Box<dyn Parser<Output = T> + 'a>>) -> impl Parser<Output = T> + 'a {
    move |s: &str| {
        ps.iter()
            .find_map(|p| p.parse(s).ok())
            .ok_or_else(|| ParseError::mismatch(format!("one of {} alternatives", ps.len()), s))
    }
}

pub fn slice<S: Splitter, P: Parser>(splitter: S, p: P) -> impl Parser<Output = Vec<P::Output>> {
    move |s: &str| -> Result<Vec<P::Output>, ParseError> {
        splitter.split(s)?.into_iter().map(|piece| p.parse(piece)).collect()
    }
}

/// Exactly `N` pieces.
pub fn array<const N: usize, S: Splitter, P: Parser>(
    splitter: S,
    p: P,
) -> impl Parser<Output = [P::Output; N]> {
    move |s: &str| -> Result<[P::Output; N], ParseError> {
        let pieces = splitter.split(s)?;
        if pieces.len() != N {
            return Err(ParseError::count(N, pieces.len(), s));
        }
        let parsed = pieces
            .into_iter()
            .map(|piece| p.parse(piece))
            .collect::<Result<Vec<_>, _>>()?;
        parsed
            .try_into()
            .map_err(|v: Vec<_>| ParseError::count(N, v.len(), s))
    }
}

pub fn lines<P: Parser>(p: P) -> impl Parser<Output = Vec<P::Output>> {
    slice(split::Lines, p)
}

pub fn blocks<P: Parser>(p: P) -> impl Parser<Output = Vec<P::Output>> {
    slice(split::Blocks, p)
}

pub fn fields<P: Parser>(p: P) -> impl Parser<Output = Vec<P::Output>> {
    slice(split::Fields, p)
}

/// Entries cut by `split_kv`, each cut into exactly a key and a value by
/// `cut_kv`. Repeated keys are an error.
pub fn map<S, C, KP, VP>(split_kv: S, cut_kv: C, kp: KP, vp: VP) -> impl Parser<Output = FxHashMap<KP::Output, VP::Output>>
where
    S: Splitter,
    C: Splitter,
    KP: Parser,
    KP::Output: Eq + Hash,
    VP: Parser,
{
    move |s: &str| -> Result<FxHashMap<KP::Output, VP::Output>, ParseError> {
        let mut m = FxHashMap::default();
        for entry in split_kv.split(s)? {
            let kv = cut_kv.split(entry)?;
            let [k, v] = kv[..] else {
                return Err(ParseError::count(2, kv.len(), entry));
            };
            if m.insert(kp.parse(k)?, vp.parse(v)?).is_some() {
                return Err(ParseError::DuplicateKey { key: k.to_owned() });
            }
        }
        Ok(m)
    }
}

/// A tuple of parsers applied position-wise to a list of pieces.
pub trait Fields {
    type Output;
    const COUNT: usize;

    /// `pieces` has exactly `COUNT` elements.
    fn parse_fields(&self, pieces: &[&str]) -> Result<Self::Output, ParseError>;
}

macro_rules! fields_tuple {
    ($n:literal; $($p:ident $i:tt),+) => {
        impl<$($p: Parser),+> Fields for ($($p,)+) {
            type Output = ($($p::Output,)+);
            const COUNT: usize = $n;

            fn parse_fields(&self, pieces: &[&str]) -> Result<Self::Output, ParseError> {
                Ok(($(self.$i.parse(pieces[$i])?,)+))
            }
        }
    };
}

fields_tuple!(1; P0 0);
fields_tuple!(2; P0 0, P1 1);
fields_tuple!(3; P0 0, P1 1, P2 2);
fields_tuple!(4; P0 0, P1 1, P2 2, P3 3);
fields_tuple!(5; P0 0, P1 1, P2 2, P3 3, P4 4);
fields_tuple!(6; P0 0, P1 1, P2 2, P3 3, P4 4, P5 5);
fields_tuple!(7; P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6);
fields_tuple!(8; P0 0, P1 1, P2 2, P3 3, P4 4, P5 5, P6 6, P7 7);

/// Splits the input into as many pieces as there are field parsers, parses
/// them in order and builds `S` from the resulting tuple.
pub fn structure<S, Sp, F>(splitter: Sp, fields: F) -> impl Parser<Output = S>
where
    Sp: Splitter,
    F: Fields,
    S: From<F::Output>,
{
    move |s: &str| -> Result<S, ParseError> {
        let pieces = splitter.split(s)?;
        if pieces.len() != F::COUNT {
            return Err(ParseError::count(F::COUNT, pieces.len(), s));
        }
        fields.parse_fields(&pieces).map(S::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::{Fields as Ws, Lines, On, Regexp};

    #[test]
    fn integers() {
        assert_eq!(signed::<i32>().parse("-17"), Ok(-17));
        assert_eq!(signed::<i8>().parse("+5"), Ok(5));
        assert!(signed::<i8>().parse("128").is_err());
        assert!(unsigned::<u16>().parse("-1").is_err());
        assert_eq!(unsigned::<u64>().parse("18446744073709551615"), Ok(u64::MAX));
        let err = signed::<i64>().parse("4x2").unwrap_err();
        assert_eq!(err.to_string(), "expected a signed integer (i64), found \"4x2\"");
    }

    #[test]
    fn leaves() {
        assert_eq!(rune().parse("é"), Ok('é'));
        assert!(rune().parse("ab").is_err());
        assert_eq!(
            rune().parse(""),
            Err(ParseError::Empty {
                expected: "a single character".to_owned()
            })
        );
        let colours = ["red", "green", "blue"];
        assert_eq!(enumeration(&colours).parse("blue"), Ok(2));
        assert!(enumeration(&colours).parse("Blue").is_err());
        assert_eq!(prefix("Game ", unsigned::<u32>()).parse("Game 12"), Ok(12));
        assert!(prefix("Game ", unsigned::<u32>()).parse("game 12").is_err());
        assert_eq!(trim_space(signed::<i32>()).parse("  3 "), Ok(3));
        assert_eq!(string::<String>().parse("x"), Ok("x".to_owned()));
    }

    #[test]
    fn alternatives() {
        let num_or_old = either(signed::<i64>(), |s: &str| {
            (s == "old").then_some(-1i64).ok_or_else(|| ParseError::mismatch("old", s))
        });
        assert_eq!(num_or_old.parse("old"), Ok(-1));
        assert_eq!(num_or_old.parse("7"), Ok(7));
        assert!(num_or_old.parse("new").is_err());

        let p = first_of(vec![
            prefix("x=", signed::<i64>()).boxed(),
            prefix("y=", signed::<i64>()).map(|y| y * 100).boxed(),
        ]);
        assert_eq!(p.parse("y=3"), Ok(300));
        assert!(p.parse("z=3").is_err());
    }

    #[test]
    fn containers() {
        assert_eq!(fields(signed::<i32>()).parse(" 1  2 -3"), Ok(vec![1, 2, -3]));
        assert_eq!(lines(fields(unsigned::<u8>())).parse("1 2\n3"), Ok(vec![vec![1, 2], vec![3]]));
        assert_eq!(array::<3, _, _>(On(","), signed::<i32>()).parse("4,5,6"), Ok([4, 5, 6]));
        let err = array::<3, _, _>(On(","), signed::<i32>()).parse("4,5").unwrap_err();
        assert_eq!(err, ParseError::count(3, 2, "4,5"));
        let totals = blocks(lines(unsigned::<u32>()).map(|v| v.iter().sum::<u32>()));
        assert_eq!(totals.parse("1\n2\n\n3\n\n4\n5"), Ok(vec![3, 3, 9]));
    }

    #[test]
    fn maps_reject_duplicates() {
        let p = map(Lines, On(": "), string::<String>(), fields(unsigned::<u32>()));
        let m = p.parse("a: 1 2\nb: 3").unwrap();
        assert_eq!(m["a"], vec![1, 2]);
        assert_eq!(m["b"], vec![3]);
        assert_eq!(
            p.parse("a: 1\na: 2").unwrap_err(),
            ParseError::DuplicateKey { key: "a".into() }
        );
        assert!(matches!(p.parse("a 1"), Err(ParseError::Count { expected: 2, found: 1, .. })));
    }

    #[derive(Debug, PartialEq)]
    struct Move {
        count: usize,
        from: usize,
        to: usize,
    }

    impl From<(usize, usize, usize)> for Move {
        fn from((count, from, to): (usize, usize, usize)) -> Self {
            Move { count, from, to }
        }
    }

    #[test]
    fn structure_from_regex_and_fields() {
        let by_regex = structure::<Move, _, _>(
            Regexp::new(r"move (\d+) from (\d+) to (\d+)").unwrap(),
            (unsigned::<usize>(), unsigned::<usize>(), unsigned::<usize>()),
        );
        assert_eq!(by_regex.parse("move 3 from 1 to 2"), Ok(Move { count: 3, from: 1, to: 2 }));

        let by_fields = structure::<(String, i32), _, _>(Ws, (string::<String>(), signed::<i32>()));
        assert_eq!(by_fields.parse("a 1"), Ok(("a".to_owned(), 1)));
        assert_eq!(
            by_fields.parse("a 1 2").unwrap_err(),
            ParseError::count(2, 3, "a 1 2")
        );
        assert!(by_fields.parse("a b").is_err());
    }
}
