use aoc::graph::{self, LinkGraph};
use aoc::grid::{self, Pos};
use aoc::interval::CO;
use aoc::intervalset::IntervalSet;
use aoc::num;
use aoc::parse::{self, Parser};
use aoc::split::Regexp;

#[test]
fn extended_gcd() {
    let (g, x, y) = num::gcd(30i64, 12);
    assert_eq!((g, x, y), (6, 1, -2));
    assert_eq!(30 * x + 12 * y, g);
}

#[test]
fn chinese_remainder() {
    assert_eq!(num::chinese_remainder(2, 3, 3, 5), Some((8, 15)));
    assert_eq!(num::chinese_remainder(1, 4, 2, 6), None);
}

struct Tag {
    name: String,
    n: i64,
}

impl From<(String, i64)> for Tag {
    fn from((name, n): (String, i64)) -> Self {
        Tag { name, n }
    }
}

#[test]
fn structure_from_pattern() {
    let p = parse::structure::<Tag, _, _>(
        Regexp::new(r"(\w+)-(\d+)").unwrap(),
        (parse::string::<String>(), parse::signed::<i64>()),
    );
    let tag = p.parse("foo-42").unwrap();
    assert_eq!((tag.name.as_str(), tag.n), ("foo", 42));
    assert!(p.parse("foo+42").is_err());
}

#[test]
fn interval_set_merges() {
    let mut s = IntervalSet::new();
    s.add(CO::new(1, 3));
    s.add(CO::new(5, 7));
    s.add(CO::new(3, 5));
    assert_eq!(s.pieces(), &[CO::new(1i64, 7)]);
    assert!(s.continuous());
}

#[test]
fn grid_detour() {
    let g = grid::read_str("S....\n####.\nE....", Ok).unwrap();
    let open = g.graph(|&c| c != '#');
    let path = graph::shortest_path(&open, Pos::new(0, 0), |&p| p == Pos::new(2, 0)).unwrap();
    assert_eq!(path.len(), 10);
    assert_eq!(path.last().map(|s| s.to()), Some(Pos::new(2, 0)));
}

#[test]
fn diamond_flow() {
    let mut g = LinkGraph::new();
    g.link("s", "a", 3);
    g.link("s", "b", 2);
    g.link("a", "t", 2);
    g.link("b", "t", 3);
    g.link("a", "b", 1);
    let (s, t) = (g.id(&"s").unwrap(), g.id(&"t").unwrap());
    assert_eq!(graph::maximum_flow(&g, s, t).value, 5);
    assert_eq!(graph::minimum_cut(&g, s, t).value, 5);
}
