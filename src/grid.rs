//! Dense row-major 2-D grids addressed by [`Pos`].
//!
//! Rows grow downwards and columns to the right, so [`Dir::Up`] is `(-1, 0)`.

use crate::error::{ParseError, Result};
use crate::graph::{Graph, Undirected, Weighted};
use arrayvec::ArrayVec;
use std::fmt;
use std::io::BufRead;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};
use tracing::debug;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pos {
    pub row: i64,
    pub col: i64,
}

impl Pos {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Manhattan length.
    pub fn len(self) -> i64 {
        self.row.abs() + self.col.abs()
    }

    pub fn manhattan(self, other: Pos) -> i64 {
        (self - other).len()
    }

    pub fn neigh4(self) -> [Pos; 4] {
        Dir::ALL.map(|d| d.step(self))
    }

    pub fn neigh8(self) -> [Pos; 8] {
        [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
            (1, 0),
            (1, -1),
            (0, -1),
        ]
        .map(|(dr, dc)| self + Pos::new(dr, dc))
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i64, i64)> for Pos {
    fn from((row, col): (i64, i64)) -> Self {
        Self { row, col }
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        Pos::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        Pos::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Neg for Pos {
    type Output = Pos;

    fn neg(self) -> Pos {
        Pos::new(-self.row, -self.col)
    }
}

impl Mul<i64> for Pos {
    type Output = Pos;

    fn mul(self, k: i64) -> Pos {
        Pos::new(self.row * k, self.col * k)
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, rhs: Pos) {
        *self = *self + rhs;
    }
}

impl SubAssign for Pos {
    fn sub_assign(&mut self, rhs: Pos) {
        *self = *self - rhs;
    }
}

impl Add<Dir> for Pos {
    type Output = Pos;

    fn add(self, d: Dir) -> Pos {
        d.step(self)
    }
}

impl AddAssign<Dir> for Pos {
    fn add_assign(&mut self, d: Dir) {
        *self = d.step(*self);
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    /// Clockwise from `Up`.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    pub fn directions() -> impl DoubleEndedIterator<Item = Dir> + ExactSizeIterator {
        Self::ALL.into_iter()
    }

    pub fn offset(self) -> Pos {
        match self {
            Dir::Up => Pos::new(-1, 0),
            Dir::Right => Pos::new(0, 1),
            Dir::Down => Pos::new(1, 0),
            Dir::Left => Pos::new(0, -1),
        }
    }

    pub fn step(self, p: Pos) -> Pos {
        p + self.offset()
    }

    pub fn rotate_right(self) -> Dir {
        Self::ALL[(self as usize + 1) % 4]
    }

    pub fn rotate_left(self) -> Dir {
        Self::ALL[(self as usize + 3) % 4]
    }

    pub fn reverse(self) -> Dir {
        Self::ALL[(self as usize + 2) % 4]
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Dir::Up | Dir::Down)
    }

    /// Arrows `^>v<`, letters `UDLR` and compass points `NESW`.
    pub fn from_char(c: char) -> Option<Dir> {
        match c {
            '^' | 'U' | 'N' => Some(Dir::Up),
            '>' | 'R' | 'E' => Some(Dir::Right),
            'v' | 'D' | 'S' => Some(Dir::Down),
            '<' | 'L' | 'W' => Some(Dir::Left),
            _ => None,
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Dir::Up => '^',
            Dir::Right => '>',
            Dir::Down => 'v',
            Dir::Left => '<',
        }
    }
}

/// Closed-open rectangle: `min` is inside, `max` is one past the last row and
/// column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Rect {
    pub min: Pos,
    pub max: Pos,
}

impl Rect {
    pub fn new(min: Pos, max: Pos) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.row >= self.max.row || self.min.col >= self.max.col
    }

    pub fn contains(&self, p: Pos) -> bool {
        (self.min.row..self.max.row).contains(&p.row) && (self.min.col..self.max.col).contains(&p.col)
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            min: Pos::new(self.min.row.max(other.min.row), self.min.col.max(other.min.col)),
            max: Pos::new(self.max.row.min(other.max.row), self.max.col.min(other.max.col)),
        }
    }

    /// Interior positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Pos> {
        let Rect { min, max } = *self;
        (min.row..max.row).flat_map(move |row| (min.col..max.col).map(move |col| Pos::new(row, col)))
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    w: usize,
    h: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(Pos) -> T) -> Self {
        let cells = (0..w * h)
            .map(|i| f(Pos::new((i / w) as i64, (i % w) as i64)))
            .collect();
        Self { w, h, cells }
    }

    /// # Panics
    ///
    /// Panics if `cells.len() != w * h`.
    pub fn from_cells(w: usize, h: usize, cells: Vec<T>) -> Self {
        assert_eq!(cells.len(), w * h, "grid buffer does not match {}x{}", w, h);
        Self { w, h, cells }
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn h(&self) -> usize {
        self.h
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(Pos::new(0, 0), Pos::new(self.h as i64, self.w as i64))
    }

    pub fn valid(&self, p: Pos) -> bool {
        (0..self.h as i64).contains(&p.row) && (0..self.w as i64).contains(&p.col)
    }

    /// Flat index of `p`, if it is on the grid.
    pub fn index(&self, p: Pos) -> Option<usize> {
        self.valid(p).then(|| p.row as usize * self.w + p.col as usize)
    }

    /// Position of flat index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below `w * h`, so always on an empty grid.
    pub fn pos(&self, i: usize) -> Pos {
        assert!(i < self.cells.len(), "index {} outside {}x{} grid", i, self.w, self.h);
        Pos::new((i / self.w) as i64, (i % self.w) as i64)
    }

    pub fn get(&self, p: Pos) -> Option<&T> {
        self.index(p).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, p: Pos) -> Option<&mut T> {
        self.index(p).map(|i| &mut self.cells[i])
    }

    /// # Panics
    ///
    /// Panics if `p` is off the grid.
    pub fn at(&self, p: Pos) -> &T {
        &self[p]
    }

    pub fn set(&mut self, p: Pos, v: T) {
        self[p] = v;
    }

    /// The on-grid orthogonal neighbours of `p`.
    pub fn neigh4(&self, p: Pos) -> ArrayVec<Pos, 4> {
        p.neigh4().into_iter().filter(|&q| self.valid(q)).collect()
    }

    pub fn neigh8(&self, p: Pos) -> ArrayVec<Pos, 8> {
        p.neigh8().into_iter().filter(|&q| self.valid(q)).collect()
    }

    /// Every cell with its position, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, &T)> + '_ {
        self.cells.iter().enumerate().map(move |(i, v)| (self.pos(i), v))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (Pos, &mut T)> + '_ {
        let w = self.w;
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(i, v)| (Pos::new((i / w) as i64, (i % w) as i64), v))
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        self.bounds().iter()
    }

    /// Cells inside `r`, clipped to the grid, row-major.
    pub fn rect(&self, r: Rect) -> impl Iterator<Item = (Pos, &T)> + '_ {
        r.intersect(&self.bounds()).iter().map(move |p| (p, &self[p]))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.w.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn map<U>(&self, mut f: impl FnMut(Pos, &T) -> U) -> Grid<U> {
        Grid {
            w: self.w,
            h: self.h,
            cells: self.cells().map(|(p, v)| f(p, v)).collect(),
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new(w: usize, h: usize, fill: T) -> Self {
        Self {
            w,
            h,
            cells: vec![fill; w * h],
        }
    }
}

impl<T: PartialEq> Grid<T> {
    /// Positions holding `v`, row-major.
    pub fn find<'a>(&'a self, v: &'a T) -> impl Iterator<Item = Pos> + 'a {
        self.cells().filter(move |(_, c)| *c == v).map(|(p, _)| p)
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, p: Pos) -> &T {
        let i = self
            .index(p)
            .unwrap_or_else(|| panic!("{:?} outside {}x{} grid", p, self.w, self.h));
        &self.cells[i]
    }
}

impl<T> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, p: Pos) -> &mut T {
        let i = self
            .index(p)
            .unwrap_or_else(|| panic!("{:?} outside {}x{} grid", p, self.w, self.h));
        &mut self.cells[i]
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.w, self.h)?;
        for row in self.rows() {
            writeln!(f, "{:?}", row)?;
        }
        Ok(())
    }
}

/// Reads a rectangular block of codepoints, one line per row, passing every
/// codepoint through `cell`. Trailing blank lines and `\r` line ends are
/// ignored.
pub fn read<T>(
    reader: impl BufRead,
    mut cell: impl FnMut(char) -> Result<T, ParseError>,
) -> Result<Grid<T>> {
    let mut lines = Vec::new();
    for (row, line) in reader.split(b'\n').enumerate() {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        let line = String::from_utf8(line).map_err(|_| ParseError::Utf8 { line: row })?;
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.trim_end().is_empty()) {
        lines.pop();
    }

    let w = lines.first().map_or(0, |l| l.chars().count());
    let mut cells = Vec::with_capacity(w * lines.len());
    for (row, line) in lines.iter().enumerate() {
        let before = cells.len();
        for c in line.chars() {
            cells.push(cell(c)?);
        }
        let found = cells.len() - before;
        if found != w {
            return Err(ParseError::Ragged {
                row,
                expected: w,
                found,
            }
            .into());
        }
    }
    debug!(w, h = lines.len(), "read grid");
    Ok(Grid::from_cells(w, lines.len(), cells))
}

pub fn read_str<T>(s: &str, cell: impl FnMut(char) -> Result<T, ParseError>) -> Result<Grid<T>> {
    read(s.as_bytes(), cell)
}

/// Cell parser mapping each codepoint of `runes` to its index.
pub fn cell_enum(runes: &str) -> impl Fn(char) -> Result<usize, ParseError> + '_ {
    move |c| {
        runes
            .chars()
            .position(|r| r == c)
            .ok_or_else(|| ParseError::mismatch(format!("one of {:?}", runes), c.encode_utf8(&mut [0; 4])))
    }
}

/// One unit move out of `from`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Step {
    pub from: Pos,
    pub dir: Dir,
}

impl Step {
    pub fn to(self) -> Pos {
        self.dir.step(self.from)
    }
}

/// A grid seen as a graph: unit steps into orthogonal neighbours whose cell
/// satisfies `open`.
pub struct GridGraph<'g, T, F> {
    grid: &'g Grid<T>,
    open: F,
}

impl<T> Grid<T> {
    pub fn graph<F: Fn(&T) -> bool>(&self, open: F) -> GridGraph<'_, T, F> {
        GridGraph { grid: self, open }
    }
}

impl<T, F: Fn(&T) -> bool> Graph for GridGraph<'_, T, F> {
    type Node = Pos;
    type Edge = Step;

    fn edges(&self, n: &Pos) -> impl Iterator<Item = Step> + '_ {
        let from = *n;
        Dir::ALL
            .into_iter()
            .map(move |dir| Step { from, dir })
            .filter(move |s| self.grid.get(s.to()).is_some_and(|c| (self.open)(c)))
    }

    fn from(&self, e: &Step) -> Pos {
        e.from
    }

    fn to(&self, e: &Step) -> Pos {
        e.to()
    }
}

impl<T, F: Fn(&T) -> bool> Weighted for GridGraph<'_, T, F> {
    type Weight = i64;

    fn weight(&self, _: &Step) -> i64 {
        1
    }
}

impl<T, F: Fn(&T) -> bool> Undirected for GridGraph<'_, T, F> {
    fn reverse(&self, e: &Step) -> Step {
        Step {
            from: e.to(),
            dir: e.dir.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    const MAZE: &str = "#.##\n#S.#\n##E#\n";

    #[test]
    fn read_and_index() {
        let g = read_str(MAZE, Ok).unwrap();
        assert_eq!((g.w(), g.h()), (4, 3));
        assert_eq!(g[Pos::new(1, 1)], 'S');
        assert_eq!(g.find(&'E').collect::<Vec<_>>(), vec![Pos::new(2, 2)]);
        assert_eq!(g.get(Pos::new(3, 0)), None);
        assert_eq!(g.to_string(), MAZE);
    }

    #[test]
    fn windows_line_endings_and_trailing_blank_lines() {
        let g = read_str("ab\r\ncd\r\n\r\n", Ok).unwrap();
        assert_eq!(g.rows().map(|r| r.iter().collect::<String>()).collect::<Vec<_>>(), vec!["ab", "cd"]);
    }

    #[test]
    fn invalid_utf8_names_the_line() {
        let err = read(&b"ab\n\xffb\n"[..], Ok).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Utf8 { line: 1 })));
    }

    #[test]
    fn ragged_input_is_rejected() {
        let err = read_str("abc\nab\n", Ok).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::Ragged { row: 1, expected: 3, found: 2 })
        ));
    }

    #[test]
    fn enum_cells() {
        let g = read_str(".#S\n#..", cell_enum(".#S")).unwrap();
        assert_eq!(g.as_slice(), &[0, 1, 2, 1, 0, 0]);
        let err = read_str(".x", cell_enum(".#")).unwrap_err();
        assert_eq!(err.to_string(), "parse error: expected one of \".#\", found \"x\"");
    }

    #[test]
    fn flat_index_round_trip() {
        let g = Grid::new(7, 5, 0u8);
        for i in 0..g.w() * g.h() {
            let p = g.pos(i);
            assert_eq!(p.row as usize * g.w() + p.col as usize, i);
            assert_eq!(g.index(p), Some(i));
        }
    }

    #[test]
    #[should_panic(expected = "index 0 outside 0x3 grid")]
    fn pos_on_an_empty_grid() {
        Grid::new(0, 3, 'x').pos(0);
    }

    #[test]
    fn neighbourhoods_stay_on_grid() {
        let g = Grid::new(3, 3, ());
        assert_eq!(g.neigh4(Pos::new(0, 0)).as_slice(), &[Pos::new(0, 1), Pos::new(1, 0)]);
        assert_eq!(g.neigh4(Pos::new(1, 1)).len(), 4);
        assert_eq!(g.neigh8(Pos::new(1, 1)).len(), 8);
        assert_eq!(g.neigh8(Pos::new(2, 2)).len(), 3);
    }

    #[test]
    fn rect_is_clipped() {
        let g = Grid::from_fn(4, 4, |p| p.row * 10 + p.col);
        let r = Rect::new(Pos::new(-1, 2), Pos::new(2, 9));
        let got: Vec<_> = g.rect(r).map(|(_, &v)| v).collect();
        assert_eq!(got, vec![2, 3, 12, 13]);
        assert!(Rect::new(Pos::new(0, 0), Pos::new(0, 5)).is_empty());
        assert!(r.contains(Pos::new(-1, 8)));
        assert!(!r.contains(Pos::new(2, 2)));
    }

    #[test]
    fn direction_algebra() {
        for d in Dir::directions() {
            assert_eq!(d.rotate_right().rotate_left(), d);
            assert_eq!(d.reverse().reverse(), d);
            assert_eq!(d.rotate_right().rotate_right(), d.reverse());
            assert_eq!(d.offset() + d.reverse().offset(), Pos::new(0, 0));
            assert_eq!(Dir::from_char(d.arrow()), Some(d));
        }
        assert_eq!(Dir::Up.rotate_right(), Dir::Right);
        assert_eq!(Dir::Up.rotate_left(), Dir::Left);
        assert_eq!(Pos::new(2, 2) + Dir::Left, Pos::new(2, 1));
        assert_eq!(Pos::new(3, -4).len(), 7);
        assert_eq!(Pos::new(1, 1).manhattan(Pos::new(-2, 3)), 5);
    }

    #[test]
    fn map_and_mutate() {
        let mut g = read_str("12\n34", |c| c.to_digit(10).ok_or_else(|| ParseError::mismatch("digit", "?"))).unwrap();
        g.set(Pos::new(0, 0), 9);
        for (_, v) in g.cells_mut() {
            *v *= 2;
        }
        let doubled = g.map(|p, &v| v as i64 + p.col);
        assert_eq!(doubled.as_slice(), &[18, 5, 6, 9]);
        let cloned = g.clone();
        assert_eq!(cloned, g);
    }

    #[test]
    fn grid_as_graph() {
        let g = read_str("S..#\n.#..\n...E", Ok).unwrap();
        let start = g.find(&'S').next().unwrap();
        let end = g.find(&'E').next().unwrap();
        let graph = g.graph(|&c| c != '#');
        let path = crate::graph::shortest_path(&graph, start, |&p| p == end).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.last().map(|s| s.to()), Some(end));
        let (cost, _) = crate::graph::astar(&graph, start, |&p| p == end, |&p| p.manhattan(end)).unwrap();
        assert_eq!(cost, 5);
        assert_eq!(graph.edges(&Pos::new(0, 2)).count(), 2);
        let step = Step { from: Pos::new(0, 0), dir: Dir::Right };
        assert_eq!(graph.reverse(&step), Step { from: Pos::new(0, 1), dir: Dir::Left });
    }

    fn walled() -> impl Strategy<Value = Grid<bool>> {
        (1usize..7, 1usize..7).prop_flat_map(|(w, h)| {
            prop::collection::vec(prop::bool::weighted(0.7), w * h).prop_map(move |open| Grid::from_cells(w, h, open))
        })
    }

    /// Relaxes every edge until no distance shrinks.
    fn relaxed_distances(g: &Grid<bool>, start: Pos) -> Grid<Option<usize>> {
        let mut dist = g.map(|p, _| (p == start).then_some(0));
        let mut changed = true;
        while changed {
            changed = false;
            for p in g.positions() {
                let Some(d) = dist[p] else { continue };
                for q in g.neigh4(p) {
                    if g[q] && dist[q].map_or(true, |e| e > d + 1) {
                        dist[q] = Some(d + 1);
                        changed = true;
                    }
                }
            }
        }
        dist
    }

    proptest! {
        #[test]
        fn bfs_paths_are_shortest(g in walled()) {
            let mut g = g;
            let start = Pos::new(0, 0);
            g[start] = true;
            let dist = relaxed_distances(&g, start);
            let open = g.graph(|&free| free);
            for goal in g.positions() {
                let path = crate::graph::shortest_path(&open, start, |&p| p == goal);
                prop_assert_eq!(path.as_ref().map(Vec::len), dist[goal]);
                if let Some(path) = path {
                    let mut at = start;
                    for s in &path {
                        prop_assert_eq!(s.from, at);
                        prop_assert!(g[s.to()]);
                        at = s.to();
                    }
                    prop_assert_eq!(at, goal);
                }
            }
        }
    }
}
