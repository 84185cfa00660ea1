use aoc::bits::Bits;
use aoc::error::{Error, ParseError, Result};
use aoc::graph::{self, Graph};
use aoc::grid::{self, Dir, Grid, Pos};
use aoc::parse::{self, Parser};
use aoc::parallel;
use aoc::set::Set;
use aoc::split::{self, Splitter};
use aoc::{misc, num};
use clap::Parser as _;
use itertools::{Itertools, MinMaxResult};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::io::{self, Read};
use std::iter::zip;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn day1(part: u8, input: &str) -> Result<String> {
    let pairs = parse::lines(parse::array::<2, _, _>(split::Fields, parse::signed::<i64>())).parse(input)?;
    let (mut lefts, mut rights): (Vec<i64>, Vec<i64>) = pairs.into_iter().map(|[l, r]| (l, r)).unzip();

    let total = if part == 1 {
        lefts.sort_unstable();
        rights.sort_unstable();
        zip(lefts, rights).map(|(left, right)| (left - right).abs()).sum::<i64>()
    } else {
        let counts = rights.into_iter().counts();
        lefts.iter().map(|left| left * counts.get(left).copied().unwrap_or(0) as i64).sum()
    };
    Ok(total.to_string())
}

fn is_safe(levels: &[i64]) -> bool {
    match levels.iter().tuple_windows().map(|(x, y)| y - x).minmax() {
        MinMaxResult::MinMax(min, max) => (min > -4 && max < 0) || (min > 0 && max < 4),
        MinMaxResult::OneElement(d) => (1..4).contains(&d.abs()),
        MinMaxResult::NoElements => true,
    }
}

fn day2(part: u8, input: &str) -> Result<String> {
    let reports = parse::lines(parse::fields(parse::signed::<i64>())).parse(input)?;
    let safe = reports.iter().filter(|levels| {
        is_safe(levels)
            || part > 1
                && (0..levels.len()).any(|skip| {
                    let mut dampened = levels.to_vec();
                    dampened.remove(skip);
                    is_safe(&dampened)
                })
    });
    Ok(safe.count().to_string())
}

const MUL: &str = r"mul\((\d+),(\d+)\)|do\(\)|don't\(\)";

fn day3(part: u8, input: &str) -> Result<String> {
    let re = Regex::new(MUL).map_err(|e| ParseError::Pattern {
        pattern: MUL.to_owned(),
        message: e.to_string(),
    })?;
    let number = parse::unsigned::<u64>();
    let mut enabled = true;
    let mut sum = 0;
    for m in re.captures_iter(input) {
        match &m[0] {
            "do()" => enabled = true,
            "don't()" => enabled = part == 1,
            _ if enabled => sum += number.parse(&m[1])? * number.parse(&m[2])?,
            _ => {}
        }
    }
    Ok(sum.to_string())
}

fn day4(part: u8, input: &str) -> Result<String> {
    let g = grid::read_str(input, Ok)?;
    let at = |p: Pos| g.get(p).copied();

    let found = if part == 1 {
        g.find(&'X')
            .map(|x| {
                Pos::new(0, 0)
                    .neigh8()
                    .into_iter()
                    .filter(|&d| "MAS".chars().zip(1..).all(|(c, k)| at(x + d * k) == Some(c)))
                    .count()
            })
            .sum::<usize>()
    } else {
        let crossed = |a: Pos, d: Pos| {
            matches!(
                (at(a + d), at(a - d)),
                (Some('M'), Some('S')) | (Some('S'), Some('M'))
            )
        };
        g.find(&'A')
            .filter(|&a| crossed(a, Pos::new(1, 1)) && crossed(a, Pos::new(1, -1)))
            .count()
    };
    Ok(found.to_string())
}

fn day5(part: u8, input: &str) -> Result<String> {
    let blocks = split::Blocks.split(input)?;
    let [rules, updates] = blocks[..] else {
        return Err(ParseError::count(2, blocks.len(), input).into());
    };
    let rules = parse::lines(parse::array::<2, _, _>(split::On("|"), parse::unsigned::<usize>())).parse(rules)?;
    let updates =
        parse::lines(parse::slice(split::On(","), parse::unsigned::<usize>())).parse(updates)?;

    if rules.iter().flatten().any(|&page| page >= 100) {
        return Err(Error::domain("page numbers must stay below 100"));
    }
    let before: Bits = rules.iter().map(|[x, y]| 100 * x + y).collect();
    let order = |x: &usize, y: &usize| {
        if before.contains(100 * x + y) {
            Ordering::Less
        } else if before.contains(100 * y + x) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    };

    let middles = updates.into_iter().filter_map(|mut pages| {
        let sorted = pages.windows(2).all(|w| order(&w[0], &w[1]) != Ordering::Greater);
        if part == 1 {
            sorted.then(|| pages[pages.len() / 2])
        } else if sorted {
            None
        } else {
            pages.sort_by(&order);
            Some(pages[pages.len() / 2])
        }
    });
    Ok(middles.sum::<usize>().to_string())
}

/// Cells the guard covers before leaving the map, or `None` if it ends up
/// walking in circles.
fn patrol(g: &Grid<char>, mut p: Pos, mut d: Dir, obstacle: Option<Pos>) -> Option<Bits> {
    let mut states = Bits::with_bound(4 * g.w() * g.h());
    let mut cells = Bits::with_bound(g.w() * g.h());
    while let Some(i) = g.index(p) {
        if !states.add(4 * i + d as usize) {
            return None;
        }
        cells.add(i);
        let next = d.step(p);
        if g.get(next) == Some(&'#') || Some(next) == obstacle {
            d = d.rotate_right();
        } else {
            p = next;
        }
    }
    Some(cells)
}

fn day6(part: u8, input: &str) -> Result<String> {
    let g = grid::read_str(input, Ok)?;
    let (start, dir) = g
        .cells()
        .find_map(|(p, &c)| Dir::from_char(c).map(|d| (p, d)))
        .ok_or_else(|| Error::domain("no guard on the map"))?;
    let visited = patrol(&g, start, dir, None).ok_or_else(|| Error::domain("the guard never leaves"))?;

    let count = if part == 1 {
        visited.len()
    } else {
        let candidates: Vec<Pos> = visited.all().map(|i| g.pos(i)).filter(|&p| p != start).collect();
        let loops = |p: Pos| usize::from(patrol(&g, start, dir, Some(p)).is_none());
        parallel::map_merge(candidates, loops, |a, b| a + b).unwrap_or(0)
    };
    Ok(count.to_string())
}

fn day7(part: u8, input: &str) -> Result<String> {
    let equations = parse::lines(parse::structure::<(u64, Vec<u64>), _, _>(
        split::SplitN(": ", 2),
        (parse::unsigned::<u64>(), parse::fields(parse::unsigned::<u64>())),
    ))
    .parse(input)?;

    let mut reachable = Vec::new();
    let mut next = Vec::new();
    let calibrated = equations.iter().filter_map(|(goal, terms)| {
        let (&first, rest) = terms.split_first()?;
        reachable.clear();
        reachable.push(first);
        for &t in rest {
            next.clear();
            for &r in &reachable {
                next.extend([r + t, r * t].into_iter().filter(|v| v <= goal));
                let joined = r * num::pow10(num::digits(t)) + t;
                if part > 1 && joined <= *goal {
                    next.push(joined);
                }
            }
            std::mem::swap(&mut reachable, &mut next);
        }
        reachable.contains(goal).then_some(*goal)
    });
    Ok(calibrated.sum::<u64>().to_string())
}

fn day8(part: u8, input: &str) -> Result<String> {
    let g = grid::read_str(input, Ok)?;
    let mut antennas: FxHashMap<char, Vec<Pos>> = FxHashMap::default();
    for (p, &c) in g.cells() {
        if c != '.' {
            antennas.entry(c).or_default().push(p);
        }
    }

    let mut antinodes = Set::new();
    for group in antennas.values() {
        for (&a, &b) in misc::pairs(group) {
            for (from, step) in [(a, a - b), (b, b - a)] {
                let mut p = if part == 1 { from + step } else { from };
                while g.valid(p) {
                    antinodes.add(p);
                    if part == 1 {
                        break;
                    }
                    p += step;
                }
            }
        }
    }
    Ok(antinodes.len().to_string())
}

fn day9(part: u8, input: &str) -> Result<String> {
    let sizes = parse::slice(split::Bytes, parse::unsigned::<usize>()).parse(input)?;
    let mut files = Vec::new();
    let mut gaps = Vec::new();
    let mut end = 0;
    for (i, &n) in sizes.iter().enumerate() {
        if i % 2 == 0 {
            files.push((end, n));
        } else {
            gaps.push((end, n));
        }
        end += n;
    }

    let checksum: usize = if part == 1 {
        let mut disk = vec![None; end];
        for (id, &(start, len)) in files.iter().enumerate() {
            disk[start..start + len].fill(Some(id));
        }
        let (mut l, mut r) = (0, disk.len());
        while l < r {
            if disk[l].is_some() {
                l += 1;
            } else if disk[r - 1].is_none() {
                r -= 1;
            } else {
                disk.swap(l, r - 1);
                l += 1;
                r -= 1;
            }
        }
        disk.iter()
            .enumerate()
            .filter_map(|(pos, id)| id.map(|id| pos * id))
            .sum()
    } else {
        for file in files.iter_mut().rev() {
            let (start, len) = *file;
            if let Some(gap) = gaps.iter_mut().take_while(|g| g.0 < start).find(|g| g.1 >= len) {
                file.0 = gap.0;
                gap.0 += len;
                gap.1 -= len;
            }
        }
        files
            .iter()
            .enumerate()
            .map(|(id, &(start, len))| id * (start..start + len).sum::<usize>())
            .sum()
    };
    Ok(checksum.to_string())
}

/// Uphill hiking steps: exactly one higher per step.
struct Trails<'g>(&'g Grid<u8>);

impl Graph for Trails<'_> {
    type Node = Pos;
    type Edge = (Pos, Pos);

    fn edges(&self, n: &Pos) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        let (from, up) = (*n, self.0[*n].checked_add(1));
        self.0
            .neigh4(from)
            .into_iter()
            .filter(move |&q| Some(self.0[q]) == up)
            .map(move |q| (from, q))
    }

    fn from(&self, e: &(Pos, Pos)) -> Pos {
        e.0
    }

    fn to(&self, e: &(Pos, Pos)) -> Pos {
        e.1
    }
}

fn height(c: char) -> Result<u8, ParseError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        '.' => Ok(u8::MAX),
        _ => Err(ParseError::mismatch("a height digit", c.encode_utf8(&mut [0; 4]))),
    }
}

fn day10(part: u8, input: &str) -> Result<String> {
    let g = grid::read_str(input, height)?;
    let trails = Trails(&g);

    let total = if part == 1 {
        g.find(&0)
            .map(|head| graph::walk_depth_first(&trails, head).filter(|&p| g[p] == 9).count())
            .sum::<usize>()
    } else {
        let mut paths = g.map(|_, &h| usize::from(h == 9));
        for h in (0..9).rev() {
            for p in g.find(&h) {
                paths[p] = trails.edges(&p).map(|(_, q)| paths[q]).sum::<usize>();
            }
        }
        g.find(&0).map(|head| paths[head]).sum()
    };
    Ok(total.to_string())
}

struct Machine {
    a: (i64, i64),
    b: (i64, i64),
    prize: (i64, i64),
}

impl From<(i64, i64, i64, i64, i64, i64)> for Machine {
    fn from((ax, ay, bx, by, px, py): (i64, i64, i64, i64, i64, i64)) -> Self {
        Machine {
            a: (ax, ay),
            b: (bx, by),
            prize: (px, py),
        }
    }
}

fn day13(part: u8, input: &str) -> Result<String> {
    let n = parse::signed::<i64>();
    let machine = parse::structure::<Machine, _, _>(
        split::Regexp::new(
            r"Button A: X\+(\d+), Y\+(\d+)\nButton B: X\+(\d+), Y\+(\d+)\nPrize: X=(\d+), Y=(\d+)",
        )?,
        (n, n, n, n, n, n),
    );
    let machines = parse::blocks(machine).parse(input)?;
    let shift = if part == 1 { 0 } else { 10_000_000_000_000 };

    let tokens = machines.iter().filter_map(|m| {
        let prize = (m.prize.0 + shift, m.prize.1 + shift);
        let (a, b) = num::cramer2((m.a.0, m.a.1), (m.b.0, m.b.1), prize)?;
        let in_reach = a >= 0 && b >= 0 && (part > 1 || (a <= 100 && b <= 100));
        in_reach.then_some(3 * a + b)
    });
    Ok(tokens.sum::<i64>().to_string())
}

fn ram_run(part: u8, input: &str, size: usize, fallen: usize) -> Result<String> {
    let bytes: Vec<Pos> = parse::lines(parse::array::<2, _, _>(split::On(","), parse::signed::<i64>()))
        .parse(input)?
        .into_iter()
        .map(|[x, y]| Pos::new(y, x))
        .collect();
    let exit = Pos::new(size as i64 - 1, size as i64 - 1);
    let steps = |n: usize| {
        let mut memory = Grid::new(size, size, true);
        for &p in bytes.iter().take(n) {
            if let Some(free) = memory.get_mut(p) {
                *free = false;
            }
        }
        graph::shortest_path(&memory.graph(|&free| free), Pos::new(0, 0), |&p| p == exit).map(|path| path.len())
    };

    if part == 1 {
        return steps(fallen)
            .map(|n| n.to_string())
            .ok_or_else(|| Error::domain("the exit is unreachable"));
    }
    // steps(lo) reaches the exit, steps(hi) does not.
    let (mut lo, mut hi) = (0, bytes.len());
    if steps(hi).is_some() {
        return Err(Error::domain("the exit is never cut off"));
    }
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if steps(mid).is_some() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    debug!(bytes = hi, "exit cut off");
    let p = bytes[hi - 1];
    Ok(format!("{},{}", p.col, p.row))
}

fn day18(part: u8, input: &str) -> Result<String> {
    ram_run(part, input, 71, 1024)
}

type Day = fn(u8, &str) -> Result<String>;

const DAYS: &[(usize, Day)] = &[
    (1, day1),
    (2, day2),
    (3, day3),
    (4, day4),
    (5, day5),
    (6, day6),
    (7, day7),
    (8, day8),
    (9, day9),
    (10, day10),
    (13, day13),
    (18, day18),
];

/// Solves one day of Advent of Code 2024, reading the puzzle input from
/// standard input.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Day of the puzzle
    day: usize,

    /// Part to solve; both parts when omitted
    #[arg(value_parser = clap::value_parser!(u8).range(1..=2))]
    part: Option<u8>,

    /// Read the input from a file instead of standard input
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    debug: bool,

    /// Print the elapsed time on standard error
    #[arg(long)]
    time: bool,
}

fn enable_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };
    Ok(raw.trim_end().replace("\r\n", "\n"))
}

fn run(args: &Args) -> Result<()> {
    let &(_, solve) = DAYS
        .iter()
        .find(|(day, _)| *day == args.day)
        .ok_or_else(|| Error::domain(format!("day {} is not solved", args.day)))?;
    let input = read_input(args.input.as_ref())?;
    debug!(day = args.day, bytes = input.len(), "input read");

    let time = Instant::now();
    let answers = match args.part {
        Some(part) => vec![solve(part, &input)?],
        None => vec![solve(1, &input)?, solve(2, &input)?],
    };
    for answer in answers {
        println!("{}", answer);
    }
    if args.time {
        eprintln!("{} seconds elapsed", time.elapsed().as_secs_f32());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    enable_tracing(args.debug);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
