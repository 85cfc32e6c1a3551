//! Maven version ordering and version ranges.
//!
//! Mediation never compares versions; ordering is only used to flag
//! downgrades in conflict reports and to pick a concrete version for a
//! declared range.
//!
//! Ordering rules:
//! - segments are split on `.` and `-`
//! - numeric segments compare as numbers, trailing zeros are insignificant
//! - qualifiers: `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`
//! - unknown text qualifiers sort below a release and compare case-insensitively

use std::cmp::Ordering;
use std::fmt;

/// A version string with Maven comparison semantics.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Number(u64),
    Qualifier(Qualifier),
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let segments = version
            .split(['.', '-'])
            .filter(|token| !token.is_empty())
            .map(classify)
            .collect();
        Self {
            original: version.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn is_snapshot(&self) -> bool {
        self.original.ends_with("-SNAPSHOT")
    }
}

fn classify(token: &str) -> Segment {
    if let Ok(n) = token.parse::<u64>() {
        return Segment::Number(n);
    }
    match token.to_lowercase().as_str() {
        "alpha" | "a" => Segment::Qualifier(Qualifier::Alpha),
        "beta" | "b" => Segment::Qualifier(Qualifier::Beta),
        "milestone" | "m" => Segment::Qualifier(Qualifier::Milestone),
        "rc" | "cr" => Segment::Qualifier(Qualifier::Rc),
        "snapshot" => Segment::Qualifier(Qualifier::Snapshot),
        "ga" | "final" | "release" => Segment::Qualifier(Qualifier::Release),
        "sp" => Segment::Qualifier(Qualifier::Sp),
        _ => Segment::Text(token.to_string()),
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| match (self.segments.get(i), other.segments.get(i)) {
                (Some(a), Some(b)) => compare(a, b),
                (Some(a), None) => against_padding(a),
                (None, Some(b)) => against_padding(b).reverse(),
                (None, None) => Ordering::Equal,
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Compare a segment against the implicit padding of a shorter version.
fn against_padding(seg: &Segment) -> Ordering {
    match seg {
        Segment::Number(n) => n.cmp(&0),
        Segment::Qualifier(q) => q.cmp(&Qualifier::Release),
        Segment::Text(_) => Ordering::Less,
    }
}

fn compare(a: &Segment, b: &Segment) -> Ordering {
    use Segment::*;
    match (a, b) {
        (Number(a), Number(b)) => a.cmp(b),
        (Qualifier(a), Qualifier(b)) => a.cmp(b),
        (Text(a), Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Number(_), _) => Ordering::Greater,
        (_, Number(_)) => Ordering::Less,
        (Qualifier(q), Text(_)) => qualifier_vs_text(*q),
        (Text(_), Qualifier(q)) => qualifier_vs_text(*q).reverse(),
    }
}

fn qualifier_vs_text(q: Qualifier) -> Ordering {
    if q >= Qualifier::Release {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// A Maven version range: `[1.0,2.0)`, `[1.0,]`, `(,2.0)` or `[1.0]`.
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

#[derive(Debug, Clone)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

impl VersionRange {
    /// Parse a range expression. Returns `None` for plain versions.
    pub fn parse(spec: &str) -> Option<Self> {
        let s = spec.trim();
        if s.len() < 2 || !(s.starts_with('[') || s.starts_with('(')) {
            return None;
        }
        if !(s.ends_with(']') || s.ends_with(')')) {
            return None;
        }
        let lower_inclusive = s.starts_with('[');
        let upper_inclusive = s.ends_with(']');
        let inner = &s[1..s.len() - 1];

        let bound = |text: &str, inclusive: bool| {
            let text = text.trim();
            (!text.is_empty()).then(|| Bound {
                version: MavenVersion::parse(text),
                inclusive,
            })
        };

        match inner.split_once(',') {
            Some((lower, upper)) => Some(Self {
                lower: bound(lower, lower_inclusive),
                upper: bound(upper, upper_inclusive),
            }),
            None => {
                let exact = bound(inner, true)?;
                Some(Self {
                    lower: Some(exact.clone()),
                    upper: Some(exact),
                })
            }
        }
    }

    pub fn contains(&self, version: &MavenVersion) -> bool {
        let above_lower = self.lower.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Greater => true,
            Ordering::Equal => b.inclusive,
            Ordering::Less => false,
        });
        let below_upper = self.upper.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Less => true,
            Ordering::Equal => b.inclusive,
            Ordering::Greater => false,
        });
        above_lower && below_upper
    }

    /// The highest of `candidates` that lies inside the range.
    pub fn select_highest<'a, I>(&self, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .map(|c| (c, MavenVersion::parse(c)))
            .filter(|(_, v)| self.contains(v))
            .max_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(c, _)| c)
    }
}
