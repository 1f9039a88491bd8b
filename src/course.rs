use std::fmt;
use std::io::Read;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{DecodingError, ReferenceDataError};

pub const HOLES_PER_ROUND: usize = 18;
pub const DEFAULT_COURSE_PAR: u16 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Course {
    Lake,
    Ocean,
}

impl Course {
    pub const ALL: [Course; 2] = [Course::Lake, Course::Ocean];

    pub fn label(self) -> &'static str {
        match self {
            Course::Lake => "Lake",
            Course::Ocean => "Ocean",
        }
    }

    /// The other course of the event. Every player sees each course once.
    pub fn complement(self) -> Course {
        match self {
            Course::Lake => Course::Ocean,
            Course::Ocean => Course::Lake,
        }
    }

    /// Case-insensitive substring match against the course names.
    pub fn find_in(token: &str) -> Option<Course> {
        let t = token.to_ascii_lowercase();
        let lake = t.contains("lake");
        let ocean = t.contains("ocean");
        match (lake, ocean) {
            (true, false) => Some(Course::Lake),
            (false, true) => Some(Course::Ocean),
            _ => None,
        }
    }

    /// Strict parse used for reference tables and the R1_COURSE column.
    pub fn from_label(raw: &str) -> Result<Course, DecodingError> {
        Course::find_in(raw.trim()).ok_or_else(|| DecodingError::UnknownCourse {
            raw: raw.to_string(),
        })
    }

    fn index(self) -> usize {
        match self {
            Course::Lake => 0,
            Course::Ocean => 1,
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Front => "Front",
            Side::Back => "Back",
        }
    }

    /// Hole numbers (1-based) of this nine.
    pub fn holes(self) -> std::ops::RangeInclusive<u8> {
        match self {
            Side::Front => 1..=9,
            Side::Back => 10..=18,
        }
    }

    /// Holes in the order they are played when a round starts on this side.
    pub fn playing_order(self) -> impl Iterator<Item = u8> {
        let (first, second) = match self {
            Side::Front => (1..=9, 10..=18),
            Side::Back => (10..=18, 1..=9),
        };
        first.chain(second)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseHole {
    pub course: Course,
    pub hole: u8,
    pub par: u8,
    pub yardage: u16,
}

/// The Olympic Club setup used for stroke play. Par 70 on both courses.
pub static OLYMPIC_CLUB: Lazy<Vec<CourseHole>> = Lazy::new(|| {
    const LAKE: [(u8, u16); 18] = [
        (4, 520),
        (4, 428),
        (3, 247),
        (4, 438),
        (4, 498),
        (4, 490),
        (4, 288),
        (3, 200),
        (4, 449),
        (4, 424),
        (4, 430),
        (4, 451),
        (3, 191),
        (4, 417),
        (3, 154),
        (5, 670),
        (5, 522),
        (4, 355),
    ];
    const OCEAN: [(u8, u16); 18] = [
        (4, 395),
        (4, 412),
        (4, 380),
        (3, 168),
        (5, 540),
        (4, 402),
        (3, 185),
        (4, 430),
        (4, 365),
        (4, 418),
        (3, 205),
        (4, 388),
        (5, 525),
        (4, 410),
        (3, 152),
        (4, 441),
        (4, 376),
        (4, 420),
    ];
    let mut out = Vec::with_capacity(HOLES_PER_ROUND * 2);
    for (course, table) in [(Course::Lake, &LAKE), (Course::Ocean, &OCEAN)] {
        for (idx, (par, yardage)) in table.iter().enumerate() {
            out.push(CourseHole {
                course,
                hole: (idx + 1) as u8,
                par: *par,
                yardage: *yardage,
            });
        }
    }
    out
});

/// Validated par/yardage lookup for both courses. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseReference {
    pars: [[u8; HOLES_PER_ROUND]; 2],
    yardages: [[u16; HOLES_PER_ROUND]; 2],
}

impl CourseReference {
    pub fn new(holes: &[CourseHole], par_total: u16) -> Result<Self, ReferenceDataError> {
        let mut pars = [[0u8; HOLES_PER_ROUND]; 2];
        let mut yardages = [[0u16; HOLES_PER_ROUND]; 2];

        for h in holes {
            if !(1..=HOLES_PER_ROUND as u8).contains(&h.hole) {
                return Err(ReferenceDataError::HoleOutOfRange {
                    course: h.course,
                    hole: h.hole,
                });
            }
            if !(3..=5).contains(&h.par) {
                return Err(ReferenceDataError::InvalidPar {
                    course: h.course,
                    hole: h.hole,
                    par: h.par,
                });
            }
            let slot = &mut pars[h.course.index()][usize::from(h.hole - 1)];
            if *slot != 0 {
                return Err(ReferenceDataError::DuplicateHole {
                    course: h.course,
                    hole: h.hole,
                });
            }
            *slot = h.par;
            yardages[h.course.index()][usize::from(h.hole - 1)] = h.yardage;
        }

        for course in Course::ALL {
            let row = &pars[course.index()];
            if let Some(idx) = row.iter().position(|p| *p == 0) {
                return Err(ReferenceDataError::MissingHole {
                    course,
                    hole: (idx + 1) as u8,
                });
            }
            let actual: u16 = row.iter().map(|p| u16::from(*p)).sum();
            if actual != par_total {
                return Err(ReferenceDataError::ParTotal {
                    course,
                    expected: par_total,
                    actual,
                });
            }
        }

        Ok(Self { pars, yardages })
    }

    pub fn bundled(par_total: u16) -> Result<Self, ReferenceDataError> {
        Self::new(&OLYMPIC_CLUB, par_total)
    }

    /// `hole` is 1-based.
    pub fn par(&self, course: Course, hole: u8) -> u8 {
        self.pars[course.index()][usize::from(hole - 1)]
    }

    pub fn yardage(&self, course: Course, hole: u8) -> u16 {
        self.yardages[course.index()][usize::from(hole - 1)]
    }

    pub fn course_par(&self, course: Course) -> u16 {
        self.pars[course.index()].iter().map(|p| u16::from(*p)).sum()
    }

    pub fn holes(&self) -> Vec<CourseHole> {
        let mut out = Vec::with_capacity(HOLES_PER_ROUND * 2);
        for course in Course::ALL {
            for hole in 1..=HOLES_PER_ROUND as u8 {
                out.push(CourseHole {
                    course,
                    hole,
                    par: self.par(course, hole),
                    yardage: self.yardage(course, hole),
                });
            }
        }
        out
    }
}

/// Reads a `COURSE,HOLE,PAR,YARDAGE` table. YARDAGE may be blank.
pub fn read_course_holes<R: Read>(rdr: R) -> Result<Vec<CourseHole>, ReferenceDataError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|err| ReferenceDataError::Malformed {
            row: 0,
            reason: err.to_string(),
        })?
        .clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| ReferenceDataError::Malformed {
                row: 0,
                reason: format!("missing column {name}"),
            })
    };
    let course_col = col("COURSE")?;
    let hole_col = col("HOLE")?;
    let par_col = col("PAR")?;
    let yardage_col = headers.iter().position(|h| h.eq_ignore_ascii_case("YARDAGE"));

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|err| ReferenceDataError::Malformed {
            row,
            reason: err.to_string(),
        })?;
        let field = |i: usize| record.get(i).unwrap_or("");
        let course =
            Course::from_label(field(course_col)).map_err(|err| ReferenceDataError::Malformed {
                row,
                reason: err.to_string(),
            })?;
        let hole = parse_ref_number::<u8>(field(hole_col), "HOLE", row)?;
        let par = parse_ref_number::<u8>(field(par_col), "PAR", row)?;
        let yardage = match yardage_col.map(field) {
            Some(raw) if !raw.is_empty() => parse_ref_number::<u16>(raw, "YARDAGE", row)?,
            _ => 0,
        };
        out.push(CourseHole {
            course,
            hole,
            par,
            yardage,
        });
    }
    Ok(out)
}

fn parse_ref_number<T: std::str::FromStr>(
    raw: &str,
    column: &str,
    row: usize,
) -> Result<T, ReferenceDataError> {
    raw.parse::<T>().map_err(|_| ReferenceDataError::Malformed {
        row,
        reason: format!("{column} value {raw:?} is not a number"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_reference_is_par_seventy_on_both_courses() {
        let reference = CourseReference::bundled(DEFAULT_COURSE_PAR).unwrap();
        assert_eq!(reference.course_par(Course::Lake), 70);
        assert_eq!(reference.course_par(Course::Ocean), 70);
        assert_eq!(reference.par(Course::Lake, 16), 5);
        assert_eq!(reference.holes().len(), 36);
    }

    #[test]
    fn missing_hole_is_reported() {
        let holes: Vec<CourseHole> = OLYMPIC_CLUB
            .iter()
            .copied()
            .filter(|h| !(h.course == Course::Ocean && h.hole == 7))
            .collect();
        let err = CourseReference::new(&holes, 70).unwrap_err();
        assert_eq!(
            err,
            ReferenceDataError::MissingHole {
                course: Course::Ocean,
                hole: 7
            }
        );
    }

    #[test]
    fn course_tokens_match_case_insensitively() {
        assert_eq!(Course::find_in("(LAKE)"), Some(Course::Lake));
        assert_eq!(Course::find_in("ocean"), Some(Course::Ocean));
        assert_eq!(Course::find_in("LakeOcean"), None);
        assert!(Course::from_label("Cypress").is_err());
    }

    #[test]
    fn back_nine_start_plays_ten_first() {
        let order: Vec<u8> = Side::Back.playing_order().collect();
        assert_eq!(order[0], 10);
        assert_eq!(order[9], 1);
        assert_eq!(order.len(), 18);
    }
}
