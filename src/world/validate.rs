//! Authoring-time sanity check for level tables.
//!
//! The tracer trusts its data: an unclosed loop silently inverts the floor
//! parity of a whole sector. Run this from tests or `render_frame check`,
//! never per frame.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::world::geometry::{Boundary, Level, SectorId, SegmentId};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LevelError {
    #[error("sector {0} has no segments")]
    EmptySector(SectorId),

    #[error("sector {sector}: floor {floor_h} is not below ceiling {ceil_h}")]
    InvertedExtent {
        sector: SectorId,
        floor_h: f32,
        ceil_h: f32,
    },

    #[error("sector {sector}, segment {segment}: zero length or non-finite end points")]
    DegenerateSegment { sector: SectorId, segment: SegmentId },

    #[error("sector {sector}, segment {segment}: opening {lower}..{upper} is inverted")]
    InvertedOpening {
        sector: SectorId,
        segment: SegmentId,
        lower: f32,
        upper: f32,
    },

    #[error("sector {sector}: vertex ({}, {}) is used by {degree} segments, loop is open", .at.x, .at.y)]
    OpenLoop {
        sector: SectorId,
        at: Vec2,
        degree: usize,
    },
}

/// A partial wall whose height disagrees with the sector on its far side.
///
/// Not fatal (the picture is still well defined), only suspicious.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalMismatch {
    pub sector: SectorId,
    pub segment: SegmentId,
    pub neighbour: SectorId,
    pub expected: f32,
    pub found: f32,
}

impl fmt::Display for PortalMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sector {}, segment {}: height {} but neighbour sector {} has {}",
            self.sector, self.segment, self.found, self.neighbour, self.expected
        )
    }
}

/// Undirected key for an edge, so `a→b` and `b→a` match.
fn edge_key(a: Vec2, b: Vec2) -> [u32; 4] {
    let (p, q) = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };
    [p.x.to_bits(), p.y.to_bits(), q.x.to_bits(), q.y.to_bits()]
}

impl Level {
    /// Every structural problem, in table order.
    pub fn problems(&self) -> Vec<LevelError> {
        let mut out = Vec::new();

        for (si, sector) in self.sectors.iter().enumerate() {
            let sid = si as SectorId;

            if sector.segments.is_empty() {
                out.push(LevelError::EmptySector(sid));
                continue;
            }
            if !(sector.floor_h < sector.ceil_h) {
                out.push(LevelError::InvertedExtent {
                    sector: sid,
                    floor_h: sector.floor_h,
                    ceil_h: sector.ceil_h,
                });
            }

            // Closed loops ⇔ every vertex has even degree. Shared edges are
            // not always stored reversed, so direction is ignored.
            let mut degree: HashMap<[u32; 2], (Vec2, usize)> = HashMap::new();

            for (gi, seg) in sector.segments.iter().enumerate() {
                let gid = gi as SegmentId;
                if !seg.a.is_finite() || !seg.b.is_finite() || seg.a == seg.b || !(seg.len > 0.0) {
                    out.push(LevelError::DegenerateSegment {
                        sector: sid,
                        segment: gid,
                    });
                }
                if let Boundary::Opening { lower, upper, .. } = seg.boundary {
                    if lower > upper {
                        out.push(LevelError::InvertedOpening {
                            sector: sid,
                            segment: gid,
                            lower,
                            upper,
                        });
                    }
                }
                for p in [seg.a, seg.b] {
                    degree
                        .entry([p.x.to_bits(), p.y.to_bits()])
                        .or_insert((p, 0))
                        .1 += 1;
                }
            }

            let mut open: Vec<_> = degree.into_values().filter(|(_, d)| d % 2 == 1).collect();
            open.sort_by(|l, r| l.0.x.total_cmp(&r.0.x).then(l.0.y.total_cmp(&r.0.y)));
            out.extend(open.into_iter().map(|(at, degree)| LevelError::OpenLoop {
                sector: sid,
                at,
                degree,
            }));
        }
        out
    }

    /// First structural problem, if any. Portal mismatches are only logged.
    pub fn validate(&self) -> Result<(), LevelError> {
        for m in self.portal_mismatches() {
            log::warn!("{}: {m}", self.name);
        }
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Partial walls whose heights don't match the sector sharing their edge.
    ///
    /// * `Opening`: `lower`/`upper` against the neighbour's floor/ceiling.
    /// * `Upper`: `height` against the neighbour's ceiling.
    /// * `Lower`: `height` against the neighbour's floor.
    ///
    /// Edges whose far side is not part of the table are skipped.
    pub fn portal_mismatches(&self) -> Vec<PortalMismatch> {
        let mut owners: HashMap<[u32; 4], Vec<SectorId>> = HashMap::new();
        for (si, sector) in self.sectors.iter().enumerate() {
            for seg in &sector.segments {
                owners
                    .entry(edge_key(seg.a, seg.b))
                    .or_default()
                    .push(si as SectorId);
            }
        }

        let mut out = Vec::new();
        for (si, sector) in self.sectors.iter().enumerate() {
            let sid = si as SectorId;
            for (gi, seg) in sector.segments.iter().enumerate() {
                let Some(others) = owners.get(&edge_key(seg.a, seg.b)) else {
                    continue;
                };
                for &nid in others.iter().filter(|&&n| n != sid) {
                    let n = &self.sectors[nid as usize];
                    let checks = match seg.boundary {
                        Boundary::Opening { lower, upper, .. } => {
                            [Some((n.floor_h, lower)), Some((n.ceil_h, upper))]
                        }
                        Boundary::Upper { height, .. } => [Some((n.ceil_h, height)), None],
                        Boundary::Lower { height, .. } => [Some((n.floor_h, height)), None],
                        Boundary::Wall { .. } | Boundary::Null => [None, None],
                    };
                    for (expected, found) in checks.into_iter().flatten() {
                        if expected != found {
                            out.push(PortalMismatch {
                                sector: sid,
                                segment: gi as SegmentId,
                                neighbour: nid,
                                expected,
                                found,
                            });
                        }
                    }
                }
            }
        }
        out
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
