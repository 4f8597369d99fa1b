//! Paths
//!
//! Polylines described as ordered (position, color) waypoints.

use sdlcanvas_render::{Position, RgbaColor};

/// A waypoint of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Position,
    pub color: RgbaColor,
}

/// An immutable polyline.
///
/// Each segment is stroked with the color of its end waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
}

impl Path {
    /// Start a path at a position
    pub fn builder(start: Position, color: RgbaColor) -> PathBuilder {
        PathBuilder {
            waypoints: vec![Waypoint {
                position: start,
                color,
            }],
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Consecutive waypoint pairs
    pub fn segments(&self) -> impl Iterator<Item = (&Waypoint, &Waypoint)> {
        self.waypoints.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Accumulates waypoints before freezing them into a `Path`
#[derive(Debug, Clone)]
pub struct PathBuilder {
    waypoints: Vec<Waypoint>,
}

impl PathBuilder {
    pub fn line_to(mut self, position: Position, color: RgbaColor) -> Self {
        self.waypoints.push(Waypoint { position, color });
        self
    }

    /// Add a segment back to the first waypoint
    pub fn close(mut self, color: RgbaColor) -> Self {
        let first = self.waypoints[0].position;
        self.waypoints.push(Waypoint {
            position: first,
            color,
        });
        self
    }

    pub fn build(self) -> Path {
        Path {
            waypoints: self.waypoints,
        }
    }
}

impl FromIterator<Waypoint> for Path {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Path {
            waypoints: iter.into_iter().collect(),
        }
    }
}
