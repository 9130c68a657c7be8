//! Bounded plot histories
//!
//! Each series keeps at most [`MAX_POINTS`] points and evicts the oldest
//! first. The four series are always pushed together, so they always hold
//! the same number of points.

use serde::{Deserialize, Serialize};
use simcore::DataPoint;
use std::collections::VecDeque;

/// Capacity of every plotted series
pub const MAX_POINTS: usize = 200;

/// The four plotted series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    /// (t, x)
    Position,
    /// (t, v)
    Velocity,
    /// (t, a)
    Acceleration,
    /// (x, v)
    Phase,
}

impl Series {
    pub const ALL: [Series; 4] = [
        Series::Position,
        Series::Velocity,
        Series::Acceleration,
        Series::Phase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Series::Position => "position",
            Series::Velocity => "velocity",
            Series::Acceleration => "acceleration",
            Series::Phase => "phase",
        }
    }

    /// (x axis, y axis) labels
    pub fn axis_labels(&self) -> (&'static str, &'static str) {
        match self {
            Series::Position => ("t", "x"),
            Series::Velocity => ("t", "v"),
            Series::Acceleration => ("t", "a"),
            Series::Phase => ("x", "v"),
        }
    }
}

/// FIFO buffer of plot points with a fixed capacity
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    points: VecDeque<DataPoint>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &DataPoint> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<DataPoint> {
        self.points.back().copied()
    }

    /// Snapshot as (x, y) pairs, oldest first
    pub fn to_pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.y)).collect()
    }
}

/// Histories for position, velocity, acceleration and phase
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffers {
    position: History,
    velocity: History,
    acceleration: History,
    phase: History,
}

impl Default for HistoryBuffers {
    fn default() -> Self {
        Self::new(MAX_POINTS)
    }
}

impl HistoryBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            position: History::new(capacity),
            velocity: History::new(capacity),
            acceleration: History::new(capacity),
            phase: History::new(capacity),
        }
    }

    /// Append one point to every series.
    ///
    /// Nothing is appended if any point is non-finite; returns whether the
    /// points were stored.
    pub fn push_all(
        &mut self,
        position: DataPoint,
        velocity: DataPoint,
        acceleration: DataPoint,
        phase: DataPoint,
    ) -> bool {
        let finite = [position, velocity, acceleration, phase]
            .iter()
            .all(DataPoint::is_finite);
        if !finite {
            return false;
        }
        self.position.push(position);
        self.velocity.push(velocity);
        self.acceleration.push(acceleration);
        self.phase.push(phase);
        true
    }

    pub fn series(&self, series: Series) -> &History {
        match series {
            Series::Position => &self.position,
            Series::Velocity => &self.velocity,
            Series::Acceleration => &self.acceleration,
            Series::Phase => &self.phase,
        }
    }

    pub fn position(&self) -> &History {
        &self.position
    }

    pub fn velocity(&self) -> &History {
        &self.velocity
    }

    pub fn acceleration(&self) -> &History {
        &self.acceleration
    }

    pub fn phase(&self) -> &History {
        &self.phase
    }

    /// Number of points in each series
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn clear(&mut self) {
        self.position.clear();
        self.velocity.clear();
        self.acceleration.clear();
        self.phase.clear();
    }
}
