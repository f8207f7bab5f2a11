use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one tile in a direction
    pub fn shifted(&self, direction: Direction, tile_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * tile_size, dy * tile_size)
    }

    /// Whether the position lies on `[0, width - tile] x [0, height - tile]`
    pub fn is_within(&self, width: i32, height: i32, tile_size: i32) -> bool {
        self.x >= 0 && self.x <= width - tile_size && self.y >= 0 && self.y <= height - tile_size
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub segments: Vec<Position>,
    /// Direction of the next move
    pub heading: Direction,
    pub alive: bool,
    /// Display colour, ignored by the simulation
    pub colour: [u8; 3],
    /// Moves that will keep their tail instead of dropping it
    pending_growth: usize,
}

impl Snake {
    pub const DEFAULT_COLOUR: [u8; 3] = [255, 255, 255];

    /// Create a single-segment snake
    pub fn new(head: Position, heading: Direction) -> Self {
        Self {
            segments: vec![head],
            heading,
            alive: true,
            colour: Self::DEFAULT_COLOUR,
            pending_growth: 0,
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty segment list.
    pub fn from_segments(segments: Vec<Position>, heading: Direction) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            segments,
            heading,
            alive: true,
            colour: Self::DEFAULT_COLOUR,
            pending_growth: 0,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.segments[1..]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a constructed snake
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn pending_growth(&self) -> usize {
        self.pending_growth
    }

    /// Whether any segment sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Request a heading change. Reversals are ignored; returns whether the heading changed.
    pub fn change_heading(&mut self, direction: Direction) -> bool {
        if self.heading.is_opposite(direction) {
            return false;
        }
        self.heading = direction;
        true
    }

    /// Schedule one extra segment, added by the next move
    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    /// Whether moving the head onto `candidate` would hit the body.
    ///
    /// The last segment only counts when it will not vacate this move.
    pub fn collides_on_move(&self, candidate: Position) -> bool {
        let checked = if self.pending_growth == 0 {
            &self.segments[..self.segments.len() - 1]
        } else {
            &self.segments[..]
        };
        checked.contains(&candidate)
    }

    /// Push a new head, dropping the tail unless a growth is pending
    pub fn advance(&mut self, new_head: Position) {
        self.segments.insert(0, new_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.segments.pop();
        }
    }

    pub fn die(&mut self) {
        self.alive = false;
    }
}

/// A single piece of food
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}
