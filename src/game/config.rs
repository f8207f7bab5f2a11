use serde::{Deserialize, Serialize};

/// Configuration for a single game board
///
/// Board dimensions and positions share the same unit; every position is a
/// multiple of `tile_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the board
    pub board_width: i32,
    /// Height of the board
    pub board_height: i32,
    /// Edge length of one tile
    pub tile_size: i32,
    /// Ticks a snake may go without eating before it starves
    pub life_time: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 400,
            board_height: 400,
            tile_size: 10,
            life_time: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(board_width: i32, board_height: i32, tile_size: i32) -> Self {
        Self {
            board_width,
            board_height,
            tile_size,
            ..Default::default()
        }
    }

    /// Board measured directly in tiles (tile size 1)
    pub fn tiles(columns: i32, rows: i32) -> Self {
        Self::new(columns, rows, 1)
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::tiles(10, 10)
    }

    /// Number of tile columns on the board
    pub fn columns(&self) -> i32 {
        self.board_width / self.tile_size
    }

    /// Number of tile rows on the board
    pub fn rows(&self) -> i32 {
        self.board_height / self.tile_size
    }

    /// Same tiles and life time, with the board resized to the given tile counts.
    ///
    /// Missing counts keep the current ones. The configuration is validated
    /// before and after resizing.
    pub fn resized(&self, columns: Option<i32>, rows: Option<i32>) -> Result<Self, String> {
        self.validate()?;

        let resized = Self {
            board_width: columns.unwrap_or(self.columns()) * self.tile_size,
            board_height: rows.unwrap_or(self.rows()) * self.tile_size,
            ..self.clone()
        };
        resized.validate()?;
        Ok(resized)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size <= 0 {
            return Err(format!("tile_size must be positive, got {}", self.tile_size));
        }

        if self.board_width <= 0 || self.board_height <= 0 {
            return Err(format!(
                "board dimensions must be positive, got {}x{}",
                self.board_width, self.board_height
            ));
        }

        if self.board_width % self.tile_size != 0 || self.board_height % self.tile_size != 0 {
            return Err(format!(
                "board {}x{} is not a whole number of {} tiles",
                self.board_width, self.board_height, self.tile_size
            ));
        }

        if self.columns() * self.rows() < 2 {
            return Err("board must hold at least two tiles".to_string());
        }

        if self.life_time == 0 {
            return Err("life_time must be at least 1".to_string());
        }

        Ok(())
    }
}
