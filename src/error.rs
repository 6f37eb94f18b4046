use thiserror::Error;

/// Load-time failures that abort level construction
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no tiles")]
    EmptyTiles,

    #[error("duplicate tile id {0}")]
    DuplicateTileId(i32),

    #[error("tile {tile} lists unknown child id {child}")]
    DanglingChild { tile: i32, child: i32 },

    #[error("blocking relation contains a cycle through tile {0}")]
    CyclicDependency(i32),

    #[error("invalid level json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
}
