use std::path::Path;

use anyhow::Context as _;
use oxi2048_ai::HeuristicWeights;
use oxi2048_engine::TileGrid;

/// Reads heuristic weights from a JSON file; omitted fields keep their
/// default values.
pub(crate) fn read_weights_file(path: &Path) -> anyhow::Result<HeuristicWeights> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read weights file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse weights file {}", path.display()))
}

/// Reads a board from a JSON file holding an array of rows of tile values
/// (`0` = empty cell).
pub(crate) fn read_board_file(path: &Path) -> anyhow::Result<TileGrid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read board file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse board file {}", path.display()))
}
