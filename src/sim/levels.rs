//! Level layouts
//!
//! A level is a text grid: one line per brick row, `BRICK_COLUMNS` cells per
//! line separated by whitespace. A cell is `--` (empty) or a four-letter
//! brick code such as `SINO` (silver, no power). Blank lines and `#` comments
//! are skipped.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::brick::{Brick, BrickLayout, BrickType, PowerType};
use crate::consts::{BRICK_COLUMNS, BRICK_ROWS};

/// Levels shipped with the game
const BUILTIN_LEVELS: [(&str, &str); 5] = [
    ("level_01", include_str!("../../levels/level_01.txt")),
    ("level_02", include_str!("../../levels/level_02.txt")),
    ("level_03", include_str!("../../levels/level_03.txt")),
    ("level_04", include_str!("../../levels/level_04.txt")),
    ("level_05", include_str!("../../levels/level_05.txt")),
];

const EMPTY_CELL: &str = "--";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("{name}:{line}: unknown brick code `{code}`")]
    UnknownCode {
        name: String,
        line: usize,
        code: String,
    },
    #[error("{name}:{line}: expected {expected} cells, found {found}", expected = BRICK_COLUMNS)]
    ColumnCount {
        name: String,
        line: usize,
        found: usize,
    },
    #[error("{name}: at most {max} rows allowed, found {found}", max = BRICK_ROWS)]
    TooManyRows { name: String, found: usize },
    #[error("no level files found in {0}")]
    NoLevels(PathBuf),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a single level from its text form
pub fn parse_level(name: &str, text: &str) -> Result<BrickLayout, LevelError> {
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != BRICK_COLUMNS {
            return Err(LevelError::ColumnCount {
                name: name.to_string(),
                line: line_no,
                found: cells.len(),
            });
        }

        let row = cells
            .into_iter()
            .map(|cell| parse_cell(cell).ok_or_else(|| LevelError::UnknownCode {
                name: name.to_string(),
                line: line_no,
                code: cell.to_string(),
            }))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    if rows.len() > BRICK_ROWS {
        return Err(LevelError::TooManyRows {
            name: name.to_string(),
            found: rows.len(),
        });
    }

    Ok(BrickLayout::from_rows(rows))
}

/// `None` = malformed code, `Some(None)` = empty cell
fn parse_cell(cell: &str) -> Option<Option<Brick>> {
    if cell == EMPTY_CELL {
        return Some(None);
    }
    if cell.len() != 4 || !cell.is_ascii() {
        return None;
    }
    let kind = BrickType::from_code(&cell[..2])?;
    let power = PowerType::from_code(&cell[2..])?;
    Some(Some(Brick::new(kind, power)))
}

/// Ordered collection of level layouts (level numbers start at 1)
#[derive(Debug, Clone)]
pub struct LevelSet {
    levels: Vec<BrickLayout>,
}

impl LevelSet {
    /// The levels embedded in the binary
    pub fn builtin() -> Result<Self, LevelError> {
        let levels = BUILTIN_LEVELS
            .iter()
            .map(|(name, text)| parse_level(name, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { levels })
    }

    /// Load every `level_*.txt` in a directory, ordered by file name
    pub fn from_dir(dir: &Path) -> Result<Self, LevelError> {
        let io_err = |source| LevelError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "txt")
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("level_"))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(LevelError::NoLevels(dir.to_path_buf()));
        }

        let mut levels = Vec::with_capacity(paths.len());
        for path in &paths {
            let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path.display().to_string();
            levels.push(parse_level(&name, &text)?);
        }

        log::info!("Loaded {} levels from {}", levels.len(), dir.display());
        Ok(Self { levels })
    }

    pub fn from_layouts(levels: Vec<BrickLayout>) -> Self {
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Fresh copy of a level's layout, `None` past the last level
    pub fn level(&self, number: u32) -> Option<BrickLayout> {
        let index = (number as usize).checked_sub(1)?;
        self.levels.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cell: &str) -> String {
        vec![cell; BRICK_COLUMNS].join(" ")
    }

    #[test]
    fn test_builtin_levels_parse() {
        let set = LevelSet::builtin().unwrap();
        assert_eq!(set.len(), BUILTIN_LEVELS.len());
        for number in 1..=set.len() as u32 {
            let layout = set.level(number).unwrap();
            assert!(layout.remaining() > 0, "level {number} has no bricks");
        }
        assert!(set.level(0).is_none());
        assert!(set.level(set.len() as u32 + 1).is_none());
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = format!("# title\n\n{}\n{}\n", row("--"), row("SICA"));
        let layout = parse_level("test", &text).unwrap();
        assert!(layout.get(0, 0).is_none());
        let brick = layout.get(1, 12).unwrap();
        assert_eq!(brick.kind, BrickType::Silver);
        assert_eq!(brick.power, PowerType::Catch);
        assert_eq!(layout.remaining(), BRICK_COLUMNS);
    }

    #[test]
    fn test_unknown_code() {
        let text = format!("{}\n", row("XXNO"));
        let err = parse_level("bad", &text).unwrap_err();
        assert!(matches!(err, LevelError::UnknownCode { line: 1, .. }));
        assert!(err.to_string().contains("XXNO"));
    }

    #[test]
    fn test_wrong_column_count() {
        let err = parse_level("short", "RENO RENO\n").unwrap_err();
        assert!(matches!(err, LevelError::ColumnCount { found: 2, .. }));
    }

    #[test]
    fn test_too_many_rows() {
        let text = (0..BRICK_ROWS + 1).map(|_| row("--")).collect::<Vec<_>>().join("\n");
        let err = parse_level("tall", &text).unwrap_err();
        assert!(matches!(err, LevelError::TooManyRows { .. }));
    }

    #[test]
    fn test_level_returns_fresh_copy() {
        let set = LevelSet::builtin().unwrap();
        let mut first = set.level(1).unwrap();
        let (row, col) = first.iter().next().map(|(r, c, _)| (r, c)).unwrap();
        first.set(row, col, None);
        assert!(set.level(1).unwrap().get(row, col).is_some());
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("breakout-levels-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_from_dir_sorted_and_filtered() {
        let dir = temp_dir("sorted");
        std::fs::write(dir.join("level_02.txt"), row("BLNO")).unwrap();
        std::fs::write(dir.join("level_01.txt"), format!("{}\n{}", row("--"), row("RENO"))).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a level").unwrap();
        std::fs::write(dir.join("level_03.bak"), "not a level either").unwrap();

        let set = LevelSet::from_dir(&dir).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.level(1).unwrap().get(1, 0).unwrap().kind, BrickType::Red);
        assert_eq!(set.level(2).unwrap().get(0, 0).unwrap().kind, BrickType::Blue);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_from_dir_without_levels() {
        let dir = temp_dir("empty");
        std::fs::write(dir.join("readme.txt"), "nothing here").unwrap();
        let err = LevelSet::from_dir(&dir).unwrap_err();
        assert!(matches!(err, LevelError::NoLevels(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_from_dir_reports_bad_file() {
        let dir = temp_dir("bad");
        std::fs::write(dir.join("level_01.txt"), row("ZZNO")).unwrap();
        let err = LevelSet::from_dir(&dir).unwrap_err();
        assert!(matches!(err, LevelError::UnknownCode { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_dir() {
        let err = LevelSet::from_dir(Path::new("/nonexistent/levels/dir")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
