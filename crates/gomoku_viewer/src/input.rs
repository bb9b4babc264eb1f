//! Parsing of interactive input lines.

/// A command typed while stepping through a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCommand {
    /// Next move.
    Next,
    /// Previous move.
    Prev,
    /// Jump to a turn.
    Jump(usize),
    /// Stop stepping.
    Quit,
}

impl StepCommand {
    /// Parses one line. An empty line means "next".
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "n" | "next" => Some(Self::Next),
            "p" | "prev" => Some(Self::Prev),
            "q" | "quit" => Some(Self::Quit),
            other => other.parse().ok().map(Self::Jump),
        }
    }
}

/// A command typed during live play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    /// Place a mark at column `x`, row `y`.
    Place(usize, usize),
    /// Abandon the game.
    Quit,
}

impl PlayCommand {
    /// Parses `x y` (space or comma separated) or `q`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if matches!(line, "q" | "quit") {
            return Some(Self::Quit);
        }
        let mut parts = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty());
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        parts.next().is_none().then_some(Self::Place(x, y))
    }
}
