use crate::storage::{self, Storage, HISTORY_KEY};

pub const MAX_ENTRY_WIDTH: usize = 50;

/// Entered command lines, oldest first, mirrored to storage on every change.
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn restore(storage: &dyn Storage) -> Self {
        CommandHistory {
            entries: storage::load(storage, HISTORY_KEY).unwrap_or_default(),
            cursor: None,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn push(&mut self, line: &str, storage: &mut dyn Storage) {
        self.entries.push(line.into());
        self.cursor = None;
        storage::save(storage, HISTORY_KEY, &self.entries);
    }

    pub fn clear(&mut self, storage: &mut dyn Storage) {
        self.entries.clear();
        self.cursor = None;
        storage::save(storage, HISTORY_KEY, &self.entries);
    }

    /// Steps back (arrow up). Stops at the oldest entry.
    pub fn prev(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            None => self.entries.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.cursor = Some(idx);
        self.entries.get(idx).map(|s| s.as_str())
    }

    /// Steps forward (arrow down). Past the newest entry yields `None` and resets the cursor.
    pub fn next(&mut self) -> Option<&str> {
        let idx = self.cursor? + 1;
        if idx >= self.entries.len() {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(idx);
        self.entries.get(idx).map(|s| s.as_str())
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "No commands in history".into();
        }
        let num_width = self.entries.len().to_string().len().max(3);
        let rows: Vec<(String, String)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (format!("{:>w$}", i + 1, w = num_width), truncate(e)))
            .collect();
        let cmd_width = rows
            .iter()
            .map(|(_, c)| c.chars().count())
            .max()
            .unwrap_or(0)
            .max("COMMAND".len());

        let border = format!(
            "+{}+{}+",
            "-".repeat(num_width + 2),
            "-".repeat(cmd_width + 2)
        );
        let mut out = vec![
            border.clone(),
            format!("| {:>nw$} | {:<cw$} |", "#", "COMMAND", nw = num_width, cw = cmd_width),
            border.clone(),
        ];
        for (num, cmd) in rows {
            out.push(format!("| {} | {:<cw$} |", num, cmd, cw = cmd_width));
        }
        out.push(border);
        out.join("\n")
    }
}

fn truncate(entry: &str) -> String {
    if entry.chars().count() <= MAX_ENTRY_WIDTH {
        return entry.into();
    }
    let head: String = entry.chars().take(MAX_ENTRY_WIDTH - 3).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn filled(lines: &[&str]) -> (CommandHistory, MemoryStorage) {
        let mut storage = MemoryStorage::new();
        let mut history = CommandHistory::restore(&storage);
        for l in lines {
            history.push(l, &mut storage);
        }
        (history, storage)
    }

    #[test]
    fn test_render_numbers_in_order() {
        let (history, _) = filled(&["ls", "cd blog", "whoami"]);
        let out = history.render();
        let rows: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with('|') && !l.contains("COMMAND"))
            .collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("  1 | ls"));
        assert!(rows[1].contains("  2 | cd blog"));
        assert!(rows[2].contains("  3 | whoami"));
    }

    #[test]
    fn test_long_entry_truncated() {
        let long = "x".repeat(80);
        let (history, _) = filled(&[&long]);
        let out = history.render();
        assert!(out.contains(&format!("{}...", "x".repeat(47))));
        assert!(!out.contains(&"x".repeat(48)));
    }

    #[test]
    fn test_persisted_and_cleared() {
        let (mut history, mut storage) = filled(&["ls", "pwd"]);
        assert_eq!(CommandHistory::restore(&storage).entries(), history.entries());
        history.clear(&mut storage);
        assert_eq!(storage.raw(HISTORY_KEY), Some("[]"));
        assert_eq!(history.render(), "No commands in history");
    }

    #[test]
    fn test_cursor_navigation() {
        let (mut history, _) = filled(&["a", "b", "c"]);
        assert_eq!(history.next(), None);
        assert_eq!(history.prev(), Some("c"));
        assert_eq!(history.prev(), Some("b"));
        assert_eq!(history.prev(), Some("a"));
        assert_eq!(history.prev(), Some("a"));
        assert_eq!(history.next(), Some("b"));
        assert_eq!(history.next(), Some("c"));
        assert_eq!(history.next(), None);
        assert_eq!(history.prev(), Some("c"));
    }
}
