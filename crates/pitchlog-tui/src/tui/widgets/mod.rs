// TUI widget modules for each screen panel.

pub mod event_list;
pub mod pitch;
pub mod session;
pub mod status_bar;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_util {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// Every row of the rendered buffer as a plain string.
    pub fn buffer_lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    pub fn buffer_contains(terminal: &Terminal<TestBackend>, needle: &str) -> bool {
        buffer_lines(terminal).iter().any(|line| line.contains(needle))
    }
}
