//! Progress bar display for bootstrap runs

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for the sequential tool run
pub struct ProgressDisplay {
    tool_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with the total tool count
    pub fn new(total_tools: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-");

        let tool_pb = ProgressBar::new(total_tools);
        tool_pb.set_style(style);

        Self { tool_pb }
    }

    /// Show the tool currently being ensured.
    ///
    /// The bar position counts finished tools, so while tool `current` of
    /// `total` is still installing the bar reads `current - 1`.
    pub fn update_tool(&self, tool_name: &str, current: usize, total: usize) {
        self.tool_pb.set_position(current.saturating_sub(1) as u64);
        self.tool_pb.set_message(format!("({current}/{total}) {tool_name}"));
    }

    /// Finish cleanly
    pub fn finish(&self) {
        self.tool_pb.finish_with_message("done");
    }

    /// Abandon on error, keeping the completed count visible
    pub fn abandon(&self) {
        self.tool_pb.abandon();
    }
}
