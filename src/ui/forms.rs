use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Input state of the "go to page" dialog.
#[derive(Default, Clone)]
pub(crate) struct JumpForm {
    pub(crate) page: String,
    pub(crate) error: Option<String>,
}

impl JumpForm {
    /// Accept digits only. Returns whether the character was taken.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() && self.page.len() < 10 {
            self.page.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.page.pop();
    }

    pub(crate) fn value_len(&self) -> usize {
        self.page.chars().count()
    }

    /// Validate the typed page number.
    pub(crate) fn parse(&self) -> Result<u32> {
        let trimmed = self.page.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("Enter a page number."));
        }
        let page: u32 = trimmed
            .parse()
            .map_err(|_| anyhow!("Page number is too large."))?;
        if page == 0 {
            return Err(anyhow!("Pages start at 1."));
        }
        Ok(page)
    }

    pub(crate) fn build_line(&self, label: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
            Span::raw(self.page.clone()),
        ])
    }
}
