//! Structured check detail and its text rendering.

use std::io::{self, Write};

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Pass,
    Fail,
    Warn,
    /// Plain text without a status symbol.
    Note,
}

impl Mark {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Mark::Pass => "✓",
            Mark::Fail => "✗",
            Mark::Warn => "⚠",
            Mark::Note => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub mark: Mark,
    pub text: String,
    pub indent: usize,
}

/// A titled group of lines inside a check section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub title: String,
    pub lines: Vec<Line>,
}

impl Block {
    fn push(&mut self, mark: Mark, indent: usize, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line {
            mark,
            text: text.into(),
            indent,
        });
        self
    }

    pub fn pass(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Mark::Pass, 0, text)
    }

    pub fn fail(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Mark::Fail, 0, text)
    }

    pub fn warn(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Mark::Warn, 0, text)
    }

    pub fn note(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Mark::Note, 0, text)
    }

    /// Add a line indented under the previous one.
    pub fn nested(&mut self, mark: Mark, text: impl Into<String>) -> &mut Self {
        self.push(mark, 2, text)
    }
}

/// Everything a check printed, grouped into titled blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detail {
    pub blocks: Vec<Block>,
}

impl Detail {
    /// Start a new block and return it for appending lines.
    pub fn block(&mut self, title: impl Into<String>) -> &mut Block {
        self.blocks.push(Block {
            title: title.into(),
            lines: Vec::new(),
        });
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    /// All lines across blocks, in order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Lines carrying `mark` whose text contains `needle`.
    pub fn find<'a>(&'a self, mark: Mark, needle: &'a str) -> impl Iterator<Item = &'a Line> {
        self.lines()
            .filter(move |l| l.mark == mark && l.text.contains(needle))
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn write_section_header(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out, " {title}")?;
    writeln!(out, "{}", rule())
}

pub fn write_block_title(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

pub fn write_detail(out: &mut dyn Write, detail: &Detail) -> io::Result<()> {
    for block in &detail.blocks {
        write_block_title(out, &block.title)?;
        for line in &block.lines {
            let pad = " ".repeat(line.indent);
            match line.mark {
                Mark::Note => writeln!(out, "{pad}{}", line.text)?,
                mark => writeln!(out, "{pad}{} {}", mark.symbol(), line.text)?,
            }
        }
    }
    Ok(())
}
