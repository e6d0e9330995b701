//! Converts a Jira issue into a git-friendly commit message.
//!
//! The output starts with a `KEY: summary` header and a blank line, followed
//! by the description re-flowed at [`LINE_WIDTH`]. Single newlines inside a
//! paragraph are soft wraps and get merged, blank lines separate paragraphs,
//! and `{noformat}` blocks are copied verbatim with a four space indent.

/// Maximum summed word width of a re-flowed line.
pub const LINE_WIDTH: usize = 76;

/// Line that opens and closes a verbatim block.
pub const NOFORMAT: &str = "{noformat}";

const BLOCK_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    InBlock,
}

/// Lines starting with anything other than an ASCII letter or digit are
/// treated as markup and never merged into the surrounding paragraph.
pub fn is_ascii_alnum(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

/// Render `identifier`, `title` and `description` as a commit message body.
///
/// Never fails: an unterminated `{noformat}` block simply runs to the end of
/// the description.
pub fn format_for_git(identifier: &str, title: &str, description: &str) -> Vec<u8> {
    let mut out = format!("{identifier}: {title}\n\n");

    let description = description.replace('\r', "");
    let mut mode = Mode::Normal;
    let mut width = 0usize;

    for line in description.split('\n') {
        match mode {
            Mode::InBlock => {
                if line == NOFORMAT {
                    mode = Mode::Normal;
                } else {
                    out.push_str(BLOCK_INDENT);
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Mode::Normal if line == NOFORMAT => {
                if width != 0 {
                    out.push_str("\n\n");
                    width = 0;
                }
                mode = Mode::InBlock;
            }
            Mode::Normal => push_line(&mut out, &mut width, line),
        }
    }

    out.into_bytes()
}

fn push_line(out: &mut String, width: &mut usize, line: &str) {
    let Some(first) = line.chars().next() else {
        // paragraph break
        if *width != 0 {
            out.push('\n');
            *width = 0;
        }
        out.push('\n');
        return;
    };

    if !is_ascii_alnum(first) {
        if *width != 0 {
            out.push('\n');
            *width = 0;
        }
        out.push_str(line);
        out.push('\n');
        return;
    }

    for word in line.split_whitespace() {
        let len = word.chars().count();
        if *width + len > LINE_WIDTH {
            out.push('\n');
            *width = 0;
        }
        out.push_str(word);
        out.push(' ');
        *width += len;
    }
}
