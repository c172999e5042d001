//! Greedy word wrapping for result descriptions

/// Split `text` into lines of roughly `max_width` characters.
///
/// Words are packed greedily. The fit test compares the current line
/// (which carries a leading space) plus the next word against
/// `max_width`, without counting the separator in front of that word,
/// so a line can come out one character longer than `max_width`.
/// A first word that alone exceeds the width produces a leading empty
/// line. Both quirks are kept so the output matches what users of the
/// extension have always seen.
pub fn wrap_lines(text: &str, max_width: usize) -> Vec<String>
{   let mut lines = Vec::new();
    let mut current = String::new();

    let words = text
      .split(is_word_separator)
      .filter(|word| !word.is_empty());
    for word in words
    {   if current.chars().count() + word.chars().count() <= max_width
        {   current.push(' ');
            current.push_str(word);
        } else
        {   lines.push(current.trim().to_string());
            current = word.to_string();
        }
    }
    lines.push(current.trim().to_string());
    lines
}

/// Unicode whitespace plus the ASCII file/group/record/unit
/// separators (U+001C..U+001F), which also break words.
fn is_word_separator(c: char) -> bool
{   c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// [`wrap_lines`] joined with `\n`.
pub fn wrap_text(text: &str, max_width: usize) -> String
{   wrap_lines(text, max_width).join("\n")
}
