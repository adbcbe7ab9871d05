//! Interactive menu loop.

use std::io::{BufRead, Write};

pub const MENU_BANNER: &str = "===============================\n\
    \x20   HeartLink main menu\n\
    ===============================\n\
    1. Environment check (system and dependencies)\n\
    2. Exit\n\
    ===============================";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Check,
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuChoice::Check,
            "2" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

/// Shows the menu and reads one choice; end of input counts as exit.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> std::io::Result<MenuChoice> {
    writeln!(output, "{}", MENU_BANNER)?;
    write!(output, "Select an option: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(MenuChoice::Exit);
    }

    Ok(MenuChoice::parse(&line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_choices() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::Check);
        assert_eq!(MenuChoice::parse(" 2 \n"), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse("3"), MenuChoice::Invalid);
        assert_eq!(MenuChoice::parse(""), MenuChoice::Invalid);
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut input = Cursor::new("1\n2\n");
        let mut output = Vec::new();

        assert_eq!(prompt(&mut input, &mut output).unwrap(), MenuChoice::Check);
        assert_eq!(prompt(&mut input, &mut output).unwrap(), MenuChoice::Exit);

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("1. Environment check").count(), 2);
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(prompt(&mut input, &mut output).unwrap(), MenuChoice::Exit);
    }
}
