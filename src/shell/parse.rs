use std::fmt;

use crate::shell::command::Command;

/// 解析层错误，与引擎错误分开上报
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyLine,                 // 空行或纯空白行
    UnknownCommand(String),    // 未知命令关键字
    MissingArgument(&'static str), // 缺少必需参数，记录参数名
    InvalidNumber(String),     // 数字参数无法解析
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLine => write!(f, "Empty command"),
            Self::UnknownCommand(keyword) => write!(f, "Unknown command: {}", keyword),
            Self::MissingArgument(what) => write!(f, "Missing argument: {}", what),
            Self::InvalidNumber(token) => write!(f, "Invalid number: {}", token),
        }
    }
}

/// 把一行文本解析成命令。纯函数，不触碰任何引擎状态。
/// 关键字是大写的精确匹配。
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let line = input.trim();
    if line.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    let (keyword, rest) = next_token(line);

    match keyword {
        "CREATE" => {
            let (name, rest) = required(rest, "filename")?;
            let (size, _) = required_number(rest, "size")?;
            Ok(Command::Create {
                name: name.to_string(),
                size,
            })
        }
        "DELETE" => {
            let (name, _) = required(rest, "filename")?;
            Ok(Command::Delete {
                name: name.to_string(),
            })
        }
        "WRITE" => {
            let (name, rest) = required(rest, "filename")?;
            let (offset, data) = required_number(rest, "offset")?;
            // data 是偏移之后的整段剩余文本，允许包含空格
            if data.is_empty() {
                return Err(ParseError::MissingArgument("data"));
            }
            Ok(Command::Write {
                name: name.to_string(),
                offset,
                data: data.to_string(),
            })
        }
        "READ" => {
            let (name, rest) = required(rest, "filename")?;
            let (offset, rest) = required_number(rest, "offset")?;
            let (size, _) = required_number(rest, "size")?;
            Ok(Command::Read {
                name: name.to_string(),
                offset,
                size,
            })
        }
        "LIST" => Ok(Command::List),
        "HELP" => Ok(Command::Help),
        "EXIT" => Ok(Command::Exit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// 切出下一个空白分隔的 token，返回 (token, 剩余文本)
fn next_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(split) => (&s[..split], s[split..].trim_start()),
        None => (s, ""),
    }
}

fn required<'a>(s: &'a str, what: &'static str) -> Result<(&'a str, &'a str), ParseError> {
    let (token, rest) = next_token(s);
    if token.is_empty() {
        return Err(ParseError::MissingArgument(what));
    }
    Ok((token, rest))
}

fn required_number<'a>(s: &'a str, what: &'static str) -> Result<(usize, &'a str), ParseError> {
    let (token, rest) = required(s, what)?;
    let value = token
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))?;
    Ok((value, rest))
}
