pub mod command;
pub mod parse;
pub mod script;

use std::{io::stdout, path::PathBuf, thread, time::Duration};

use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};

use crate::fs::{config::FsConfig, FileSystem};
use crate::shell::{
    command::{execute_command, Command},
    parse::{parse_command, ParseError},
};

/// 交互式 shell：启动动画、带历史和补全的行编辑器、命令循环
pub fn start_shell() {
    boot_animation();

    let mut fs = FileSystem::new(FsConfig::default());

    let username = whoami::username();
    let hostname = whoami::hostname();

    println!(
        "{}",
        "Type 'HELP' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    // 初始化 reedline，历史记录落在家目录
    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blockfs_history");

    let mut line_editor = Reedline::create().with_history(Box::new(
        FileBackedHistory::with_file(100, history_path).unwrap(),
    ));

    // 命令补全
    let commands = vec![
        "CREATE".to_string(),
        "DELETE".to_string(),
        "WRITE".to_string(),
        "READ".to_string(),
        "LIST".to_string(),
        "HELP".to_string(),
        "EXIT".to_string(),
    ];
    let completer = DefaultCompleter::new_with_wordlen(commands, 2);
    line_editor = line_editor.with_completer(Box::new(completer));

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("{}@{}", username, hostname)),
        DefaultPromptSegment::Basic("BlockFS".to_string()),
    );

    loop {
        let input = line_editor.read_line(&prompt);

        match input {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Ok(Command::Exit) => {
                        println!("{}", "👋 Bye!".bright_yellow());
                        break;
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_command(&cmd, &mut fs) {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        }
                    }
                    Err(ParseError::EmptyLine) => continue,
                    Err(e) => {
                        println!("{} {}", "⚠️  Parse error:".yellow().bold(), e);
                    }
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting BlockFS...".yellow());
                break;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    println!("{}", "GoodBye!".bright_yellow());
}

/// 启动动画
fn boot_animation() {
    let mut stdout = stdout();

    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0)).unwrap();
    println!("{}", "[BlockFS Booting...]".bright_yellow().bold());
    thread::sleep(Duration::from_millis(200));

    let steps = vec![
        "🧠 Initializing block arena...",
        "⚙️  Building file table...",
        "📁 Loading shell...",
    ];

    for step in steps {
        println!("{}", step);
        thread::sleep(Duration::from_millis(300));
    }

    // 模拟进度条
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    for i in 0..100 {
        pb.set_position(i);
        thread::sleep(Duration::from_millis(5));
    }
    pb.finish_with_message("✅ Ready!");

    thread::sleep(Duration::from_millis(200));
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print("Welcome to BlockFS v0.1.0\n"),
        ResetColor
    )
    .unwrap();
}
