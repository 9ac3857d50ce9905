use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use colored::*;

use crate::{
    fs::{config::FsConfig, error::Result, FileSystem},
    shell::{
        command::{execute_command, Command},
        parse::parse_command,
    },
};

/// 逐行执行命令脚本。单行的解析或引擎错误只记录不中断，
/// 整个批处理继续往下跑；只有脚本本身打不开或读不动才报错返回。
pub fn run_script(path: &str) -> Result<()> {
    let file = File::open(path)?;
    let mut fs = FileSystem::new(FsConfig::default());

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_command(trimmed) {
            Ok(Command::Exit) => break,
            Ok(cmd) => {
                if let Err(e) = execute_command(&cmd, &mut fs) {
                    println!("{} line {}: {}", "❌ Error:".red().bold(), index + 1, e);
                }
            }
            Err(e) => {
                println!(
                    "{} line {}: {}",
                    "⚠️  Parse error:".yellow().bold(),
                    index + 1,
                    e
                );
            }
        }
    }

    Ok(())
}
