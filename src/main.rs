use std::{env, process::ExitCode};

use colored::*;

use crate::shell::{script::run_script, start_shell};

mod fs;
mod shell;

/// 带脚本路径参数时按批处理执行脚本，否则进入交互式 shell。
/// 只有脚本打不开或读不动才以非零码退出，单行命令失败不影响退出码。
fn main() -> ExitCode {
    let mut args = env::args().skip(1);

    match args.next() {
        Some(path) => match run_script(&path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{} {}", "❌ Error:".red().bold(), e);
                ExitCode::FAILURE
            }
        },
        None => {
            start_shell();
            ExitCode::SUCCESS
        }
    }
}
