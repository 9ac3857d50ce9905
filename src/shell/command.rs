use colored::*;

use crate::fs::{error::Result, FileSystem};

/// 一条通过解析校验的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { name: String, size: usize },
    Delete { name: String },
    Write { name: String, offset: usize, data: String },
    Read { name: String, offset: usize, size: usize },
    List,
    Help,
    Exit,
}

/// 对引擎执行一条命令，结果打印到终端。
/// 错误原样返回，由调用方决定是中断还是继续。
pub fn execute_command(cmd: &Command, fs: &mut FileSystem) -> Result<()> {
    match cmd {
        Command::Create { name, size } => {
            fs.create(name, *size)?;
            println!(
                "✅ Created file: {} ({} bytes, {} blocks)",
                name.green(),
                size,
                size.div_ceil(fs.block_size())
            );
        }
        Command::Delete { name } => {
            fs.delete(name)?;
            println!("🗑️  Deleted file: {}", name.red());
        }
        Command::Write { name, offset, data } => {
            fs.write(name, *offset, data.as_bytes())?;
            println!(
                "✏️  Wrote {} bytes to {} at offset {}",
                data.len(),
                name.cyan(),
                offset
            );
        }
        Command::Read { name, offset, size } => {
            let bytes = fs.read(name, *offset, *size)?;
            println!("📖 {}", String::from_utf8_lossy(&bytes));
        }
        Command::List => {
            let files = fs.list();
            if files.is_empty() {
                println!("{}", "(no files)".bright_black());
            } else {
                for (name, size) in &files {
                    println!("📄 {:<32} {:>8} bytes", name, size);
                }
            }
            println!(
                "{}",
                format!(
                    "{} files ({} max), {} / {} blocks free",
                    fs.file_count(),
                    fs.max_files(),
                    fs.free_blocks(),
                    fs.total_blocks()
                )
                .bright_black()
            );
        }
        Command::Help => print_help(),
        Command::Exit => {}
    }

    Ok(())
}

fn print_help() {
    println!("{}", "📘 BlockFS Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  CREATE <name> <size>           Create a file of <size> bytes
  DELETE <name>                  Delete a file and free its blocks
  WRITE <name> <offset> <data>   Write <data> (rest of line) at <offset>
  READ <name> <offset> <size>    Read <size> bytes at <offset>
  LIST                           List files and free space
  HELP                           Show this help message
  EXIT                           Quit the shell
"
        .bright_black()
    );
}
