//! Tic-Tac-Toe Serial CLI
//!
//! 命令行界面
//!
//! 支持两种模式：
//! 1. serve：长驻进程，通过 stdin/stdout 或串口设备通信
//! 2. play：本地下一局并打印全部消息，不需要上位机

use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::{self, BufReader};
use tictactoe_serial::{
    run_server, AIConfig, Command, EngineConfig, ParseErrorPolicy, ProtocolHandler, ServerOptions,
};

#[derive(Parser)]
#[command(name = "tictactoe-serial")]
#[command(about = "Tic-Tac-Toe engine over a line-delimited JSON link", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动协议服务
    Serve {
        /// 串口设备路径（默认使用 stdin/stdout）；波特率等线路参数需事先用 stty 等工具设置
        #[arg(long)]
        device: Option<String>,

        /// AI 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 对无法解析的帧回复 error 消息
        #[arg(long)]
        report_parse_errors: bool,

        /// 不发送启动横幅
        #[arg(long)]
        no_banner: bool,
    },

    /// 本地下一局
    Play {
        /// 模式 (0: User vs User, 1: User vs AI, 2: AI vs AI)
        #[arg(long, default_value = "2")]
        mode: i64,

        /// AI 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 落子序列，如 "0,0 1,1 0,1"
        #[arg(long, default_value = "")]
        moves: String,
    },
}

/// 解析 "row,col row,col ..." 形式的落子序列
fn parse_moves(s: &str) -> Result<Vec<Command>, String> {
    s.split_whitespace()
        .map(|pair| -> Result<Command, String> {
            let (row, col) = pair
                .split_once(',')
                .ok_or_else(|| format!("Invalid move '{}': expected row,col", pair))?;
            let row = row
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("Invalid row in '{}': {}", pair, e))?;
            let col = col
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("Invalid col in '{}': {}", pair, e))?;
            Ok(Command::Move { row, col })
        })
        .collect()
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            device,
            seed,
            report_parse_errors,
            no_banner,
        } => {
            let config = EngineConfig {
                ai: AIConfig { seed },
                parse_errors: if report_parse_errors {
                    ParseErrorPolicy::Report
                } else {
                    ParseErrorPolicy::Silent
                },
                ..Default::default()
            };
            let options = ServerOptions {
                banner: !no_banner,
                ..Default::default()
            };

            if let Err(e) = serve(device.as_deref(), &config, &options) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Play { mode, seed, moves } => {
            if let Err(e) = play(mode, seed, &moves) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn serve(device: Option<&str>, config: &EngineConfig, options: &ServerOptions) -> Result<(), String> {
    let mut handler = ProtocolHandler::new(config);

    match device {
        Some(path) => {
            let port = OpenOptions::new()
                .read(true)
                .write(true)
                .open(path)
                .map_err(|e| format!("Could not open {}: {}", path, e))?;
            let reader = port
                .try_clone()
                .map_err(|e| format!("Could not clone handle for {}: {}", path, e))?;
            let mut writer = port;
            log::info!("Opened {}", path);
            run_server(BufReader::new(reader), &mut writer, &mut handler, options)?;
        }
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_server(stdin.lock(), &mut stdout, &mut handler, options)?;
        }
    }
    Ok(())
}

fn play(mode: i64, seed: Option<u64>, moves: &str) -> Result<(), String> {
    let config = EngineConfig {
        ai: AIConfig { seed },
        ..Default::default()
    };
    let mut handler = ProtocolHandler::new(&config);

    let mut commands = vec![Command::Mode { mode }];
    commands.extend(parse_moves(moves)?);

    for cmd in commands {
        for msg in handler.handle_command(cmd) {
            println!("{}", msg.to_line()?);
        }
    }

    let state = handler.state();
    eprintln!(
        "Final: mode={}, game_over={}, current_player={}",
        state.mode(),
        state.is_game_over(),
        state.current_player()
    );
    Ok(())
}
