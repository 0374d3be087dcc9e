//! 行协议服务循环
//!
//! 从输入流逐行读取命令，回复写入输出流，每条命令处理完后 flush。
//! 按原始字节分帧：非 UTF-8 或超长的帧交给处理器丢弃，只有读写失败才终止循环。
//! 读到 EOF 时正常退出。

use crate::protocol::{Message, ProtocolHandler, BANNER};
use std::io::{BufRead, Read, Write};

/// 单帧最大字节数（不含换行符）
pub const MAX_LINE_LEN: usize = 512;

/// 服务循环选项
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// 启动时发送 info 横幅
    pub banner: bool,
    /// 单帧最大字节数，超出的帧整行丢弃
    pub max_line_len: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            banner: true,
            max_line_len: MAX_LINE_LEN,
        }
    }
}

/// 服务循环统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    /// 非空输入行数
    pub lines: u64,
    /// 发送的消息数
    pub messages: u64,
}

/// 读到的一帧
enum Frame {
    Line(Vec<u8>),
    /// 超长，已丢弃到下一个换行
    Oversized(usize),
    Eof,
}

/// 读取一帧，最多缓存 `max_len` 字节加换行符
fn read_frame<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Frame, String> {
    let limit = max_len as u64 + 1;
    let mut buf = Vec::new();
    let n = reader
        .by_ref()
        .take(limit)
        .read_until(b'\n', &mut buf)
        .map_err(|e| format!("Read failed: {}", e))?;
    if n == 0 {
        return Ok(Frame::Eof);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        return Ok(Frame::Line(buf));
    }
    if buf.len() <= max_len {
        // 输入结束前的最后一行没有换行符
        return Ok(Frame::Line(buf));
    }

    let mut skipped = buf.len();
    loop {
        buf.clear();
        let n = reader
            .by_ref()
            .take(limit)
            .read_until(b'\n', &mut buf)
            .map_err(|e| format!("Read failed: {}", e))?;
        skipped += n;
        if n == 0 || buf.last() == Some(&b'\n') {
            return Ok(Frame::Oversized(skipped));
        }
    }
}

fn send<W: Write>(writer: &mut W, msg: &Message) -> Result<(), String> {
    let line = msg.to_line()?;
    writeln!(writer, "{}", line).map_err(|e| format!("Write failed: {}", e))
}

/// 运行服务循环，直到输入结束或链路出错
pub fn run_server<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    handler: &mut ProtocolHandler,
    options: &ServerOptions,
) -> Result<ServerStats, String> {
    let mut stats = ServerStats::default();

    log::info!("Serving (max frame {} bytes)", options.max_line_len);
    if options.banner {
        send(writer, &Message::info(BANNER))?;
        stats.messages += 1;
        writer.flush().map_err(|e| format!("Flush failed: {}", e))?;
    }

    loop {
        let responses = match read_frame(&mut reader, options.max_line_len)? {
            Frame::Eof => break,
            Frame::Oversized(len) => {
                stats.lines += 1;
                handler.reject_frame(&format!("of {} bytes (limit {})", len, options.max_line_len))
            }
            Frame::Line(bytes) => {
                // 空行跳过
                if bytes.iter().all(|b| b.is_ascii_whitespace()) {
                    continue;
                }
                stats.lines += 1;
                handler.handle_frame(&bytes)
            }
        };

        for msg in responses {
            send(writer, &msg)?;
            stats.messages += 1;
        }
        writer.flush().map_err(|e| format!("Flush failed: {}", e))?;
    }

    log::info!(
        "Input closed: {} lines, {} messages, {} dropped frames",
        stats.lines,
        stats.messages,
        handler.dropped_frames()
    );
    Ok(stats)
}
