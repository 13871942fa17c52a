use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// 文档目录（可选，不提供则使用配置文件中的 documents-dir，再退回 ./Documents）
    pub documents_path: Option<PathBuf>,

    /// 传输方式，也可通过 MCP_MODE 环境变量设置
    #[arg(long, value_enum, env = "MCP_MODE", default_value_t = Mode::Stdio, ignore_case = true)]
    pub mode: Mode,

    /// 提高日志级别，可重复使用（-v, -vv）
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// 每行一个 JSON-RPC 请求
    Stdio,
    /// REST 接口
    Http,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["document-server"], Mode::Stdio)]
    #[case(&["document-server", "--mode", "http"], Mode::Http)]
    #[case(&["document-server", "--mode", "HTTP"], Mode::Http)]
    #[case(&["document-server", "docs", "--mode", "Stdio"], Mode::Stdio)]
    fn test_mode_parsing(#[case] args: &[&str], #[case] expected: Mode) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.mode, expected);
    }

    #[test]
    fn test_positional_path_and_verbosity() {
        let cli = Cli::try_parse_from(["document-server", "/srv/docs", "-vv"]).unwrap();
        assert_eq!(cli.documents_path, Some(PathBuf::from("/srv/docs")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["document-server", "--mode", "grpc"]).is_err());
    }
}
