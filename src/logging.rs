//! ログ出力の初期化
//!
//! 進捗表示は `println!`、診断メッセージは `tracing` で標準エラーへ出す。

use tracing::Level;

/// 詳細モードなら DEBUG、通常は WARN 以上のみ
pub fn max_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// グローバルなサブスクライバを設定する（2回目以降の呼び出しは無視）
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_level() {
        assert_eq!(max_level(false), Level::WARN);
        assert_eq!(max_level(true), Level::DEBUG);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
