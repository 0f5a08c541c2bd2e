//! 行の折り返し
//!
//! 全角文字は任意の位置で改行し、半角英数字の語はできるだけ分割しない。
//! 閉じ括弧・句読点は行頭に来ないよう前の行にぶら下げる。

use crate::fonts::FontFace;
use jp_career_docs_common::layout::pt_to_mm;

/// 行頭に置かない文字
const NO_LINE_START: &[char] = &[
    '、', '。', '，', '．', '・', '：', '；', '？', '！', '）', '」', '』', '】', '〕', '〉', '》',
    '］', '｝', 'ー', 'ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ', 'っ', 'ゃ', 'ゅ', 'ょ', 'ァ', 'ィ', 'ゥ', 'ェ',
    'ォ', 'ッ', 'ャ', 'ュ', 'ョ', ')', ']', '}', ',', '.', ':', ';', '!', '?',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Space,
    Word,
    Char,
}

/// 折り返しの単位に分割する
fn tokenize(text: &str) -> Vec<(TokenKind, &str)> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenKind> = None;

    for (i, ch) in text.char_indices() {
        let kind = if ch == ' ' || ch == '\t' {
            TokenKind::Space
        } else if ch.is_ascii_graphic() {
            TokenKind::Word
        } else {
            TokenKind::Char
        };

        let continues = matches!(
            (current, kind),
            (Some(TokenKind::Space), TokenKind::Space) | (Some(TokenKind::Word), TokenKind::Word)
        );
        if let Some(prev) = current {
            if !continues {
                tokens.push((prev, &text[start..i]));
                start = i;
            }
        } else {
            start = i;
        }
        current = Some(kind);
    }
    if let Some(kind) = current {
        tokens.push((kind, &text[start..]));
    }
    tokens
}

fn starts_with_closer(token: &str) -> bool {
    token.chars().next().is_some_and(|ch| NO_LINE_START.contains(&ch))
}

/// 1行（改行を含まない）を指定幅で折り返す
///
/// 空文字列は空行1つとして返す。
pub fn wrap_line(text: &str, face: &FontFace, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0.0_f32;

    for (kind, token) in tokenize(text) {
        let token_width = face.text_width_mm(token, size_pt);

        if width + token_width <= max_width_mm || current.is_empty() && kind == TokenKind::Space {
            current.push_str(token);
            width += token_width;
            continue;
        }

        match kind {
            TokenKind::Space => {
                lines.push(std::mem::take(&mut current));
                width = 0.0;
            }
            _ if !current.is_empty() && starts_with_closer(token) => {
                current.push_str(token);
                width += token_width;
            }
            TokenKind::Word if token_width > max_width_mm => {
                // 1行に収まらない語は文字単位で分割
                for ch in token.chars() {
                    let ch_width = pt_to_mm(face.advance_em(ch) * size_pt);
                    if width + ch_width > max_width_mm && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        width = 0.0;
                    }
                    current.push(ch);
                    width += ch_width;
                }
            }
            _ => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current.push_str(token);
                width = token_width;
            }
        }
    }
    lines.push(current);

    lines
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// 改行を保持しつつ各行を折り返す
pub fn wrap_text(text: &str, face: &FontFace, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_line(line, face, size_pt, max_width_mm))
        .collect()
}
